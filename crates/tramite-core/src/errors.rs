//! Errores de programador del core.
//!
//! Estos errores indican un comando mal configurado o un componente que
//! devolvió un valor malformado. Nunca viajan dentro de un `ActionResult`:
//! el orquestador los propaga como `Err(..)` y abortan la llamada. Cada etapa
//! devuelve un resultado; sólo los errores de programador escapan.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ActionResult;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreCommandError {
    #[error("command declares no policies and no explicit opt-out")]
    MissingPolicies,
    #[error("malformed failure payload: {0}")]
    MalformedFailurePayload(String),
    #[error("operation success payload must be a mapping, got: {0}")]
    NonMappingSuccessPayload(String),
    #[error("idempotency payload from check `{check}` must be a mapping, got: {payload}")]
    NonMappingIdempotencyPayload { check: String, payload: String },
    #[error("internal: {0}")]
    Internal(String),
}

/// Error de los entry points estrictos: un resultado fallido se convierte en
/// un valor de error explícito que transporta el `ActionResult` completo como
/// diagnóstico. No hay excepciones internas.
#[derive(Debug, Error)]
pub enum StrictCallError {
    #[error("command failed at stage `{}`", .0.component())]
    Failed(Box<ActionResult>),
    #[error(transparent)]
    Core(#[from] CoreCommandError),
}

impl StrictCallError {
    /// Recupera el resultado fallido si este error proviene de uno.
    pub fn result(&self) -> Option<&ActionResult> {
        match self {
            StrictCallError::Failed(res) => Some(res),
            StrictCallError::Core(_) => None,
        }
    }
}
