//! El cuerpo de la operación: la lógica de negocio provista por el usuario.
//!
//! La convención de llamada es explícita y única — el adaptador
//! `OperationBody` recibe `(params, context)` — en lugar de inspeccionar
//! firmas en runtime. Quien necesite otra convención escribe su adaptador.

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::CoreCommandError;
use crate::message::normalize_failure;
use crate::model::{merge_context, value_to_map, ActionResult, Component, Context, Params};

/// Resultado del cuerpo: wrapper éxito/fallo obligatorio.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyOutcome {
    /// El payload DEBE ser un mapping; se mergea al contexto verbatim y queda
    /// visible para callbacks y presentación.
    Success(Value),
    /// Fallo de negocio; el payload se normaliza como cualquier otro.
    Failure(Value),
}

pub trait OperationBody: Send + Sync + Debug {
    fn call(&self, params: &Params, context: &Context) -> BodyOutcome;
}

struct FnBody<F> {
    f: F,
}

impl<F> Debug for FnBody<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnBody")
    }
}

impl<F> OperationBody for FnBody<F> where F: Fn(&Params, &Context) -> BodyOutcome + Send + Sync
{
    fn call(&self, params: &Params, context: &Context) -> BodyOutcome {
        (self.f)(params, context)
    }
}

/// Fábrica de cuerpos de operación desde closures.
pub fn body_fn<F>(f: F) -> Arc<dyn OperationBody>
    where F: Fn(&Params, &Context) -> BodyOutcome + Send + Sync + 'static
{
    Arc::new(FnBody { f })
}

#[derive(Debug, Clone)]
pub struct Operation {
    body: Arc<dyn OperationBody>,
}

impl Operation {
    pub fn new(body: Arc<dyn OperationBody>) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &Arc<dyn OperationBody> {
        &self.body
    }

    pub fn call(&self, params: &Params, context: &Context) -> Result<ActionResult, CoreCommandError> {
        match self.body.call(params, context) {
            BodyOutcome::Success(payload) => {
                let extra = value_to_map(&payload)
                    .ok_or_else(|| CoreCommandError::NonMappingSuccessPayload(payload.to_string()))?;
                Ok(ActionResult::stage(Component::Operation,
                                       params.clone(),
                                       merge_context(context, &extra)))
            }
            BodyOutcome::Failure(raw) => {
                let errors = normalize_failure(&raw)?;
                if errors.is_empty() {
                    return Err(CoreCommandError::MalformedFailurePayload(
                        "operation body failed with an empty payload".to_string()));
                }
                Ok(ActionResult::stage_with_errors(Component::Operation,
                                                   params.clone(),
                                                   context.clone(),
                                                   errors))
            }
        }
    }
}
