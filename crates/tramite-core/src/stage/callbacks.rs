//! Callbacks post-resolución (`on_success` / `on_failure`).
//!
//! Corren fuera de la transacción principal y están desacoplados del
//! resultado: el fallo de una entrada se captura localmente, se reporta por
//! el error-reporter y NUNCA escala — ni rompe a sus hermanas ni toca el set
//! de errores del resultado principal.

use std::fmt::Debug;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use crate::capability::Reporter;
use crate::message::{normalize_failure, Message, MessageSet};
use crate::model::{map_to_value, ActionResult, CallbackRecord};

/// Una entrada de callback. `Err(payload)` se normaliza a mensajes dentro
/// del registro de la entrada.
pub trait Callback: Send + Sync + Debug {
    fn name(&self) -> &str {
        "callback"
    }

    fn call(&self, result: &ActionResult) -> Result<(), Value>;
}

struct FnCallback<F> {
    name: String,
    f: F,
}

impl<F> Debug for FnCallback<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCallback").field("name", &self.name).finish()
    }
}

impl<F> Callback for FnCallback<F> where F: Fn(&ActionResult) -> Result<(), Value> + Send + Sync
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, result: &ActionResult) -> Result<(), Value> {
        (self.f)(result)
    }
}

/// Fábrica de callbacks desde closures.
pub fn callback_fn<F>(name: impl Into<String>, f: F) -> Arc<dyn Callback>
    where F: Fn(&ActionResult) -> Result<(), Value> + Send + Sync + 'static
{
    Arc::new(FnCallback { name: name.into(), f })
}

/// Ejecuta cada entrada contra el resultado resuelto. Una entrada fallida no
/// impide que corran las siguientes; el error-reporter recibe exactamente un
/// evento por entrada fallida, con el contexto de ese fallo.
pub fn run_callbacks(entries: &[Arc<dyn Callback>],
                     result: &ActionResult,
                     error_reporter: &dyn Reporter)
                     -> Vec<CallbackRecord> {
    entries.iter()
           .map(|callback| {
               let errors = match callback.call(result) {
                   Ok(()) => MessageSet::new(),
                   Err(raw) => {
                       // un payload malformado acá no escala: se envuelve
                       let errors = normalize_failure(&raw).unwrap_or_else(|_| {
                           MessageSet::single(Message { text: Some(format!("malformed callback payload: {raw}")),
                                                        path: None,
                                                        code: Some("callback_failed".to_string()),
                                                        tokens: Value::Null,
                                                        meta: raw.clone() })
                       });
                       error_reporter.call("callback.failure",
                                           &json!({
                                               "callback": callback.name(),
                                               "component": result.component(),
                                               "context": map_to_value(result.context()),
                                               "errors": errors,
                                           }));
                       errors
                   }
               };
               CallbackRecord { name: callback.name().to_string(),
                                errors,
                                ran_at: Utc::now() }
           })
           .collect()
}
