//! Bypass pre-body: si la operación ya ocurrió, saltamos el cuerpo con un
//! resultado EXITOSO marcado `component = idempotency`.
//!
//! El "fallo" de un check de idempotencia es dato, no error: se reporta por
//! el info-reporter (comportamiento esperado y rutinario, no una falla) y su
//! payload se mergea al contexto para que callbacks y presentación lo vean.

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::capability::Reporter;
use crate::errors::CoreCommandError;
use crate::model::{map_to_value, merge_context, value_to_map, ActionResult, Component, Context, Params};

/// Un check de idempotencia. `Some(payload)` significa "la operación ya
/// ocurrió, saltá el cuerpo"; el payload debe ser un mapping.
pub trait IdempotencyCheck: Send + Sync + Debug {
    fn name(&self) -> &str {
        "idempotency"
    }

    fn call(&self, params: &Params, context: &Context) -> Option<Value>;
}

struct FnIdempotencyCheck<F> {
    name: String,
    f: F,
}

impl<F> Debug for FnIdempotencyCheck<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnIdempotencyCheck").field("name", &self.name).finish()
    }
}

impl<F> IdempotencyCheck for FnIdempotencyCheck<F>
    where F: Fn(&Params, &Context) -> Option<Value> + Send + Sync
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, params: &Params, context: &Context) -> Option<Value> {
        (self.f)(params, context)
    }
}

/// Fábrica de checks de idempotencia desde closures.
pub fn idempotency_fn<F>(name: impl Into<String>, f: F) -> Arc<dyn IdempotencyCheck>
    where F: Fn(&Params, &Context) -> Option<Value> + Send + Sync + 'static
{
    Arc::new(FnIdempotencyCheck { name: name.into(), f })
}

#[derive(Debug, Clone, Default)]
pub struct IdempotencyGate {
    checks: Vec<Arc<dyn IdempotencyCheck>>,
}

impl IdempotencyGate {
    pub fn new(checks: Vec<Arc<dyn IdempotencyCheck>>) -> Self {
        Self { checks }
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn checks(&self) -> &[Arc<dyn IdempotencyCheck>] {
        &self.checks
    }

    /// Corre los checks en orden; el primero que dispara DETIENE la
    /// iteración (si ya sabemos que hay que saltar el cuerpo, el resto es
    /// irrelevante). Sin checks ⇒ pasa de largo (`None`).
    ///
    /// El merge del payload al contexto es shallow: en colisión de clave
    /// gana el payload. Decisión explícita, cubierta por test.
    pub fn call(&self,
                params: &Params,
                context: &Context,
                info_reporter: &dyn Reporter)
                -> Result<Option<ActionResult>, CoreCommandError> {
        for check in &self.checks {
            let Some(payload) = check.call(params, context) else {
                continue;
            };
            let extra = value_to_map(&payload).ok_or_else(|| {
                                                  CoreCommandError::NonMappingIdempotencyPayload {
                                                      check: check.name().to_string(),
                                                      payload: payload.to_string(),
                                                  }
                                              })?;
            let merged = merge_context(context, &extra);
            let result = ActionResult::stage(Component::Idempotency, params.clone(), merged);

            info_reporter.call("idempotency.bypass",
                               &json!({
                                   "check": check.name(),
                                   "component": Component::Idempotency,
                                   "payload": payload,
                                   "params": map_to_value(params),
                                   "context": map_to_value(result.context()),
                               }));

            return Ok(Some(result));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::NullReporter;
    use crate::model::value_to_map;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn no_checks_pass_through() {
        let gate = IdempotencyGate::default();
        let out = gate.call(&Params::new(), &Context::new(), &NullReporter).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn first_trigger_stops_iteration() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let gate = IdempotencyGate::new(vec![
            idempotency_fn("first", |_, _| Some(json!({"processed": true}))),
            idempotency_fn("second", move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Some(json!({"other": 1}))
            }),
        ]);

        let out = gate.call(&Params::new(), &Context::new(), &NullReporter).unwrap().unwrap();
        assert_eq!(out.component(), Component::Idempotency);
        assert!(out.success());
        assert_eq!(out.context().get("processed"), Some(&json!(true)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn payload_overwrites_context_on_key_collision() {
        // Decisión documentada: shallow-overwrite, gana el payload del check
        let gate = IdempotencyGate::new(vec![idempotency_fn("again", |_, _| {
                                                 Some(json!({"state": "done"}))
                                             })]);
        let ctx = value_to_map(&json!({"state": "pending", "user": 7})).unwrap();

        let out = gate.call(&Params::new(), &ctx, &NullReporter).unwrap().unwrap();
        assert_eq!(out.context().get("state"), Some(&json!("done")));
        assert_eq!(out.context().get("user"), Some(&json!(7)));
    }

    #[test]
    fn non_mapping_payload_is_a_programmer_error() {
        let gate = IdempotencyGate::new(vec![idempotency_fn("bad", |_, _| Some(json!([1, 2])))]);
        let err = gate.call(&Params::new(), &Context::new(), &NullReporter).unwrap_err();
        assert!(matches!(err, CoreCommandError::NonMappingIdempotencyPayload { .. }));
    }
}
