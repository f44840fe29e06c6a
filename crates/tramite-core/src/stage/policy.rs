//! Gate de autorización: el primer check que falla gana.

use std::sync::Arc;

use crate::check::{Check, CheckList, CheckOutcome};
use crate::errors::CoreCommandError;
use crate::message::{normalize_failure, Message, MessageSet};
use crate::model::{ActionResult, Component, Context, Params};

/// Código por defecto cuando un check deniega sin payload.
pub const UNAUTHORIZED: &str = "unauthorized";

/// Lista de policies de un comando. Corre en orden declarado contra el
/// contexto, con short-circuit: las decisiones de autorización no deben
/// filtrar información sobre checks posteriores.
#[derive(Debug, Clone, Default)]
pub struct Policies {
    list: CheckList,
}

impl Policies {
    pub fn new(checks: Vec<Arc<dyn Check>>) -> Self {
        Self { list: CheckList::new(checks) }
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn checks(&self) -> &[Arc<dyn Check>] {
        self.list.checks()
    }

    pub fn evaluable(&self, context: &Context) -> bool {
        self.list.evaluable(context)
    }

    /// Ejecuta los checks. Lista vacía explícita ⇒ siempre éxito (la
    /// ausencia total del concepto se rechaza antes, al construir el
    /// comando).
    pub fn call(&self, params: &Params, context: &Context) -> Result<ActionResult, CoreCommandError> {
        for check in self.list.iter() {
            match check.call(context) {
                CheckOutcome::Pass => continue,
                CheckOutcome::Deny => {
                    let errors = MessageSet::single(Message::from_code(UNAUTHORIZED));
                    return Ok(ActionResult::stage_with_errors(Component::Policies,
                                                              params.clone(),
                                                              context.clone(),
                                                              errors));
                }
                CheckOutcome::Fail(raw) => {
                    let errors = normalize_failure(&raw)?;
                    if errors.is_empty() {
                        // Fail con payload vacío es contradictorio: bug del check
                        return Err(CoreCommandError::MalformedFailurePayload(format!(
                            "policy `{}` failed with an empty payload", check.name())));
                    }
                    return Ok(ActionResult::stage_with_errors(Component::Policies,
                                                              params.clone(),
                                                              context.clone(),
                                                              errors));
                }
            }
        }
        Ok(ActionResult::stage(Component::Policies, params.clone(), context.clone()))
    }
}
