//! Gate de estado de dominio: agrega TODOS los fallos, no sólo el primero.
//!
//! A diferencia de la autorización, acá el punto es contarle al caller todas
//! las condiciones insatisfechas de una vez (mejor UX que prueba y error).

use std::sync::Arc;

use crate::check::{Check, CheckList, CheckOutcome};
use crate::errors::CoreCommandError;
use crate::message::{normalize_failure, MessageSet};
use crate::model::{ActionResult, Component, Context, Params};

#[derive(Debug, Clone, Default)]
pub struct Preconditions {
    list: CheckList,
}

impl Preconditions {
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

    /// Corre todos los checks aunque alguno ya haya fallado. Un check puede
    /// devolver una lista de fallos (un check, varios problemas); un payload
    /// que normaliza a vacío no aporta nada.
    pub fn call(&self, params: &Params, context: &Context) -> Result<ActionResult, CoreCommandError> {
        let mut errors = MessageSet::new();
        for check in self.list.iter() {
            match check.call(context) {
                CheckOutcome::Pass => {}
                CheckOutcome::Deny => {
                    // Las precondiciones no tienen código por defecto: un
                    // bool pelado es un check malformado.
                    return Err(CoreCommandError::MalformedFailurePayload(format!(
                        "precondition `{}` returned a bare denial", check.name())));
                }
                CheckOutcome::Fail(raw) => errors.extend(normalize_failure(&raw)?),
            }
        }
        Ok(ActionResult::stage_with_errors(Component::Preconditions,
                                           params.clone(),
                                           context.clone(),
                                           errors))
    }
}
