//! Contrato por claves requeridas, con lookups de contexto.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use tramite_core::{ActionResult, Component, Context, Contract, CoreCommandError, Message,
                   MessageSet, Params};

type LookupFn = dyn Fn(&Params) -> Option<Value> + Send + Sync;

/// Contrato simple: exige la presencia de un conjunto de claves en params y
/// puebla el contexto mediante lookups declarados.
///
/// Los lookups corren ANTES de reportar claves faltantes: aunque el contrato
/// falle, el contexto que alcanzó a poblar queda disponible para que el
/// orquestador decida si los gates son evaluables.
pub struct KeyContract {
    required: Vec<String>,
    lookups: Vec<(String, Arc<LookupFn>)>,
}

impl fmt::Debug for KeyContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyContract")
         .field("required", &self.required)
         .field("lookups", &self.lookups.iter().map(|(k, _)| k).collect::<Vec<_>>())
         .finish()
    }
}

impl KeyContract {
    pub fn new() -> Self {
        Self { required: Vec::new(), lookups: Vec::new() }
    }

    /// Declara una clave obligatoria de params.
    pub fn require(mut self, key: impl Into<String>) -> Self {
        self.required.push(key.into());
        self
    }

    /// Declara un lookup: si el closure devuelve `Some`, el valor se inserta
    /// en el contexto bajo `key`.
    pub fn lookup<F>(mut self, key: impl Into<String>, f: F) -> Self
        where F: Fn(&Params) -> Option<Value> + Send + Sync + 'static
    {
        self.lookups.push((key.into(), Arc::new(f)));
        self
    }
}

impl Default for KeyContract {
    fn default() -> Self {
        Self::new()
    }
}

impl Contract for KeyContract {
    fn call(&self, params: &Params, context: &Context) -> Result<ActionResult, CoreCommandError> {
        let mut context = context.clone();
        for (key, lookup) in &self.lookups {
            if let Some(value) = lookup(params) {
                context.insert(key.clone(), value);
            }
        }

        let mut errors = MessageSet::new();
        for key in &self.required {
            if !params.contains_key(key) {
                errors.push(Message { text: Some("is missing".to_string()),
                                      path: Some(key.clone()),
                                      code: Some("missing".to_string()),
                                      tokens: Value::Null,
                                      meta: Value::Null });
            }
        }

        Ok(ActionResult::stage_with_errors(Component::Contract, params.clone(), context, errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tramite_core::value_to_map;

    #[test]
    fn reports_every_missing_key() {
        let contract = KeyContract::new().require("name").require("email");
        let res = contract.call(&Params::new(), &Context::new()).unwrap();

        assert!(res.failure());
        let paths: Vec<_> = res.messages().entries().iter().map(|m| m.path.clone()).collect();
        assert_eq!(paths, vec![Some("name".to_string()), Some("email".to_string())]);
    }

    #[test]
    fn lookups_enrich_context_even_when_requirements_fail() {
        let contract = KeyContract::new()
            .require("amount")
            .lookup("user", |params| {
                params.get("user_id").map(|id| json!({"id": id}))
            });

        let params = value_to_map(&json!({"user_id": 7})).unwrap();
        let res = contract.call(&params, &Context::new()).unwrap();

        assert!(res.failure());
        assert_eq!(res.context().get("user"), Some(&json!({"id": 7})));
    }

    #[test]
    fn passes_with_all_keys_present() {
        let contract = KeyContract::new().require("name");
        let params = value_to_map(&json!({"name": "ada"})).unwrap();
        let res = contract.call(&params, &Context::new()).unwrap();
        assert!(res.success());
    }
}
