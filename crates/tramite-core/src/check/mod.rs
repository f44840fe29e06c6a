//! Checks de policy/precondición y la evaluación compartida de contexto
//! requerido.
//!
//! Un check declara estáticamente qué claves de contexto necesita
//! (`context_keys`) — no hay inspección de firmas en runtime. Eso alimenta la
//! decisión de "evaluabilidad" del orquestador: un stage sólo corre sus
//! checks cuando todas las claves requeridas ya están presentes.

pub mod list;

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;

use crate::model::Context;

pub use list::CheckList;

/// Resultado de un check individual.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// El check pasa; no aporta fallos.
    Pass,
    /// Denegación sin payload. En policies se normaliza al código
    /// `unauthorized`; en precondiciones es un valor malformado.
    Deny,
    /// Fallo con payload explícito (código, objeto estructurado o lista);
    /// se normaliza vía el agregador de mensajes.
    Fail(Value),
}

/// Un check ejecutable contra el contexto (nunca contra params: las
/// decisiones de autorización y de estado de dominio no miran el input).
pub trait Check: Send + Sync + Debug {
    /// Identidad estable del check, para reporters y diagnósticos.
    fn name(&self) -> &str {
        "check"
    }

    /// Claves de contexto que este check necesita para ser evaluable.
    fn context_keys(&self) -> Vec<String> {
        Vec::new()
    }

    fn call(&self, context: &Context) -> CheckOutcome;
}

struct FnCheck<F> {
    name: String,
    keys: Vec<String>,
    f: F,
}

impl<F> Debug for FnCheck<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCheck").field("name", &self.name).field("keys", &self.keys).finish()
    }
}

impl<F> Check for FnCheck<F> where F: Fn(&Context) -> CheckOutcome + Send + Sync
{
    fn name(&self) -> &str {
        &self.name
    }

    fn context_keys(&self) -> Vec<String> {
        self.keys.clone()
    }

    fn call(&self, context: &Context) -> CheckOutcome {
        (self.f)(context)
    }
}

/// Construye un check desde un closure, declarando sus claves requeridas.
pub fn check_fn<F>(name: impl Into<String>, keys: &[&str], f: F) -> Arc<dyn Check>
    where F: Fn(&Context) -> CheckOutcome + Send + Sync + 'static
{
    Arc::new(FnCheck { name: name.into(),
                       keys: keys.iter().map(|k| k.to_string()).collect(),
                       f })
}

/// Envuelve un check agregando claves requeridas extra. Las claves efectivas
/// son la UNIÓN de las del check interno y las declaradas aquí: si ambas
/// fuentes discrepan, el requisito se sobre-aproxima (ambigüedad conocida,
/// cubierta por test).
pub fn with_context_keys(inner: Arc<dyn Check>, keys: &[&str]) -> Arc<dyn Check> {
    Arc::new(WithContextKeys { extra: keys.iter().map(|k| k.to_string()).collect(),
                               inner })
}

#[derive(Debug)]
struct WithContextKeys {
    inner: Arc<dyn Check>,
    extra: Vec<String>,
}

impl Check for WithContextKeys {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn context_keys(&self) -> Vec<String> {
        let mut keys = self.inner.context_keys();
        for k in &self.extra {
            if !keys.contains(k) {
                keys.push(k.clone());
            }
        }
        keys
    }

    fn call(&self, context: &Context) -> CheckOutcome {
        self.inner.call(context)
    }
}
