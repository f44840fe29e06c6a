use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Una unidad de fallo normalizada.
///
/// `path = None` significa error a nivel base (no asociado a un campo).
/// `tokens` alimenta la interpolación del resolver; `meta` es opaco para el
/// core y viaja intacto hasta la capa de presentación.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: Option<String>,
    pub path: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub tokens: Value,
    #[serde(default)]
    pub meta: Value,
}

impl Message {
    pub fn from_code(code: impl Into<String>) -> Self {
        Self { text: None,
               path: None,
               code: Some(code.into()),
               tokens: Value::Null,
               meta: Value::Null }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()),
               path: None,
               code: None,
               tokens: Value::Null,
               meta: Value::Null }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Ejes independientes de renderizado: "full" y "locale".
/// Ambos se resuelven de forma lazy al pedir `errors(..)`, nunca al agregar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Prefija el nombre del campo dentro del texto.
    pub full: bool,
    /// Selecciona la traducción; `None` usa el texto/código tal cual.
    pub locale: Option<String>,
}

impl RenderOptions {
    pub fn full() -> Self {
        Self { full: true, locale: None }
    }

    pub fn locale(locale: impl Into<String>) -> Self {
        Self { full: false, locale: Some(locale.into()) }
    }
}
