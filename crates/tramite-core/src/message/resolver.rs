//! Resolución lazy de mensajes a texto legible.
//!
//! El core nunca localiza por sí mismo: delega en una capability inyectada
//! (`MessageResolver`). `DefaultResolver` cubre el caso sin i18n: usa el
//! texto crudo o humaniza el código, e interpola tokens `%{nombre}`.

use std::fmt::Debug;

use serde_json::Value;

use super::types::{Message, RenderOptions};

/// Capability de resolución: mensaje normalizado + opciones → texto final.
pub trait MessageResolver: Send + Sync + Debug {
    fn resolve(&self, message: &Message, options: &RenderOptions) -> String;
}

/// Resolver por defecto, sin tablas de traducción.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResolver;

impl MessageResolver for DefaultResolver {
    fn resolve(&self, message: &Message, options: &RenderOptions) -> String {
        let base = message.text
                          .clone()
                          .or_else(|| message.code.as_deref().map(humanize))
                          .unwrap_or_else(|| "is invalid".to_string());
        let text = interpolate(&base, &message.tokens);

        if options.full {
            match &message.path {
                Some(path) => format!("{} {}", humanize(path), text),
                None => text,
            }
        } else {
            text
        }
    }
}

/// `some_error_code` → `some error code`.
pub fn humanize(code: &str) -> String {
    code.replace(['_', '.'], " ")
}

/// Reemplaza ocurrencias `%{token}` con los valores del objeto `tokens`.
/// Tokens ausentes quedan tal cual (el resolver no inventa valores).
pub fn interpolate(text: &str, tokens: &Value) -> String {
    let Some(map) = tokens.as_object() else {
        return text.to_string();
    };
    let mut out = text.to_string();
    for (key, value) in map.iter() {
        let needle = format!("%{{{}}}", key);
        let replacement = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        out = out.replace(&needle, &replacement);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_text_over_code() {
        let m = Message { text: Some("already done".into()),
                          path: None,
                          code: Some("done".into()),
                          tokens: Value::Null,
                          meta: Value::Null };
        assert_eq!(DefaultResolver.resolve(&m, &RenderOptions::default()), "already done");
    }

    #[test]
    fn humanizes_code_when_text_missing() {
        let m = Message::from_code("not_found");
        assert_eq!(DefaultResolver.resolve(&m, &RenderOptions::default()), "not found");
    }

    #[test]
    fn full_prefixes_field_name() {
        let m = Message::from_text("is missing").with_path("user_name");
        let opts = RenderOptions::full();
        assert_eq!(DefaultResolver.resolve(&m, &opts), "user name is missing");
    }

    #[test]
    fn full_without_path_renders_bare_text() {
        let m = Message::from_text("is missing");
        assert_eq!(DefaultResolver.resolve(&m, &RenderOptions::full()), "is missing");
    }

    #[test]
    fn interpolates_tokens() {
        let m = Message { text: Some("must be above %{min}".into()),
                          path: None,
                          code: None,
                          tokens: json!({"min": 10}),
                          meta: Value::Null };
        assert_eq!(DefaultResolver.resolve(&m, &RenderOptions::default()), "must be above 10");
    }
}
