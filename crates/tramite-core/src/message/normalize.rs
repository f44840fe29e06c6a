//! Normalización de formas heterogéneas de fallo a un `MessageSet` uniforme.
//!
//! Formas aceptadas:
//! - `null` / `""` / `{}` / `[]`  → éxito (set vacío)
//! - string                       → código suelto (si parece identificador)
//!                                  o texto libre
//! - objeto                       → `message|text` como texto, `error` como
//!                                  código, más `path`, `code`, `tokens`,
//!                                  `meta`
//! - array                        → cualquiera de las anteriores, recursivo
//!
//! Cualquier otra forma es un error de programador: tragarse silenciosamente
//! un payload malformado esconderia bugs de checks de policy/precondición.

use serde_json::{Map, Value};

use super::set::MessageSet;
use super::types::Message;
use crate::errors::CoreCommandError;

/// Normaliza un valor crudo de fallo. Set vacío ⇔ el valor no aporta fallos.
pub fn normalize_failure(raw: &Value) -> Result<MessageSet, CoreCommandError> {
    let mut set = MessageSet::new();
    collect_into(raw, &mut set)?;
    Ok(set)
}

fn collect_into(raw: &Value, set: &mut MessageSet) -> Result<(), CoreCommandError> {
    match raw {
        Value::Null => Ok(()),
        Value::String(s) if s.is_empty() => Ok(()),
        Value::String(s) => {
            set.push(message_from_str(s));
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                collect_into(item, set)?;
            }
            Ok(())
        }
        Value::Object(map) if map.is_empty() => Ok(()),
        Value::Object(map) => {
            set.push(message_from_object(map)?);
            Ok(())
        }
        other => Err(CoreCommandError::MalformedFailurePayload(other.to_string())),
    }
}

/// Un string suelto es un código si tiene pinta de identificador
/// (`not_found`), texto libre en cualquier otro caso ("is missing").
fn message_from_str(s: &str) -> Message {
    if is_code_like(s) {
        Message::from_code(s)
    } else {
        Message::from_text(s)
    }
}

fn is_code_like(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn message_from_object(map: &Map<String, Value>) -> Result<Message, CoreCommandError> {
    let text = ["message", "text"].iter()
                                  .find_map(|k| map.get(*k))
                                  .and_then(Value::as_str)
                                  .map(str::to_string);

    // `error` transporta códigos en la convención de los checks; si no parece
    // código se degrada a texto.
    let (error_code, error_text) = match map.get("error").and_then(Value::as_str) {
        Some(e) if is_code_like(e) => (Some(e.to_string()), None),
        Some(e) => (None, Some(e.to_string())),
        None => (None, None),
    };

    let code = map.get("code")
                  .and_then(Value::as_str)
                  .map(str::to_string)
                  .or(error_code);
    let text = text.or(error_text);

    if text.is_none() && code.is_none() {
        return Err(CoreCommandError::MalformedFailurePayload(Value::Object(map.clone()).to_string()));
    }

    Ok(Message { text,
                 path: map.get("path").and_then(Value::as_str).map(str::to_string),
                 code,
                 tokens: map.get("tokens").cloned().unwrap_or(Value::Null),
                 meta: map.get("meta").cloned().unwrap_or(Value::Null) })
}
