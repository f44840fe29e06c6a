//! Mapas ordenados para params y contexto, y el merge shallow que comparten
//! la etapa de idempotencia y el cuerpo de la operación.

use indexmap::IndexMap;
use serde_json::Value;

/// Params validados/coercionados: mapa ordenado clave → valor escalar o
/// anidado. El orden de inserción se conserva (presentación estable).
pub type Params = IndexMap<String, Value>;

/// Contexto ambiente: entidades de dominio, flags y todo lo que aporten el
/// contrato o el cuerpo de la operación.
pub type Context = IndexMap<String, Value>;

/// Merge shallow: las claves de `extra` reemplazan a las de `base` cuando
/// colisionan. No hay deep-merge para payloads anidados.
pub fn merge_context(base: &Context, extra: &Context) -> Context {
    let mut out = base.clone();
    for (k, v) in extra.iter() {
        out.insert(k.clone(), v.clone());
    }
    out
}

/// Convierte un `Value::Object` en mapa ordenado. `None` para cualquier otra
/// forma (el llamador decide si eso es un error de programador).
pub fn value_to_map(value: &Value) -> Option<Context> {
    value.as_object()
         .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

/// Snapshot JSON de un mapa ordenado, para payloads de reporters.
pub fn map_to_value(map: &Context) -> Value {
    let mut out = serde_json::Map::new();
    for (k, v) in map.iter() {
        out.insert(k.clone(), v.clone());
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_shallow_overwrites_on_collision() {
        let base = value_to_map(&json!({"a": 1, "b": {"x": 1}})).unwrap();
        let extra = value_to_map(&json!({"b": {"y": 2}, "c": 3})).unwrap();

        let merged = merge_context(&base, &extra);

        assert_eq!(merged.get("a"), Some(&json!(1)));
        // Shallow: el objeto anidado de `extra` reemplaza al de `base` entero
        assert_eq!(merged.get("b"), Some(&json!({"y": 2})));
        assert_eq!(merged.get("c"), Some(&json!(3)));
    }

    #[test]
    fn merge_preserves_base_insertion_order() {
        let base = value_to_map(&json!({"z": 1, "a": 2})).unwrap();
        let extra = value_to_map(&json!({"m": 3})).unwrap();

        let merged = merge_context(&base, &extra);
        let keys: Vec<&str> = merged.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn value_to_map_rejects_non_objects() {
        assert!(value_to_map(&json!([1, 2])).is_none());
        assert!(value_to_map(&json!("text")).is_none());
        assert!(value_to_map(&json!(null)).is_none());
    }
}
