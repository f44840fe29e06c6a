//! Reporters de observabilidad.

use std::sync::Mutex;

use serde_json::Value;

use tramite_core::Reporter;

/// Acumula cada evento reportado. Útil en tests y demos para afirmar sobre
/// lo que el pipeline notificó.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<(String, Value)>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl Reporter for CollectingReporter {
    fn call(&self, message: &str, payload: &Value) {
        self.events.lock().unwrap().push((message.to_string(), payload.clone()));
    }
}
