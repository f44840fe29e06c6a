use std::fmt;

use serde::{Deserialize, Serialize};

/// Etapa que produjo un resultado. El orden de las variantes refleja el orden
/// estricto de ejecución del pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Contract,
    Policies,
    Idempotency,
    Preconditions,
    Operation,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Contract => "contract",
            Component::Policies => "policies",
            Component::Idempotency => "idempotency",
            Component::Preconditions => "preconditions",
            Component::Operation => "operation",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
