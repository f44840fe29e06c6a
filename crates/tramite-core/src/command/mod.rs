//! Definición inmutable de un comando de negocio.
//!
//! Se construye una vez al arranque del proceso y se reutiliza entre
//! llamadas: no comparte estado mutable, así que es seguro invocarla
//! concurrentemente desde muchos hilos a la vez.

pub mod builder;

use std::sync::Arc;

use crate::capability::{Capabilities, Contract};
use crate::stage::{Callback, IdempotencyGate, Operation, Policies, Preconditions};

pub use builder::CommandBuilder;

#[derive(Debug, Clone)]
pub struct Command {
    pub(crate) contract: Arc<dyn Contract>,
    pub(crate) policies: Policies,
    pub(crate) idempotency: IdempotencyGate,
    pub(crate) preconditions: Preconditions,
    pub(crate) operation: Operation,
    pub(crate) on_success: Vec<Arc<dyn Callback>>,
    pub(crate) on_failure: Vec<Arc<dyn Callback>>,
    pub(crate) capabilities: Capabilities,
}

impl Command {
    /// Punto de entrada de configuración: builder con el cuerpo de la
    /// operación como único argumento obligatorio.
    pub fn builder(body: Arc<dyn crate::stage::OperationBody>) -> CommandBuilder {
        CommandBuilder::new(body)
    }

    /// Copia configurable: produce una variante del comando sin mutar el
    /// original (los componentes son `Arc`, el clon es barato).
    pub fn to_builder(&self) -> CommandBuilder {
        CommandBuilder::from_command(self)
    }

    pub fn policies(&self) -> &Policies {
        &self.policies
    }

    pub fn preconditions(&self) -> &Preconditions {
        &self.preconditions
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}
