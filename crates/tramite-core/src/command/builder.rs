//! Builder de comandos.
//!
//! Regla de configuración: el concepto de policy tiene que declararse
//! SIEMPRE — una lista vacía explícita (`no_policies()`) es una operación
//! válida sin autorización, pero omitir el concepto por completo se rechaza
//! eagerly en `build()`, no en la primera llamada.

use std::sync::Arc;

use super::Command;
use crate::capability::{AfterCommit, Capabilities, Contract, PassthroughContract, Reporter, Transaction};
use crate::check::Check;
use crate::errors::CoreCommandError;
use crate::message::MessageResolver;
use crate::stage::{Callback, IdempotencyCheck, IdempotencyGate, Operation, OperationBody, Policies,
                   Preconditions};

#[derive(Debug)]
pub struct CommandBuilder {
    body: Arc<dyn OperationBody>,
    contract: Arc<dyn Contract>,
    // None = el concepto nunca fue declarado (error en build)
    policies: Option<Vec<Arc<dyn Check>>>,
    idempotency: Vec<Arc<dyn IdempotencyCheck>>,
    preconditions: Vec<Arc<dyn Check>>,
    on_success: Vec<Arc<dyn Callback>>,
    on_failure: Vec<Arc<dyn Callback>>,
    capabilities: Capabilities,
}

impl CommandBuilder {
    pub fn new(body: Arc<dyn OperationBody>) -> Self {
        Self { body,
               contract: Arc::new(PassthroughContract),
               policies: None,
               idempotency: Vec::new(),
               preconditions: Vec::new(),
               on_success: Vec::new(),
               on_failure: Vec::new(),
               capabilities: Capabilities::default() }
    }

    pub(crate) fn from_command(command: &Command) -> Self {
        Self { body: Arc::clone(command.operation.body()),
               contract: Arc::clone(&command.contract),
               policies: Some(command.policies.checks().to_vec()),
               idempotency: command.idempotency.checks().to_vec(),
               preconditions: command.preconditions.checks().to_vec(),
               on_success: command.on_success.clone(),
               on_failure: command.on_failure.clone(),
               capabilities: command.capabilities.clone() }
    }

    pub fn contract(mut self, contract: Arc<dyn Contract>) -> Self {
        self.contract = contract;
        self
    }

    /// Agrega una policy (declara el concepto si hacía falta).
    pub fn policy(mut self, check: Arc<dyn Check>) -> Self {
        self.policies.get_or_insert_with(Vec::new).push(check);
        self
    }

    /// Declara la lista completa de policies.
    pub fn policies(mut self, checks: Vec<Arc<dyn Check>>) -> Self {
        self.policies = Some(checks);
        self
    }

    /// Opt-out explícito: operación sin autorización.
    pub fn no_policies(mut self) -> Self {
        self.policies = Some(Vec::new());
        self
    }

    pub fn precondition(mut self, check: Arc<dyn Check>) -> Self {
        self.preconditions.push(check);
        self
    }

    pub fn idempotency_check(mut self, check: Arc<dyn IdempotencyCheck>) -> Self {
        self.idempotency.push(check);
        self
    }

    pub fn on_success(mut self, callback: Arc<dyn Callback>) -> Self {
        self.on_success.push(callback);
        self
    }

    pub fn on_failure(mut self, callback: Arc<dyn Callback>) -> Self {
        self.on_failure.push(callback);
        self
    }

    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn transaction(mut self, transaction: Arc<dyn Transaction>) -> Self {
        self.capabilities.transaction = transaction;
        self
    }

    pub fn after_commit(mut self, scheduler: Arc<dyn AfterCommit>) -> Self {
        self.capabilities.after_commit = scheduler;
        self
    }

    pub fn info_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.capabilities.info_reporter = reporter;
        self
    }

    pub fn error_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.capabilities.error_reporter = reporter;
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn MessageResolver>) -> Self {
        self.capabilities.resolver = resolver;
        self
    }

    /// Valida la configuración y congela el comando.
    pub fn build(self) -> Result<Command, CoreCommandError> {
        let policies = self.policies.ok_or(CoreCommandError::MissingPolicies)?;
        Ok(Command { contract: self.contract,
                     policies: Policies::new(policies),
                     idempotency: IdempotencyGate::new(self.idempotency),
                     preconditions: Preconditions::new(self.preconditions),
                     operation: Operation::new(self.body),
                     on_success: self.on_success,
                     on_failure: self.on_failure,
                     capabilities: self.capabilities })
    }
}
