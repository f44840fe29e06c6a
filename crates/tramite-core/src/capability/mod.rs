//! Capabilities de frontera que el core consume pero no implementa.
//!
//! Cada una es una interfaz de un solo método, inyectada al construir el
//! comando. Los defaults son no-op explícitos: no existe configuración global
//! mutable — quien cablea la aplicación decide qué inyectar, en el call-site.

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;

use crate::engine::PipelineVerdict;
use crate::errors::CoreCommandError;
use crate::message::{DefaultResolver, MessageResolver};
use crate::model::{ActionResult, Component, Context, Params};

/// Valor que atraviesa la frontera transaccional.
pub type TxBody = Result<PipelineVerdict, CoreCommandError>;

/// Validación de input + enriquecimiento de contexto.
///
/// El contrato es el único stage que puede poblar contexto a partir de
/// params (p.ej. buscar entidades); devuelve un resultado con
/// `component = Contract`, params coercionados y el contexto enriquecido —
/// incluso cuando falla, el contexto que alcanzó a poblar se conserva.
pub trait Contract: Send + Sync + Debug {
    fn call(&self, params: &Params, context: &Context) -> Result<ActionResult, CoreCommandError>;
}

/// Contrato trivial: acepta los params tal cual y no toca el contexto.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughContract;

impl Contract for PassthroughContract {
    fn call(&self, params: &Params, context: &Context) -> Result<ActionResult, CoreCommandError> {
        Ok(ActionResult::stage(Component::Contract, params.clone(), context.clone()))
    }
}

/// Frontera de atomicidad. El core no maneja locks, retries ni timeouts:
/// eso es responsabilidad de la implementación inyectada, que puede
/// inspeccionar el veredicto para decidir commit o rollback
/// (`BodyFailed`/`Err` ⇒ rollback).
pub trait Transaction: Send + Sync + Debug {
    fn call(&self, body: &mut dyn FnMut() -> TxBody) -> TxBody;
}

/// Sin transacción: ejecuta el bloque directamente.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransaction;

impl Transaction for NoTransaction {
    fn call(&self, body: &mut dyn FnMut() -> TxBody) -> TxBody {
        body()
    }
}

/// Difiere un hook hasta que la transacción que lo envuelve commitee.
/// Sin transacción pendiente, la invocación es inmediata. Los hooks son
/// `'static + Send` para que un scheduler que difiere pueda sobrevivir al
/// frame de la llamada.
pub trait AfterCommit: Send + Sync + Debug {
    fn schedule(&self, hook: Box<dyn FnOnce() + Send + 'static>);
}

/// Scheduler inmediato (no hay transacción que esperar).
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateAfterCommit;

impl AfterCommit for ImmediateAfterCommit {
    fn schedule(&self, hook: Box<dyn FnOnce() + Send + 'static>) {
        hook()
    }
}

/// Sink de observabilidad fire-and-forget (info o error según dónde se
/// inyecte). Puede estar ausente: el default no hace nada.
pub trait Reporter: Send + Sync + Debug {
    fn call(&self, message: &str, payload: &Value);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn call(&self, _message: &str, _payload: &Value) {}
}

/// Bundle de capabilities de un comando. Valor explícito pasado al builder;
/// `Default` cablea los no-op.
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub transaction: Arc<dyn Transaction>,
    pub after_commit: Arc<dyn AfterCommit>,
    pub info_reporter: Arc<dyn Reporter>,
    pub error_reporter: Arc<dyn Reporter>,
    pub resolver: Arc<dyn MessageResolver>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { transaction: Arc::new(NoTransaction),
               after_commit: Arc::new(ImmediateAfterCommit),
               info_reporter: Arc::new(NullReporter),
               error_reporter: Arc::new(NullReporter),
               resolver: Arc::new(DefaultResolver) }
    }
}
