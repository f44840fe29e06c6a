//! tramite-core: Motor de orquestación de operaciones de negocio
//!
//! Dado el input del usuario ("params") y un contexto ambiente, ejecuta un
//! pipeline fijo de etapas — contrato, autorización, idempotencia,
//! precondiciones, cuerpo y callbacks — produciendo un `ActionResult`
//! uniforme que registra qué etapa cortó la ejecución y por qué.

pub mod capability;
pub mod check;
pub mod command;
pub mod engine;
pub mod errors;
pub mod message;
pub mod model;
pub mod stage;

pub use capability::{AfterCommit, Capabilities, Contract, ImmediateAfterCommit, NoTransaction,
                     NullReporter, PassthroughContract, Reporter, Transaction, TxBody};
pub use check::{check_fn, with_context_keys, Check, CheckList, CheckOutcome};
pub use command::{Command, CommandBuilder};
pub use engine::PipelineVerdict;
pub use errors::{CoreCommandError, StrictCallError};
pub use message::{normalize_failure, DefaultResolver, Message, MessageResolver, MessageSet,
                  RenderOptions};
pub use model::{merge_context, value_to_map, ActionResult, CallbackRecord, Component, Context,
                Params, ResultPatch};
pub use stage::{body_fn, callback_fn, idempotency_fn, BodyOutcome, Callback, IdempotencyCheck,
                OperationBody, UNAUTHORIZED};
