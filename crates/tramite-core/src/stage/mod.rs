//! Los componentes de etapa del pipeline.
//!
//! Cada uno crea un `ActionResult` fresco con su `Component`; el orquestador
//! (módulo `engine`) decide el orden, los short-circuits y el enhebrado de
//! params/contexto entre etapas.

pub mod callbacks;
pub mod idempotency;
pub mod operation;
pub mod policy;
pub mod preconditions;

pub use callbacks::{callback_fn, run_callbacks, Callback};
pub use idempotency::{idempotency_fn, IdempotencyCheck, IdempotencyGate};
pub use operation::{body_fn, BodyOutcome, Operation, OperationBody};
pub use policy::{Policies, UNAUTHORIZED};
pub use preconditions::Preconditions;
