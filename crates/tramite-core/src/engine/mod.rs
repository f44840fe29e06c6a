//! El orquestador del pipeline.
//!
//! Provee la máquina de estados que secuencia contract → policies →
//! idempotency → preconditions → operation → callbacks, con la regla de
//! "check-before-you-can-validate" para no enmascarar fallos de
//! autorización/estado detrás de ruido de validación.

pub mod core;

pub use core::PipelineVerdict;
