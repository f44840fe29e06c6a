//! Agregación y resolución de mensajes de fallo.

pub mod normalize;
pub mod resolver;
pub mod set;
pub mod types;

pub use normalize::normalize_failure;
pub use resolver::{DefaultResolver, MessageResolver};
pub use set::MessageSet;
pub use types::{Message, RenderOptions};
