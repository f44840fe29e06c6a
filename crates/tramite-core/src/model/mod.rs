//! Modelo de datos del pipeline: componente, params/contexto y resultado.

pub mod component;
pub mod data;
pub mod result;

pub use component::Component;
pub use data::{merge_context, map_to_value, value_to_map, Context, Params};
pub use result::{ActionResult, CallbackRecord, ResultPatch};
