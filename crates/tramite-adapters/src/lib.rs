//! tramite-adapters: Capa de adaptación Aplicación ↔ Core
//!
//! El core sólo declara las capabilities de frontera (contrato, transacción,
//! scheduler after-commit, reporters, resolver); este crate provee
//! implementaciones reutilizables:
//! - `KeyContract`: contrato por claves requeridas + lookups de contexto.
//! - `InMemoryUnitOfWork`: transacción in-memory con cola after-commit
//!   (difiere callbacks de pipelines anidados hasta el commit más externo).
//! - `CollectingReporter`: sink de observabilidad para tests y demos.
//! - `TableResolver`: resolución de mensajes por tabla de locales.

pub mod contract;
pub mod reporters;
pub mod resolver;
pub mod uow;

pub use contract::KeyContract;
pub use reporters::CollectingReporter;
pub use resolver::TableResolver;
pub use uow::InMemoryUnitOfWork;
