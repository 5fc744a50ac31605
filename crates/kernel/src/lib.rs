//! Settings, module contract, and lifecycle registry for the shelf service.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module, TableDefinition};
pub use registry::ModuleRegistry;
