//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on boundary traits (TableCatalog, RequestContext, ...)
//! but are themselves concrete structs, not traits.

mod builder;
mod renderer;

pub use builder::{Guards, TreeBuilder};
pub use renderer::TreeRenderer;
