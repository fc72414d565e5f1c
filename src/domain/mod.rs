//! Domain layer: entities and tree structure
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod templates;

pub use arena::MenuTree;
pub use entities::*;
pub use error::DomainError;
pub use templates::{LevelTemplates, RawTemplateSet, TemplateSet};
