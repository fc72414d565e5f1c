//! Infrastructure layer: boundary traits, implementations and DI container
//!
//! This layer implements the collaborator traits and wires up services.

pub mod di;
pub mod error;
pub mod traits;

pub use error::{InfraError, InfraResult};
