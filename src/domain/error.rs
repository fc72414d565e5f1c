//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent a malformed menu or a missing collaborator.
/// Guard predicates that exclude a node are not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid level {level}: {reason}")]
    InvalidLevel { level: i64, reason: String },

    #[error("unsupported guard '{guard}': no predicate configured")]
    UnsupportedGuard { guard: String },

    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),
}

impl DomainError {
    pub fn invalid_level(level: i64, reason: impl Into<String>) -> Self {
        Self::InvalidLevel {
            level,
            reason: reason.into(),
        }
    }
}
