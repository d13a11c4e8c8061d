//! Error types for slot-engine operations.

use std::fmt;

use thiserror::Error;

use crate::validate::Violations;

/// The kind of stored entity an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    WeeklyRule,
    DateException,
    AdHocSlot,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::WeeklyRule => "weekly rule",
            EntityKind::DateException => "date exception",
            EntityKind::AdHocSlot => "ad-hoc slot",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    /// The candidate broke one or more invariants. Raised before any write
    /// reaches the store.
    #[error("Validation failed: {0}")]
    Validation(Violations),

    /// The store rejected a write that would break a uniqueness invariant.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An edit, delete or fetch targeted an id the store does not know.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// The store could not be reached or timed out.
    #[error("Store unavailable: {0}")]
    Transport(String),
}

impl From<Violations> for EngineError {
    fn from(violations: Violations) -> Self {
        EngineError::Validation(violations)
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
