//! Error types for the engine.

use thiserror::Error;

use pantry_core::{ConstraintError, ConstraintId, JournalError};

/// Main error type for engine operations.
///
/// A [`Proposal::Conflict`](crate::store::Proposal) is not an error: it is a
/// decision point returned as ordinary data. Errors here are genuine
/// failures or invalid references.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An operation referenced a constraint identity that is not in the store.
    #[error("constraint not found: {0}")]
    NotFound(ConstraintId),

    /// `confirm_replace` was called with no proposal pending.
    #[error("no constraint proposal is pending")]
    NoPendingProposal,

    /// The initial constraint set contained two constraints with one identity.
    #[error("duplicate constraint identity in initial set: {0}")]
    DuplicateIdentity(ConstraintId),

    /// A name or operand failed constraint construction.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// The persistence collaborator failed.
    ///
    /// The in-memory mutation has been applied and remains authoritative for
    /// the session; the change may not survive a restart.
    #[error("persistence failure (in-memory state retained): {0}")]
    Persistence(#[from] JournalError),

    /// An entity name was not found in the domain model.
    #[error("unknown {entity} name: {name:?}")]
    UnknownName {
        /// Entity kind: "person", "shop", or "item".
        entity: &'static str,
        /// The name that failed to resolve.
        name: String,
    },
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
