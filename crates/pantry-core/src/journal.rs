//! The narrow interface through which constraint persistence is reached.
//!
//! The engine never touches the on-disk record directly: the store calls a
//! [`ConstraintJournal`] on every successful mutation so the record stays in
//! sync. Journal failures are surfaced to the caller but leave the in-memory
//! constraint set authoritative for the session.

use thiserror::Error;

use crate::constraint::{Constraint, ConstraintId};

/// A persistence collaborator failed.
///
/// Non-fatal: the in-memory constraint set remains valid, but the change may
/// not survive a restart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("constraint journal failure: {message}")]
pub struct JournalError {
    /// What went wrong, for display.
    pub message: String,
}

impl JournalError {
    /// Creates a journal error from any displayable cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Persistence target for the constraint record.
///
/// Implementations serialize constraint definitions only; solutions are
/// never persisted.
pub trait ConstraintJournal {
    /// Records a newly added constraint.
    fn append(&mut self, constraint: &Constraint) -> Result<(), JournalError>;

    /// Removes a constraint from the record.
    fn remove(&mut self, id: &ConstraintId) -> Result<(), JournalError>;

    /// Rewrites the record to exactly the given set.
    ///
    /// Used after replacements and annotation edits, where an in-place
    /// update would need the old and new identity at once.
    fn replace_all(&mut self, constraints: &[Constraint]) -> Result<(), JournalError>;
}

/// A journal that records nothing. Useful for tests and ephemeral sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullJournal;

impl ConstraintJournal for NullJournal {
    fn append(&mut self, _constraint: &Constraint) -> Result<(), JournalError> {
        Ok(())
    }

    fn remove(&mut self, _id: &ConstraintId) -> Result<(), JournalError> {
        Ok(())
    }

    fn replace_all(&mut self, _constraints: &[Constraint]) -> Result<(), JournalError> {
        Ok(())
    }
}
