//! Pantry Core - Domain and constraint types for shop/item assignment
//!
//! This crate provides the fundamental abstractions for the pantry engine:
//! - The domain model: finite person/shop/item sets and assignments
//! - The closed constraint representation with structural identities
//! - The journal trait through which constraint persistence is reached
//! - The error taxonomy shared across the workspace

pub mod constraint;
pub mod domain;
pub mod error;
pub mod journal;


pub use constraint::{
    Constraint, ConstraintId, ConstraintKind, CountBound, ItemSet, Operands, Provenance,
};
pub use domain::{Assignment, Choice, DomainModel, ItemId, PersonId, ShopId};
pub use error::{ConstraintError, DomainError};
pub use journal::{ConstraintJournal, JournalError, NullJournal};
