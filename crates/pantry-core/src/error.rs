//! Error types for pantry-core

use thiserror::Error;

/// Errors raised while constructing or parsing constraints.
///
/// Construction errors are local and immediate: a constraint that fails
/// validation never reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstraintError {
    /// An operand is not a member of its entity's fixed set.
    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    /// The constraint template tag is not one of the recognized variants.
    #[error("unsupported constraint template: {0:?}")]
    UnsupportedVariant(String),

    /// An item-set variant was given no items.
    #[error("item-set constraint requires at least one item")]
    EmptyItemSet,
}

/// Errors raised while building a domain model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Error in domain model definition
    #[error("domain model error: {0}")]
    Invalid(String),
}

/// Result type alias for constraint construction.
pub type Result<T> = std::result::Result<T, ConstraintError>;
