//! Pantry - exhaustive shop/item assignment under user constraints
//!
//! Each person orders exactly one item from exactly one shop; constraints
//! narrow which combined assignments are acceptable. The engine enumerates
//! every satisfying assignment exhaustively, so "no solutions" is a definite
//! answer, not a search timeout.
//!
//! # Example
//!
//! ```rust
//! use pantry::prelude::*;
//!
//! let domain = DomainConfig::default().to_domain_model().unwrap();
//! let initial = default_constraints(&domain).unwrap();
//! let engine = Engine::new(domain, initial, NullJournal).unwrap();
//!
//! let solutions = engine.solve_all();
//! assert!(!solutions.is_empty());
//! ```

// Domain model
pub use pantry_core::{
    Assignment, Choice, DomainModel, ItemId, PersonId, ShopId,
};

// Constraint representation
pub use pantry_core::{
    Constraint, ConstraintId, ConstraintKind, CountBound, ItemSet, Operands, Provenance,
};

// Errors and persistence seam
pub use pantry_core::{
    ConstraintError, ConstraintJournal, DomainError, JournalError, NullJournal,
};

// Engine, solver, and filter
pub use pantry_engine::{
    ConstraintStore, Engine, EngineError, Proposal, Solution, SolutionFilter, SolutionIter,
    Solver,
};

// Configuration and file-backed persistence
pub use pantry_config::{
    default_constraints, BoundRecord, ConfigError, ConstraintRecord, DomainConfig, FileJournal,
    ShopConfig,
};

pub mod prelude {
    pub use super::{
        default_constraints, Assignment, Constraint, ConstraintKind, CountBound, DomainConfig,
        DomainModel, Engine, FileJournal, NullJournal, Operands, Proposal, Provenance,
        SolutionFilter,
    };
}
