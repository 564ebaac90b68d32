//! Pantry Engine - constraint management and exhaustive enumeration
//!
//! The engine assigns `(person, shop, item)` combinations under a live set
//! of logical constraints:
//! - [`ConstraintStore`] holds the ordered set and runs the mandatory
//!   two-phase add/confirm protocol for conflicting insertions
//! - [`conflict::detect`] finds the first existing constraint a candidate
//!   contradicts, structurally first and semantically as a fallback
//! - [`Solver`] lazily enumerates every satisfying assignment
//! - [`SolutionFilter`] narrows an enumerated result without re-solving
//! - [`Engine`] wires the pieces together behind the API consumed by the
//!   interactive layer
//!
//! The engine is single-threaded and I/O-free; persistence is reached only
//! through the `ConstraintJournal` trait from `pantry-core`.

pub mod conflict;
pub mod engine;
pub mod error;
pub mod filter;
pub mod solve;
pub mod store;

#[cfg(test)]
mod tests;

pub use engine::Engine;
pub use error::{EngineError, Result};
pub use filter::SolutionFilter;
pub use solve::{Solution, SolutionIter, Solver};
pub use store::{ConstraintStore, Proposal};
