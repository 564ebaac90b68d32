//! Exhaustive solver over the assignment space.
//!
//! The solver walks the Cartesian product of per-person choice sets lazily
//! and keeps the assignments that satisfy every active constraint.
//! Enumeration is deterministic: the same constraint-set version always
//! yields the same sequence in the same order. An empty result means "no
//! solutions", which is a valid outcome, not a failure.
//!
//! Logging levels:
//! - **INFO**: solve start/end with problem scale and solution counts
//! - **DEBUG**: store mutations and conflict decisions (see `store`)

use pantry_core::domain::AssignmentIter;
use pantry_core::{Assignment, Constraint, DomainModel};
use tracing::info;

use crate::store::ConstraintStore;

/// An assignment verified to satisfy every active constraint.
///
/// Immutable once produced. The version stamp ties it to the constraint-set
/// version that generated it; a solution is stale once the store mutates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    assignment: Assignment,
    version: u64,
}

impl Solution {
    /// Returns the underlying assignment.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Returns the constraint-set version this solution was solved against.
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Lazy, finite, restartable stream of solutions.
///
/// Restartable in the sense that [`Solver::solve`] on an unchanged store
/// produces a fresh iterator yielding the identical sequence.
#[derive(Debug)]
pub struct SolutionIter {
    candidates: AssignmentIter,
    constraints: Vec<Constraint>,
    version: u64,
}

impl Iterator for SolutionIter {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        // Fail-fast: constraints are pre-sorted cheapest first, and each
        // candidate is dropped on the first violated constraint.
        for assignment in self.candidates.by_ref() {
            if self.constraints.iter().all(|c| c.evaluate(&assignment)) {
                return Some(Solution {
                    assignment,
                    version: self.version,
                });
            }
        }
        None
    }
}

/// Exhaustive enumerator for the current constraint set.
///
/// # Example
///
/// ```
/// use pantry_core::{Constraint, ConstraintKind, DomainModel, NullJournal, Provenance};
/// use pantry_engine::{ConstraintStore, Solver};
///
/// let domain = DomainModel::builder()
///     .person("Alice")
///     .person("Bobby")
///     .shop("Fruit", ["Apple", "Bread"])
///     .shop("Grocery", ["Apple", "Bread"])
///     .build()
///     .unwrap();
///
/// let bobby = domain.person("Bobby").unwrap();
/// let fruit = domain.shop("Fruit").unwrap();
/// let mut store = ConstraintStore::new();
/// let mut journal = NullJournal;
/// store
///     .propose(
///         Constraint::new(ConstraintKind::MustOrderFrom(bobby, fruit), Provenance::Custom, &domain).unwrap(),
///         &domain,
///         &mut journal,
///     )
///     .unwrap();
///
/// // Bobby is pinned to the Fruit shop (2 item choices), Alice is free (4).
/// let solutions: Vec<_> = Solver::solve(&store, &domain).collect();
/// assert_eq!(solutions.len(), 8);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Solver;

impl Solver {
    /// Lazily enumerates every satisfying assignment.
    ///
    /// Constraints are evaluated cheapest-arity first; correctness does not
    /// depend on the order, only enumeration cost does.
    pub fn solve(store: &ConstraintStore, domain: &DomainModel) -> SolutionIter {
        let mut constraints: Vec<Constraint> = store.constraints().to_vec();
        constraints.sort_by_key(|c| c.kind().arity());
        SolutionIter {
            candidates: domain.assignments(),
            constraints,
            version: store.version(),
        }
    }

    /// Enumerates eagerly, logging problem scale and the outcome.
    pub fn solve_all(store: &ConstraintStore, domain: &DomainModel) -> Vec<Solution> {
        info!(
            event = "solve_start",
            person_count = domain.person_count(),
            choice_count = domain.choices().len(),
            constraint_count = store.len(),
        );
        let solutions: Vec<Solution> = Self::solve(store, domain).collect();
        info!(event = "solve_end", solution_count = solutions.len());
        solutions
    }
}
