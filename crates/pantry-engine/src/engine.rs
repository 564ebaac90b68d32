//! Engine facade: the API consumed by the interactive layer.
//!
//! Wires the domain model, the constraint store, and the persistence
//! journal. All operations run to completion before returning; reads always
//! observe a fully settled constraint set.

use pantry_core::{
    Constraint, ConstraintId, ConstraintJournal, ConstraintKind, DomainModel, Operands,
    Provenance,
};

use crate::error::{EngineError, Result};
use crate::filter::SolutionFilter;
use crate::solve::{Solution, SolutionIter, Solver};
use crate::store::{ConstraintStore, Proposal};

/// The constraint-satisfaction engine.
///
/// Owns the only shared mutable resource, the constraint set, and mutates it
/// exclusively through the two-phase propose/confirm protocol.
///
/// # Example
///
/// ```
/// use pantry_core::{DomainModel, NullJournal, Operands};
/// use pantry_engine::{Engine, Proposal};
///
/// let domain = DomainModel::builder()
///     .person("Alice")
///     .person("Bobby")
///     .shop("Fruit", ["Apple", "Bread"])
///     .shop("Grocery", ["Apple", "Bread"])
///     .build()
///     .unwrap();
/// let mut engine = Engine::new(domain, Vec::new(), NullJournal).unwrap();
///
/// let bobby = engine.domain().person("Bobby").unwrap();
/// let fruit = engine.domain().shop("Fruit").unwrap();
/// let ops = Operands { person: Some(bobby), shop: Some(fruit), ..Default::default() };
/// let outcome = engine.propose_template("must_order", ops, None, None).unwrap();
/// assert!(matches!(outcome, Proposal::Added(_)));
///
/// let solutions = engine.solve_all();
/// assert!(solutions.iter().all(|s| s.assignment().shop_of(bobby) == fruit));
/// ```
pub struct Engine<J: ConstraintJournal> {
    domain: DomainModel,
    store: ConstraintStore,
    journal: J,
}

impl<J: ConstraintJournal> Engine<J> {
    /// Creates an engine over a domain, an initial constraint set (normally
    /// the journal's `load` result), and the persistence journal.
    pub fn new(domain: DomainModel, initial: Vec<Constraint>, journal: J) -> Result<Self> {
        let store = ConstraintStore::with_constraints(initial)?;
        Ok(Self {
            domain,
            store,
            journal,
        })
    }

    /// Returns the domain model.
    pub fn domain(&self) -> &DomainModel {
        &self.domain
    }

    /// Returns the constraint store for read access.
    pub fn store(&self) -> &ConstraintStore {
        &self.store
    }

    /// Lists active constraints, optionally filtered by provenance.
    pub fn list_constraints(&self, provenance: Option<Provenance>) -> Vec<&Constraint> {
        self.store.list(provenance).collect()
    }

    /// Proposes an already-constructed constraint.
    pub fn propose_constraint(&mut self, constraint: Constraint) -> Result<Proposal> {
        self.store
            .propose(constraint, &self.domain, &mut self.journal)
    }

    /// Builds a custom constraint from a recognized template tag and
    /// operands, attaches annotations, and proposes it.
    ///
    /// Unknown tags fail with `UnsupportedVariant`; operands outside the
    /// domain fail with `InvalidOperand`. Neither reaches the store.
    pub fn propose_template(
        &mut self,
        tag: &str,
        ops: Operands,
        fol: Option<String>,
        pl: Option<String>,
    ) -> Result<Proposal> {
        let kind = ConstraintKind::from_template(tag, ops)?;
        let mut constraint = Constraint::new(kind, Provenance::Custom, &self.domain)?;
        constraint.set_annotations(fol, pl);
        self.propose_constraint(constraint)
    }

    /// Confirms the parked replacement from the last conflicting proposal.
    pub fn confirm_replace(&mut self) -> Result<ConstraintId> {
        self.store.confirm_replace(&mut self.journal)
    }

    /// Discards the parked candidate, if any.
    pub fn discard(&mut self) -> bool {
        self.store.discard()
    }

    /// Removes a constraint by identity.
    pub fn remove_constraint(&mut self, id: &ConstraintId) -> Result<Constraint> {
        self.store.remove(id, &mut self.journal)
    }

    /// Updates a constraint's display annotations; `None` keeps the current
    /// value. Never changes the evaluation predicate.
    pub fn edit_annotation(
        &mut self,
        id: &ConstraintId,
        fol: Option<String>,
        pl: Option<String>,
    ) -> Result<()> {
        self.store
            .edit_annotation(id, fol, pl, &mut self.journal)
    }

    /// Enumerates all satisfying assignments eagerly.
    ///
    /// An empty vector means the current set is unsatisfiable over the
    /// domain; that is a valid outcome, not an error.
    pub fn solve_all(&self) -> Vec<Solution> {
        Solver::solve_all(&self.store, &self.domain)
    }

    /// Lazily enumerates satisfying assignments.
    pub fn solve_iter(&self) -> SolutionIter {
        Solver::solve(&self.store, &self.domain)
    }

    /// Solves, then narrows the result with the given filter.
    pub fn solve_filtered(&self, filter: &SolutionFilter) -> Vec<Solution> {
        filter.apply(self.solve_all())
    }

    /// Resolves a person name, for callers working with user input.
    pub fn person(&self, name: &str) -> Result<pantry_core::PersonId> {
        self.domain.person(name).ok_or(EngineError::UnknownName {
            entity: "person",
            name: name.to_string(),
        })
    }

    /// Resolves a shop name.
    pub fn shop(&self, name: &str) -> Result<pantry_core::ShopId> {
        self.domain.shop(name).ok_or(EngineError::UnknownName {
            entity: "shop",
            name: name.to_string(),
        })
    }

    /// Resolves an item name.
    pub fn item(&self, name: &str) -> Result<pantry_core::ItemId> {
        self.domain.item(name).ok_or(EngineError::UnknownName {
            entity: "item",
            name: name.to_string(),
        })
    }
}
