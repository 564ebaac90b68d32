//! The live constraint set and its two-phase mutation protocol.
//!
//! The store holds the ordered, identity-unique constraint set, partitioned
//! by provenance. Mutations go through `propose`: a conflicting candidate is
//! parked rather than applied, and only an explicit `confirm_replace` or
//! `discard` settles it. There is no silent overwrite.
//!
//! Every successful mutation notifies the [`ConstraintJournal`] so the
//! on-disk record stays in sync; a journal failure surfaces as
//! [`EngineError::Persistence`] while the in-memory change stands.

use pantry_core::{
    Constraint, ConstraintId, ConstraintJournal, DomainModel, Provenance,
};
use tracing::debug;

use crate::conflict;
use crate::error::{EngineError, Result};

/// Outcome of proposing a constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    /// No conflict: the constraint is now in the store.
    Added(ConstraintId),
    /// The candidate contradicts an existing constraint.
    ///
    /// Nothing was mutated. The candidate is parked; settle it with
    /// [`ConstraintStore::confirm_replace`] or [`ConstraintStore::discard`].
    Conflict {
        /// Identity of the first conflicting existing constraint.
        existing: ConstraintId,
        /// Identity the candidate would take if confirmed.
        candidate: ConstraintId,
    },
}

#[derive(Debug, Clone)]
struct PendingReplace {
    existing: ConstraintId,
    candidate: Constraint,
}

/// Ordered collection of active constraints with unique identities.
///
/// `version` increases on every mutation that can change the solution set;
/// solutions are stamped with the version that produced them and are stale
/// once it moves on.
#[derive(Debug, Default)]
pub struct ConstraintStore {
    constraints: Vec<Constraint>,
    pending: Option<PendingReplace>,
    version: u64,
}

impl ConstraintStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from an already-loaded constraint set.
    ///
    /// Used at startup with the persistence collaborator's `load` result.
    /// Rejects duplicate identities rather than dropping one silently.
    pub fn with_constraints(initial: Vec<Constraint>) -> Result<Self> {
        for (i, c) in initial.iter().enumerate() {
            let id = c.id();
            if initial[..i].iter().any(|prior| prior.id() == id) {
                return Err(EngineError::DuplicateIdentity(id));
            }
        }
        Ok(Self {
            constraints: initial,
            pending: None,
            version: 0,
        })
    }

    /// Returns the current mutation version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the number of active constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns true if no constraints are active.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Looks up a constraint by identity.
    pub fn get(&self, id: &ConstraintId) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.id() == *id)
    }

    /// Iterates constraints in insertion order, optionally by provenance.
    pub fn list(
        &self,
        provenance: Option<Provenance>,
    ) -> impl Iterator<Item = &Constraint> {
        self.constraints
            .iter()
            .filter(move |c| provenance.map_or(true, |p| c.provenance() == p))
    }

    /// Returns the active constraints as a slice, in insertion order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns true if a conflicting candidate is parked awaiting a decision.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Proposes a constraint for insertion.
    ///
    /// Runs conflict detection against the current set. Without a conflict
    /// the constraint is inserted and journaled; with one, the candidate is
    /// parked and [`Proposal::Conflict`] names the existing constraint so
    /// the caller can ask the user. Proposing again while a candidate is
    /// parked discards the parked one first.
    pub fn propose(
        &mut self,
        candidate: Constraint,
        domain: &DomainModel,
        journal: &mut dyn ConstraintJournal,
    ) -> Result<Proposal> {
        self.pending = None;
        if let Some(existing) = conflict::detect(&candidate, &self.constraints, domain) {
            let existing_id = existing.id();
            let candidate_id = candidate.id();
            self.pending = Some(PendingReplace {
                existing: existing_id.clone(),
                candidate,
            });
            return Ok(Proposal::Conflict {
                existing: existing_id,
                candidate: candidate_id,
            });
        }

        let id = candidate.id();
        // The in-memory insertion happens regardless of journal outcome; a
        // journal failure is surfaced but leaves this set authoritative.
        let journaled = journal.append(&candidate);
        self.constraints.push(candidate);
        self.version += 1;
        debug!(event = "constraint_added", id = %id, version = self.version);
        journaled?;
        Ok(Proposal::Added(id))
    }

    /// Applies a parked replacement: removes the conflicting existing
    /// constraint and inserts the candidate.
    ///
    /// Exactly one of the two constraints remains afterwards. Fails with
    /// [`EngineError::NoPendingProposal`] when nothing is parked.
    pub fn confirm_replace(
        &mut self,
        journal: &mut dyn ConstraintJournal,
    ) -> Result<ConstraintId> {
        let PendingReplace {
            existing,
            candidate,
        } = self.pending.take().ok_or(EngineError::NoPendingProposal)?;

        self.constraints.retain(|c| c.id() != existing);
        let id = candidate.id();
        self.constraints.push(candidate);
        self.version += 1;
        debug!(
            event = "constraint_replaced",
            removed = %existing,
            added = %id,
            version = self.version,
        );
        journal.replace_all(&self.constraints)?;
        Ok(id)
    }

    /// Drops a parked candidate, leaving the store unchanged.
    ///
    /// Returns whether a candidate was actually parked.
    pub fn discard(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Removes a constraint by identity.
    pub fn remove(
        &mut self,
        id: &ConstraintId,
        journal: &mut dyn ConstraintJournal,
    ) -> Result<Constraint> {
        let position = self
            .constraints
            .iter()
            .position(|c| c.id() == *id)
            .ok_or_else(|| EngineError::NotFound(id.clone()))?;
        let removed = self.constraints.remove(position);
        self.version += 1;
        debug!(event = "constraint_removed", id = %id, version = self.version);
        journal.remove(id)?;
        Ok(removed)
    }

    /// Updates display annotations only; `None` keeps the current value.
    ///
    /// The evaluation predicate and identity are untouched, so the version
    /// does not change and previously enumerated solutions stay valid.
    pub fn edit_annotation(
        &mut self,
        id: &ConstraintId,
        fol: Option<String>,
        pl: Option<String>,
        journal: &mut dyn ConstraintJournal,
    ) -> Result<()> {
        let constraint = self
            .constraints
            .iter_mut()
            .find(|c| c.id() == *id)
            .ok_or_else(|| EngineError::NotFound(id.clone()))?;
        constraint.set_annotations(fol, pl);
        journal.replace_all(&self.constraints)?;
        Ok(())
    }
}
