//! Conflict detection between a candidate constraint and the live set.
//!
//! Two constraints conflict when they share at least one operand entity and
//! their predicates cannot both hold for any assignment in the domain. The
//! cheap structural check for recognized opposite-variant pairs runs first;
//! the semantic check (conjunction unsatisfiable over the full enumerated
//! space) is the fallback. Domains are small by design, so the exhaustive
//! fallback is bounded.

use pantry_core::{Constraint, ConstraintKind, DomainModel, PersonId};
use tracing::debug;

/// Returns the first existing constraint the candidate contradicts.
///
/// Existing constraints are scanned in insertion order and only the first
/// conflict is reported. An existing constraint with the candidate's own
/// identity also counts: duplicates are resolved through the same
/// replacement protocol as opposites.
pub fn detect<'a>(
    candidate: &Constraint,
    existing: &'a [Constraint],
    domain: &DomainModel,
) -> Option<&'a Constraint> {
    let candidate_id = candidate.id();
    for present in existing {
        if present.id() == candidate_id {
            debug!(event = "conflict_duplicate", id = %candidate_id);
            return Some(present);
        }
        if structurally_opposed(candidate.kind(), present.kind()) {
            debug!(
                event = "conflict_structural",
                candidate = %candidate_id,
                existing = %present.id(),
            );
            return Some(present);
        }
        if shares_operand(candidate.kind(), present.kind())
            && !jointly_satisfiable(candidate, present, domain)
        {
            debug!(
                event = "conflict_semantic",
                candidate = %candidate_id,
                existing = %present.id(),
            );
            return Some(present);
        }
    }
    None
}

/// Recognized opposite-variant pairs over identical operands.
///
/// Symmetric: checked in both directions.
fn structurally_opposed(a: &ConstraintKind, b: &ConstraintKind) -> bool {
    opposed_one_way(a, b) || opposed_one_way(b, a)
}

fn opposed_one_way(a: &ConstraintKind, b: &ConstraintKind) -> bool {
    use ConstraintKind::*;
    match (a, b) {
        (MustOrderFrom(p, s), MustNotOrderFrom(q, t)) => p == q && s == t,
        (SameShop(p, q), DifferentShop(r, t))
        | (SameItem(p, q), DifferentItem(r, t)) => same_pair((*p, *q), (*r, *t)),
        // A mandatory pick entirely inside a prohibited set.
        (MustPickOneOf(p, s, wanted), CannotPick(q, t, banned)) => {
            p == q && s == t && wanted.iter().all(|i| banned.contains(i))
        }
        _ => false,
    }
}

fn same_pair(a: (PersonId, PersonId), b: (PersonId, PersonId)) -> bool {
    a == b || (a.0, a.1) == (b.1, b.0)
}

/// True if the two constraints mention at least one common entity.
fn shares_operand(a: &ConstraintKind, b: &ConstraintKind) -> bool {
    let persons_meet = a.persons().iter().any(|p| b.persons().contains(p));
    let shops_meet = match (a.shop(), b.shop()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    };
    let items_meet = a.items().iter().any(|i| b.items().contains(i));
    persons_meet || shops_meet || items_meet
}

/// Exhaustive check: does any assignment satisfy both constraints?
fn jointly_satisfiable(a: &Constraint, b: &Constraint, domain: &DomainModel) -> bool {
    domain
        .assignments()
        .any(|assignment| a.evaluate(&assignment) && b.evaluate(&assignment))
}
