//! Post-hoc narrowing of an enumerated solution set.
//!
//! Filtering is a pure subset operation over already-computed solutions; it
//! never re-invokes the solver. Predicates combine conjunctively along one
//! documented axis: a solution passes when some person accepted by the
//! person predicate chose a shop and item accepted by the other two.
//! An omitted predicate accepts everything, so a filter with no predicates
//! is the identity.

use pantry_core::{ItemId, PersonId, ShopId};

use crate::solve::Solution;

type PersonPred = Box<dyn Fn(PersonId) -> bool>;
type ShopPred = Box<dyn Fn(ShopId) -> bool>;
type ItemPred = Box<dyn Fn(ItemId) -> bool>;

/// Optional person/shop/item predicates applied to solved assignments.
///
/// # Example
///
/// ```
/// use pantry_core::DomainModel;
/// use pantry_engine::{ConstraintStore, SolutionFilter, Solver};
///
/// let domain = DomainModel::builder()
///     .person("Alice")
///     .shop("Fruit", ["Apple"])
///     .shop("Grocery", ["Bread"])
///     .build()
///     .unwrap();
/// let store = ConstraintStore::new();
/// let all = Solver::solve_all(&store, &domain);
/// assert_eq!(all.len(), 2);
///
/// let fruit = domain.shop("Fruit").unwrap();
/// let filter = SolutionFilter::new().shop(move |s| s == fruit);
/// assert_eq!(filter.apply(all).len(), 1);
/// ```
#[derive(Default)]
pub struct SolutionFilter {
    person: Option<PersonPred>,
    shop: Option<ShopPred>,
    item: Option<ItemPred>,
}

impl SolutionFilter {
    /// Creates a filter with every axis skipped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the person axis.
    pub fn person(mut self, pred: impl Fn(PersonId) -> bool + 'static) -> Self {
        self.person = Some(Box::new(pred));
        self
    }

    /// Restricts the shop axis.
    pub fn shop(mut self, pred: impl Fn(ShopId) -> bool + 'static) -> Self {
        self.shop = Some(Box::new(pred));
        self
    }

    /// Restricts the item axis.
    pub fn item(mut self, pred: impl Fn(ItemId) -> bool + 'static) -> Self {
        self.item = Some(Box::new(pred));
        self
    }

    /// Returns true if the solution passes all configured predicates.
    pub fn matches(&self, solution: &Solution) -> bool {
        solution.assignment().iter().any(|(person, choice)| {
            self.person.as_ref().map_or(true, |p| p(person))
                && self.shop.as_ref().map_or(true, |p| p(choice.shop))
                && self.item.as_ref().map_or(true, |p| p(choice.item))
        })
    }

    /// Narrows a solution sequence, preserving order.
    pub fn apply(&self, mut solutions: Vec<Solution>) -> Vec<Solution> {
        solutions.retain(|s| self.matches(s));
        solutions
    }
}

impl std::fmt::Debug for SolutionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolutionFilter")
            .field("person", &self.person.is_some())
            .field("shop", &self.shop.is_some())
            .field("item", &self.item.is_some())
            .finish()
    }
}
