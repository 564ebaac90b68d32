//! Constraint representation: a closed set of variants over domain entities.
//!
//! Constraints are a tagged union ([`ConstraintKind`]) with an explicit
//! evaluation function per tag, so new variants are compile-time-checked
//! additions. Each constraint exposes a structural identity
//! ([`ConstraintId`]) under which logically-equivalent restatements collide:
//! `DifferentShop(A, B)` and `DifferentShop(B, A)` share one identity.

use std::fmt;

use smallvec::SmallVec;

use crate::domain::{Assignment, DomainModel, ItemId, PersonId, ShopId};
use crate::error::ConstraintError;

/// Inline item-set operand. Catalogs are small, so item sets are too.
pub type ItemSet = SmallVec<[ItemId; 4]>;

/// Whether a constraint came from the mandated default set or a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Part of the built-in default set loaded at startup.
    Default,
    /// Added by a user at runtime.
    Custom,
}

/// Bound on the number of persons assigned to a shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountBound {
    /// Exactly `n` persons.
    Exactly(u32),
    /// At least `n` persons.
    AtLeast(u32),
    /// At most `n` persons.
    AtMost(u32),
}

impl CountBound {
    /// Returns true if `n` satisfies the bound.
    pub fn accepts(self, n: u32) -> bool {
        match self {
            CountBound::Exactly(want) => n == want,
            CountBound::AtLeast(min) => n >= min,
            CountBound::AtMost(max) => n <= max,
        }
    }
}

impl fmt::Display for CountBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountBound::Exactly(n) => write!(f, "exactly {n}"),
            CountBound::AtLeast(n) => write!(f, "at least {n}"),
            CountBound::AtMost(n) => write!(f, "at most {n}"),
        }
    }
}

/// The closed set of constraint variants.
///
/// Pair variants (`SameShop`, `DifferentShop`, `SameItem`, `DifferentItem`)
/// are order-symmetric: operand order does not affect meaning or identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Two persons order from the same shop.
    SameShop(PersonId, PersonId),
    /// Two persons order from different shops.
    DifferentShop(PersonId, PersonId),
    /// Two persons pick the same item.
    SameItem(PersonId, PersonId),
    /// Two persons pick different items.
    DifferentItem(PersonId, PersonId),
    /// A person orders from a given shop.
    MustOrderFrom(PersonId, ShopId),
    /// A person does not order from a given shop.
    MustNotOrderFrom(PersonId, ShopId),
    /// A person orders from the shop and picks one of the listed items.
    MustPickOneOf(PersonId, ShopId, ItemSet),
    /// A person never picks any of the listed items at the shop.
    CannotPick(PersonId, ShopId, ItemSet),
    /// The number of persons ordering from the shop satisfies the bound.
    ShopCount(ShopId, CountBound),
}

impl ConstraintKind {
    /// Evaluates this constraint against an assignment.
    ///
    /// Pure and total: the result depends only on the assignment.
    pub fn evaluate(&self, assignment: &Assignment) -> bool {
        match self {
            ConstraintKind::SameShop(a, b) => assignment.shop_of(*a) == assignment.shop_of(*b),
            ConstraintKind::DifferentShop(a, b) => {
                assignment.shop_of(*a) != assignment.shop_of(*b)
            }
            ConstraintKind::SameItem(a, b) => assignment.item_of(*a) == assignment.item_of(*b),
            ConstraintKind::DifferentItem(a, b) => {
                assignment.item_of(*a) != assignment.item_of(*b)
            }
            ConstraintKind::MustOrderFrom(p, s) => assignment.shop_of(*p) == *s,
            ConstraintKind::MustNotOrderFrom(p, s) => assignment.shop_of(*p) != *s,
            ConstraintKind::MustPickOneOf(p, s, items) => {
                assignment.shop_of(*p) == *s && items.contains(&assignment.item_of(*p))
            }
            ConstraintKind::CannotPick(p, s, items) => {
                assignment.shop_of(*p) != *s || !items.contains(&assignment.item_of(*p))
            }
            ConstraintKind::ShopCount(s, bound) => {
                let n = assignment.iter().filter(|(_, c)| c.shop == *s).count();
                bound.accepts(n as u32)
            }
        }
    }

    /// Returns the template tag of this variant.
    ///
    /// Tags are the fixed set recognized by [`ConstraintKind::from_template`].
    pub fn template_tag(&self) -> &'static str {
        match self {
            ConstraintKind::SameShop(..) => "same_shop",
            ConstraintKind::DifferentShop(..) => "different_shop",
            ConstraintKind::SameItem(..) => "same_selection",
            ConstraintKind::DifferentItem(..) => "different_selection",
            ConstraintKind::MustOrderFrom(..) => "must_order",
            ConstraintKind::MustNotOrderFrom(..) => "must_not_order",
            ConstraintKind::MustPickOneOf(..) => "must_select",
            ConstraintKind::CannotPick(..) => "cannot_select",
            ConstraintKind::ShopCount(..) => "shop_count",
        }
    }

    /// Constructs a variant from a template tag and operand bundle.
    ///
    /// Returns [`ConstraintError::UnsupportedVariant`] for unrecognized tags
    /// and [`ConstraintError::InvalidOperand`] when a required operand is
    /// missing. Entity-set membership is checked later by
    /// [`Constraint::new`].
    pub fn from_template(tag: &str, ops: Operands) -> Result<Self, ConstraintError> {
        let kind = match tag {
            "same_shop" => ConstraintKind::SameShop(ops.person()?, ops.other()?),
            "different_shop" => ConstraintKind::DifferentShop(ops.person()?, ops.other()?),
            "same_selection" => ConstraintKind::SameItem(ops.person()?, ops.other()?),
            "different_selection" => ConstraintKind::DifferentItem(ops.person()?, ops.other()?),
            "must_order" => ConstraintKind::MustOrderFrom(ops.person()?, ops.shop()?),
            "must_not_order" => ConstraintKind::MustNotOrderFrom(ops.person()?, ops.shop()?),
            "must_select" => {
                ConstraintKind::MustPickOneOf(ops.person()?, ops.shop()?, ops.items.clone())
            }
            "cannot_select" => {
                ConstraintKind::CannotPick(ops.person()?, ops.shop()?, ops.items.clone())
            }
            "shop_count" => ConstraintKind::ShopCount(ops.shop()?, ops.bound()?),
            other => return Err(ConstraintError::UnsupportedVariant(other.to_string())),
        };
        Ok(kind)
    }

    /// Structural identity: variant tag plus canonicalized operands.
    ///
    /// Unordered person pairs are sorted and item sets are sorted and
    /// deduplicated, so order-symmetric restatements collide. The variant
    /// tag is always part of the key, so constraints of different variants
    /// never share an identity.
    pub fn id(&self) -> ConstraintId {
        let tag = self.template_tag();
        let key = match self {
            ConstraintKind::SameShop(a, b)
            | ConstraintKind::DifferentShop(a, b)
            | ConstraintKind::SameItem(a, b)
            | ConstraintKind::DifferentItem(a, b) => {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                format!("{tag}/p{}/p{}", lo.0, hi.0)
            }
            ConstraintKind::MustOrderFrom(p, s) | ConstraintKind::MustNotOrderFrom(p, s) => {
                format!("{tag}/p{}/s{}", p.0, s.0)
            }
            ConstraintKind::MustPickOneOf(p, s, items)
            | ConstraintKind::CannotPick(p, s, items) => {
                let mut sorted: Vec<u32> = items.iter().map(|i| i.0).collect();
                sorted.sort_unstable();
                sorted.dedup();
                let joined = sorted
                    .iter()
                    .map(|i| format!("i{i}"))
                    .collect::<Vec<_>>()
                    .join("+");
                format!("{tag}/p{}/s{}/{joined}", p.0, s.0)
            }
            ConstraintKind::ShopCount(s, bound) => {
                let op = match bound {
                    CountBound::Exactly(n) => format!("eq{n}"),
                    CountBound::AtLeast(n) => format!("ge{n}"),
                    CountBound::AtMost(n) => format!("le{n}"),
                };
                format!("{tag}/s{}/{op}", s.0)
            }
        };
        ConstraintId(key)
    }

    /// Returns the persons this constraint mentions.
    pub fn persons(&self) -> SmallVec<[PersonId; 2]> {
        match self {
            ConstraintKind::SameShop(a, b)
            | ConstraintKind::DifferentShop(a, b)
            | ConstraintKind::SameItem(a, b)
            | ConstraintKind::DifferentItem(a, b) => SmallVec::from_slice(&[*a, *b]),
            ConstraintKind::MustOrderFrom(p, _)
            | ConstraintKind::MustNotOrderFrom(p, _)
            | ConstraintKind::MustPickOneOf(p, _, _)
            | ConstraintKind::CannotPick(p, _, _) => SmallVec::from_slice(&[*p]),
            ConstraintKind::ShopCount(..) => SmallVec::new(),
        }
    }

    /// Returns the shop this constraint mentions, if any.
    pub fn shop(&self) -> Option<ShopId> {
        match self {
            ConstraintKind::MustOrderFrom(_, s)
            | ConstraintKind::MustNotOrderFrom(_, s)
            | ConstraintKind::MustPickOneOf(_, s, _)
            | ConstraintKind::CannotPick(_, s, _)
            | ConstraintKind::ShopCount(s, _) => Some(*s),
            _ => None,
        }
    }

    /// Returns the items this constraint mentions.
    pub fn items(&self) -> &[ItemId] {
        match self {
            ConstraintKind::MustPickOneOf(_, _, items)
            | ConstraintKind::CannotPick(_, _, items) => items,
            _ => &[],
        }
    }

    /// Returns the count bound this constraint carries, if any.
    pub fn bound(&self) -> Option<CountBound> {
        match self {
            ConstraintKind::ShopCount(_, bound) => Some(*bound),
            _ => None,
        }
    }

    /// Evaluation cost rank, used to order fail-fast checks.
    ///
    /// Unary variants before binary, counting last.
    pub fn arity(&self) -> u8 {
        match self {
            ConstraintKind::MustOrderFrom(..)
            | ConstraintKind::MustNotOrderFrom(..)
            | ConstraintKind::MustPickOneOf(..)
            | ConstraintKind::CannotPick(..) => 1,
            ConstraintKind::SameShop(..)
            | ConstraintKind::DifferentShop(..)
            | ConstraintKind::SameItem(..)
            | ConstraintKind::DifferentItem(..) => 2,
            ConstraintKind::ShopCount(..) => 3,
        }
    }

    fn validate(&self, domain: &DomainModel) -> Result<(), ConstraintError> {
        let invalid = |what: String| Err(ConstraintError::InvalidOperand(what));
        for p in self.persons() {
            if !domain.contains_person(p) {
                return invalid(format!("person #{}", p.0));
            }
        }
        if let Some(s) = self.shop() {
            if !domain.contains_shop(s) {
                return invalid(format!("shop #{}", s.0));
            }
            for &item in self.items() {
                if !domain.contains_item(item) {
                    return invalid(format!("item #{}", item.0));
                }
                if !domain.sells(s, item) {
                    return invalid(format!(
                        "{} is not sold by {}",
                        domain.item_name(item),
                        domain.shop_name(s)
                    ));
                }
            }
        }
        match self {
            ConstraintKind::SameShop(a, b)
            | ConstraintKind::DifferentShop(a, b)
            | ConstraintKind::SameItem(a, b)
            | ConstraintKind::DifferentItem(a, b)
                if a == b =>
            {
                invalid(format!("person #{} paired with itself", a.0))
            }
            ConstraintKind::MustPickOneOf(_, _, items) | ConstraintKind::CannotPick(_, _, items)
                if items.is_empty() =>
            {
                Err(ConstraintError::EmptyItemSet)
            }
            _ => Ok(()),
        }
    }
}

/// Operand bundle for [`ConstraintKind::from_template`].
///
/// The interactive layer fills in whichever operands its chosen template
/// needs; missing required operands are rejected at construction.
#[derive(Debug, Clone, Default)]
pub struct Operands {
    /// First (or only) person operand.
    pub person: Option<PersonId>,
    /// Second person operand, for pair variants.
    pub other: Option<PersonId>,
    /// Shop operand.
    pub shop: Option<ShopId>,
    /// Item-set operand.
    pub items: ItemSet,
    /// Count bound operand.
    pub bound: Option<CountBound>,
}

impl Operands {
    fn person(&self) -> Result<PersonId, ConstraintError> {
        self.person
            .ok_or_else(|| ConstraintError::InvalidOperand("missing person".into()))
    }

    fn other(&self) -> Result<PersonId, ConstraintError> {
        self.other
            .ok_or_else(|| ConstraintError::InvalidOperand("missing second person".into()))
    }

    fn shop(&self) -> Result<ShopId, ConstraintError> {
        self.shop
            .ok_or_else(|| ConstraintError::InvalidOperand("missing shop".into()))
    }

    fn bound(&self) -> Result<CountBound, ConstraintError> {
        self.bound
            .ok_or_else(|| ConstraintError::InvalidOperand("missing count bound".into()))
    }
}

/// Stable structural identity of a constraint.
///
/// Derived from the variant and canonicalized operands; two constructions of
/// the same variant over the same operands always yield equal identities.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintId(String);

impl ConstraintId {
    /// Returns the identity key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated constraint: a variant plus provenance and display annotations.
///
/// # Example
///
/// ```
/// use pantry_core::{Constraint, ConstraintKind, DomainModel, Provenance};
///
/// let domain = DomainModel::builder()
///     .person("Alice")
///     .person("Bobby")
///     .shop("Fruit", ["Apple", "Bread"])
///     .build()
///     .unwrap();
///
/// let bobby = domain.person("Bobby").unwrap();
/// let fruit = domain.shop("Fruit").unwrap();
/// let c = Constraint::new(
///     ConstraintKind::MustOrderFrom(bobby, fruit),
///     Provenance::Custom,
///     &domain,
/// )
/// .unwrap()
/// .with_fol("Shop(Bobby) = Fruit");
///
/// assert_eq!(c.id().as_str(), "must_order/p1/s0");
/// assert_eq!(c.describe(&domain), "Bobby must order from Fruit");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    kind: ConstraintKind,
    provenance: Provenance,
    pl: Option<String>,
    fol: Option<String>,
}

impl Constraint {
    /// Creates a constraint, validating every operand against the domain.
    ///
    /// Fails with [`ConstraintError::InvalidOperand`] when an operand is not
    /// a member of its entity's fixed set (or a pair variant names the same
    /// person twice), and [`ConstraintError::EmptyItemSet`] when an item-set
    /// variant lists no items.
    pub fn new(
        kind: ConstraintKind,
        provenance: Provenance,
        domain: &DomainModel,
    ) -> Result<Self, ConstraintError> {
        kind.validate(domain)?;
        Ok(Self {
            kind,
            provenance,
            pl: None,
            fol: None,
        })
    }

    /// Sets the propositional-logic display annotation.
    pub fn with_pl(mut self, pl: impl Into<String>) -> Self {
        self.pl = Some(pl.into());
        self
    }

    /// Sets the first-order-logic display annotation.
    pub fn with_fol(mut self, fol: impl Into<String>) -> Self {
        self.fol = Some(fol.into());
        self
    }

    /// Returns the variant.
    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    /// Returns the provenance flag.
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Returns the propositional-logic annotation, if any.
    pub fn pl(&self) -> Option<&str> {
        self.pl.as_deref()
    }

    /// Returns the first-order-logic annotation, if any.
    pub fn fol(&self) -> Option<&str> {
        self.fol.as_deref()
    }

    /// Returns the structural identity.
    pub fn id(&self) -> ConstraintId {
        self.kind.id()
    }

    /// Evaluates the constraint against an assignment.
    pub fn evaluate(&self, assignment: &Assignment) -> bool {
        self.kind.evaluate(assignment)
    }

    /// Updates display annotations. `None` keeps the current value.
    ///
    /// Never touches the variant or its evaluation predicate.
    pub fn set_annotations(&mut self, fol: Option<String>, pl: Option<String>) {
        if let Some(fol) = fol {
            self.fol = Some(fol);
        }
        if let Some(pl) = pl {
            self.pl = Some(pl);
        }
    }

    /// Renders a human-readable description using domain entity names.
    pub fn describe(&self, domain: &DomainModel) -> String {
        let person = |p: &PersonId| domain.person_name(*p).to_string();
        let shop = |s: &ShopId| domain.shop_name(*s).to_string();
        let items = |set: &ItemSet| {
            set.iter()
                .map(|i| domain.item_name(*i))
                .collect::<Vec<_>>()
                .join(", ")
        };
        match &self.kind {
            ConstraintKind::SameShop(a, b) => {
                format!("{} must order from the same shop as {}", person(a), person(b))
            }
            ConstraintKind::DifferentShop(a, b) => {
                format!("{} must order from a different shop than {}", person(a), person(b))
            }
            ConstraintKind::SameItem(a, b) => {
                format!("{} must have the same selection as {}", person(a), person(b))
            }
            ConstraintKind::DifferentItem(a, b) => {
                format!(
                    "{} must have a different selection from {}",
                    person(a),
                    person(b)
                )
            }
            ConstraintKind::MustOrderFrom(p, s) => {
                format!("{} must order from {}", person(p), shop(s))
            }
            ConstraintKind::MustNotOrderFrom(p, s) => {
                format!("{} must not order from {}", person(p), shop(s))
            }
            ConstraintKind::MustPickOneOf(p, s, set) => {
                format!("{} must select one of {} from {}", person(p), items(set), shop(s))
            }
            ConstraintKind::CannotPick(p, s, set) => {
                format!("{} cannot select {} from {}", person(p), items(set), shop(s))
            }
            ConstraintKind::ShopCount(s, bound) => {
                format!("{bound} persons must order from {}", shop(s))
            }
        }
    }
}
