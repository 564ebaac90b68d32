//! Serde form of constraints, keyed by entity names.
//!
//! Records are the on-disk shape of a constraint: the template tag plus
//! named operands. They resolve against a [`DomainModel`] through the
//! normal constructors, so a stale record referring to a renamed entity
//! fails with the same errors as any other invalid operand.

use serde::{Deserialize, Serialize};

use pantry_core::{
    Constraint, ConstraintKind, CountBound, DomainModel, ItemSet, Operands, Provenance,
};

use crate::{ConfigError, Result};

/// Serde form of a [`CountBound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundRecord {
    /// Exactly `n` persons.
    Exactly(u32),
    /// At least `n` persons.
    AtLeast(u32),
    /// At most `n` persons.
    AtMost(u32),
}

impl From<BoundRecord> for CountBound {
    fn from(record: BoundRecord) -> Self {
        match record {
            BoundRecord::Exactly(n) => CountBound::Exactly(n),
            BoundRecord::AtLeast(n) => CountBound::AtLeast(n),
            BoundRecord::AtMost(n) => CountBound::AtMost(n),
        }
    }
}

impl From<CountBound> for BoundRecord {
    fn from(bound: CountBound) -> Self {
        match bound {
            CountBound::Exactly(n) => BoundRecord::Exactly(n),
            CountBound::AtLeast(n) => BoundRecord::AtLeast(n),
            CountBound::AtMost(n) => BoundRecord::AtMost(n),
        }
    }
}

/// One persisted constraint definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConstraintRecord {
    /// Template tag, one of the fixed recognized set.
    pub template: String,
    /// First person operand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
    /// Second person operand, for pair templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
    /// Shop operand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop: Option<String>,
    /// Item-set operand.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
    /// Count bound operand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound: Option<BoundRecord>,
    /// Propositional-logic display annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pl: Option<String>,
    /// First-order-logic display annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fol: Option<String>,
    /// True for the built-in default set, false for user additions.
    #[serde(default)]
    pub default: bool,
}

impl ConstraintRecord {
    /// Resolves the record against a domain into a validated constraint.
    pub fn resolve(&self, domain: &DomainModel) -> Result<Constraint> {
        let person = match &self.person {
            Some(name) => Some(domain.person(name).ok_or_else(|| {
                ConfigError::Invalid(format!("unknown person {name:?} in record"))
            })?),
            None => None,
        };
        let other = match &self.other {
            Some(name) => Some(domain.person(name).ok_or_else(|| {
                ConfigError::Invalid(format!("unknown person {name:?} in record"))
            })?),
            None => None,
        };
        let shop = match &self.shop {
            Some(name) => Some(domain.shop(name).ok_or_else(|| {
                ConfigError::Invalid(format!("unknown shop {name:?} in record"))
            })?),
            None => None,
        };
        let mut items = ItemSet::new();
        for name in &self.items {
            items.push(domain.item(name).ok_or_else(|| {
                ConfigError::Invalid(format!("unknown item {name:?} in record"))
            })?);
        }

        let ops = Operands {
            person,
            other,
            shop,
            items,
            bound: self.bound.map(Into::into),
        };
        let kind = ConstraintKind::from_template(&self.template, ops)?;
        let provenance = if self.default {
            Provenance::Default
        } else {
            Provenance::Custom
        };
        let mut constraint = Constraint::new(kind, provenance, domain)?;
        constraint.set_annotations(self.fol.clone(), self.pl.clone());
        Ok(constraint)
    }

    /// Builds the record form of a constraint.
    pub fn from_constraint(constraint: &Constraint, domain: &DomainModel) -> Self {
        let kind = constraint.kind();
        let persons = kind.persons();
        Self {
            template: kind.template_tag().to_string(),
            person: persons.first().map(|p| domain.person_name(*p).to_string()),
            other: persons.get(1).map(|p| domain.person_name(*p).to_string()),
            shop: kind.shop().map(|s| domain.shop_name(s).to_string()),
            items: kind
                .items()
                .iter()
                .map(|i| domain.item_name(*i).to_string())
                .collect(),
            bound: kind.bound().map(Into::into),
            pl: constraint.pl().map(str::to_string),
            fol: constraint.fol().map(str::to_string),
            default: constraint.provenance() == Provenance::Default,
        }
    }
}
