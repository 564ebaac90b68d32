//! Configuration and persistence collaborator for pantry.
//!
//! Load the domain model (persons, shops, per-shop catalogs) from TOML, and
//! keep the constraint record on disk in sync with the in-memory store
//! through [`FileJournal`]. The engine itself never touches the file system;
//! it reaches this crate only through the `ConstraintJournal` trait.
//!
//! # Examples
//!
//! Load a domain from TOML:
//!
//! ```
//! use pantry_config::DomainConfig;
//!
//! let config = DomainConfig::from_toml_str(r#"
//!     persons = ["Alice", "Bobby"]
//!
//!     [[shops]]
//!     name = "Fruit"
//!     items = ["Apple", "Bread"]
//!
//!     [[shops]]
//!     name = "Grocery"
//!     items = ["Apple", "Bread"]
//! "#).unwrap();
//!
//! let domain = config.to_domain_model().unwrap();
//! assert_eq!(domain.person_count(), 2);
//! ```
//!
//! Fall back to the built-in food-ordering domain:
//!
//! ```
//! use pantry_config::DomainConfig;
//!
//! let domain = DomainConfig::default().to_domain_model().unwrap();
//! assert!(domain.person("Bobby").is_some());
//! assert!(domain.shop("Dish Shop").is_some());
//! ```

mod journal;
mod record;


use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pantry_core::{
    Constraint, ConstraintError, ConstraintKind, DomainError, DomainModel, Provenance,
};

pub use journal::FileJournal;
pub use record::{BoundRecord, ConstraintRecord};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// One shop and the items it sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Shop name, unique within the domain.
    pub name: String,
    /// Item names in catalog order.
    pub items: Vec<String>,
}

/// Serializable domain definition.
///
/// The `Default` configuration is the food-ordering domain: Adam, Bobby,
/// Cathy, and Dean; a Fruit Shop selling Papaya, Quenepa, Rambutan, and
/// Salak; and a Dish Shop selling Pasta and Risotto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DomainConfig {
    /// Person names.
    #[serde(default)]
    pub persons: Vec<String>,
    /// Shops with their catalogs.
    #[serde(default)]
    pub shops: Vec<ShopConfig>,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            persons: ["Adam", "Bobby", "Cathy", "Dean"]
                .map(String::from)
                .to_vec(),
            shops: vec![
                ShopConfig {
                    name: "Fruit Shop".into(),
                    items: ["Papaya", "Quenepa", "Rambutan", "Salak"]
                        .map(String::from)
                        .to_vec(),
                },
                ShopConfig {
                    name: "Dish Shop".into(),
                    items: ["Pasta", "Risotto"].map(String::from).to_vec(),
                },
            ],
        }
    }
}

impl DomainConfig {
    /// Parses a configuration from a TOML string.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Builds the immutable domain model, validating the configuration.
    pub fn to_domain_model(&self) -> Result<DomainModel> {
        let mut builder = DomainModel::builder();
        for person in &self.persons {
            builder = builder.person(person);
        }
        for shop in &self.shops {
            builder = builder.shop(&shop.name, shop.items.iter().map(String::as_str));
        }
        Ok(builder.build()?)
    }
}

/// The built-in default constraint set for the food domain.
///
/// Mirrors the classic rules: Cathy will not pick Salak; Adam and Bobby make
/// different selections; Adam and Cathy make the same selection; Dean will
/// not pick Quenepa; Bobby picks one of Pasta or Risotto from the Dish Shop.
///
/// Fails with [`ConfigError::Invalid`] when the domain does not contain the
/// entities these rules name.
pub fn default_constraints(domain: &DomainModel) -> Result<Vec<Constraint>> {
    let person = |name: &str| {
        domain
            .person(name)
            .ok_or_else(|| ConfigError::Invalid(format!("default set needs person {name:?}")))
    };
    let shop = |name: &str| {
        domain
            .shop(name)
            .ok_or_else(|| ConfigError::Invalid(format!("default set needs shop {name:?}")))
    };
    let item = |name: &str| {
        domain
            .item(name)
            .ok_or_else(|| ConfigError::Invalid(format!("default set needs item {name:?}")))
    };

    let adam = person("Adam")?;
    let bobby = person("Bobby")?;
    let cathy = person("Cathy")?;
    let dean = person("Dean")?;
    let fruit = shop("Fruit Shop")?;
    let dish = shop("Dish Shop")?;
    let salak = item("Salak")?;
    let quenepa = item("Quenepa")?;
    let pasta = item("Pasta")?;
    let risotto = item("Risotto")?;

    let build = |kind: ConstraintKind| -> Result<Constraint> {
        Ok(Constraint::new(kind, Provenance::Default, domain)?)
    };

    Ok(vec![
        build(ConstraintKind::CannotPick(
            cathy,
            fruit,
            [salak].into_iter().collect(),
        ))?
        .with_fol("∀i: Pick(Cathy, FruitShop, i) → i ≠ Salak"),
        build(ConstraintKind::DifferentItem(adam, bobby))?
            .with_fol("Item(Adam) ≠ Item(Bobby)")
            .with_pl("¬(adam_x ↔ bobby_x)"),
        build(ConstraintKind::SameItem(adam, cathy))?
            .with_fol("Item(Adam) = Item(Cathy)")
            .with_pl("adam_x ↔ cathy_x"),
        build(ConstraintKind::CannotPick(
            dean,
            fruit,
            [quenepa].into_iter().collect(),
        ))?
        .with_fol("∀i: Pick(Dean, FruitShop, i) → i ≠ Quenepa"),
        build(ConstraintKind::MustPickOneOf(
            bobby,
            dish,
            [pasta, risotto].into_iter().collect(),
        ))?
        .with_fol("Pick(Bobby, DishShop, Pasta) ∨ Pick(Bobby, DishShop, Risotto)"),
    ])
}
