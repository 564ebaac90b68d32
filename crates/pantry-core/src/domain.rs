//! Domain model: finite person, shop, and item sets plus assignments.
//!
//! A [`DomainModel`] is immutable once built. Persons, shops, and items are
//! addressed by index newtypes; each shop carries a catalog listing the items
//! it sells. The search space is the Cartesian product of each person's
//! choice set, enumerable in a fixed deterministic order via
//! [`DomainModel::assignments`].

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Index of a person in the domain model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(pub u32);

/// Index of a shop in the domain model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShopId(pub u32);

/// Index of an item in the domain model's global item table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// One shop-item pairing chosen by a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Choice {
    /// The shop the person orders from.
    pub shop: ShopId,
    /// The item the person picks there.
    pub item: ItemId,
}

/// A total mapping from each person to a chosen [`Choice`].
///
/// Assignments are the unit evaluated against constraints. They are cheap to
/// clone and carry no hidden state: constraint evaluation is a pure function
/// of the assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    choices: Vec<Choice>,
}

impl Assignment {
    /// Creates an assignment from per-person choices, indexed by person.
    pub fn new(choices: Vec<Choice>) -> Self {
        Self { choices }
    }

    /// Returns the number of persons covered.
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Returns true if no persons are covered.
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Returns the choice made by `person`.
    ///
    /// # Panics
    ///
    /// Panics if `person` is outside the domain this assignment was built for.
    pub fn choice(&self, person: PersonId) -> Choice {
        self.choices[person.0 as usize]
    }

    /// Returns the shop chosen by `person`.
    pub fn shop_of(&self, person: PersonId) -> ShopId {
        self.choice(person).shop
    }

    /// Returns the item chosen by `person`.
    pub fn item_of(&self, person: PersonId) -> ItemId {
        self.choice(person).item
    }

    /// Iterates `(person, choice)` pairs in person order.
    pub fn iter(&self) -> impl Iterator<Item = (PersonId, Choice)> + '_ {
        self.choices
            .iter()
            .enumerate()
            .map(|(i, &c)| (PersonId(i as u32), c))
    }
}

/// The finite sets of persons, shops, and items, with per-shop catalogs.
///
/// Immutable once loaded; cardinalities are small (≤ ~10 per set) and known
/// at configuration time.
///
/// # Example
///
/// ```
/// use pantry_core::domain::DomainModel;
///
/// let domain = DomainModel::builder()
///     .person("Alice")
///     .person("Bobby")
///     .shop("Fruit", ["Apple", "Bread"])
///     .shop("Grocery", ["Apple", "Bread"])
///     .build()
///     .unwrap();
///
/// assert_eq!(domain.person_count(), 2);
/// // Two shops selling two items each: four choices per person.
/// assert_eq!(domain.choices().len(), 4);
/// // The full search space is the per-person product.
/// assert_eq!(domain.assignments().count(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainModel {
    persons: Vec<String>,
    shops: Vec<String>,
    items: Vec<String>,
    /// Catalog per shop, indexed by `ShopId`.
    catalogs: Vec<Vec<ItemId>>,
}

impl DomainModel {
    /// Starts building a domain model.
    pub fn builder() -> DomainModelBuilder {
        DomainModelBuilder::default()
    }

    /// Returns the number of persons.
    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    /// Returns the number of shops.
    pub fn shop_count(&self) -> usize {
        self.shops.len()
    }

    /// Returns the number of distinct items across all catalogs.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Iterates all person ids in index order.
    pub fn persons(&self) -> impl Iterator<Item = PersonId> {
        (0..self.persons.len() as u32).map(PersonId)
    }

    /// Iterates all shop ids in index order.
    pub fn shops(&self) -> impl Iterator<Item = ShopId> {
        (0..self.shops.len() as u32).map(ShopId)
    }

    /// Iterates all item ids in index order.
    pub fn items(&self) -> impl Iterator<Item = ItemId> {
        (0..self.items.len() as u32).map(ItemId)
    }

    /// Looks up a person by name.
    pub fn person(&self, name: &str) -> Option<PersonId> {
        self.persons
            .iter()
            .position(|n| n == name)
            .map(|i| PersonId(i as u32))
    }

    /// Looks up a shop by name.
    pub fn shop(&self, name: &str) -> Option<ShopId> {
        self.shops
            .iter()
            .position(|n| n == name)
            .map(|i| ShopId(i as u32))
    }

    /// Looks up an item by name.
    pub fn item(&self, name: &str) -> Option<ItemId> {
        self.items
            .iter()
            .position(|n| n == name)
            .map(|i| ItemId(i as u32))
    }

    /// Returns the name of a person.
    pub fn person_name(&self, id: PersonId) -> &str {
        &self.persons[id.0 as usize]
    }

    /// Returns the name of a shop.
    pub fn shop_name(&self, id: ShopId) -> &str {
        &self.shops[id.0 as usize]
    }

    /// Returns the name of an item.
    pub fn item_name(&self, id: ItemId) -> &str {
        &self.items[id.0 as usize]
    }

    /// Returns true if `id` indexes a person of this domain.
    pub fn contains_person(&self, id: PersonId) -> bool {
        (id.0 as usize) < self.persons.len()
    }

    /// Returns true if `id` indexes a shop of this domain.
    pub fn contains_shop(&self, id: ShopId) -> bool {
        (id.0 as usize) < self.shops.len()
    }

    /// Returns true if `id` indexes an item of this domain.
    pub fn contains_item(&self, id: ItemId) -> bool {
        (id.0 as usize) < self.items.len()
    }

    /// Returns the catalog of a shop: the items it sells, in catalog order.
    pub fn catalog(&self, shop: ShopId) -> &[ItemId] {
        &self.catalogs[shop.0 as usize]
    }

    /// Returns true if `shop` sells `item`.
    pub fn sells(&self, shop: ShopId, item: ItemId) -> bool {
        self.catalogs[shop.0 as usize].contains(&item)
    }

    /// Returns the choice set of every person: all catalog-valid
    /// `(shop, item)` pairs, shop-major, catalog order within each shop.
    ///
    /// The order is fixed, which makes assignment enumeration deterministic.
    pub fn choices(&self) -> Vec<Choice> {
        let mut out = Vec::new();
        for shop in self.shops() {
            for &item in self.catalog(shop) {
                out.push(Choice { shop, item });
            }
        }
        out
    }

    /// Enumerates every total assignment, lazily, in a fixed order.
    ///
    /// The iterator walks the Cartesian product of per-person choice sets
    /// with the last person varying fastest. Calling this again yields the
    /// same sequence in the same order.
    pub fn assignments(&self) -> AssignmentIter {
        AssignmentIter::new(self.choices(), self.person_count())
    }
}

/// Lazy iterator over the full assignment space of a domain.
///
/// Finite and restartable: obtain a fresh one from
/// [`DomainModel::assignments`].
#[derive(Debug, Clone)]
pub struct AssignmentIter {
    choices: Vec<Choice>,
    counters: Vec<usize>,
    done: bool,
}

impl AssignmentIter {
    fn new(choices: Vec<Choice>, person_count: usize) -> Self {
        let done = choices.is_empty() || person_count == 0;
        Self {
            choices,
            counters: vec![0; person_count],
            done,
        }
    }
}

impl Iterator for AssignmentIter {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        if self.done {
            return None;
        }
        let assignment = Assignment::new(
            self.counters.iter().map(|&i| self.choices[i]).collect(),
        );
        // Odometer increment, last person varies fastest.
        let mut position = self.counters.len();
        loop {
            if position == 0 {
                self.done = true;
                break;
            }
            position -= 1;
            self.counters[position] += 1;
            if self.counters[position] < self.choices.len() {
                break;
            }
            self.counters[position] = 0;
        }
        Some(assignment)
    }
}

/// Builder for [`DomainModel`].
///
/// Validates on `build`: non-empty unique person and shop names, and at
/// least one item per shop. Item names shared between shops resolve to the
/// same [`ItemId`].
#[derive(Debug, Default)]
pub struct DomainModelBuilder {
    persons: Vec<String>,
    shops: Vec<(String, Vec<String>)>,
}

impl DomainModelBuilder {
    /// Adds a person.
    pub fn person(mut self, name: impl Into<String>) -> Self {
        self.persons.push(name.into());
        self
    }

    /// Adds a shop with its item catalog.
    pub fn shop<I, S>(mut self, name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shops
            .push((name.into(), items.into_iter().map(Into::into).collect()));
        self
    }

    /// Builds the domain model, validating the configuration.
    pub fn build(self) -> Result<DomainModel, DomainError> {
        if self.persons.is_empty() {
            return Err(DomainError::Invalid("at least one person required".into()));
        }
        if self.shops.is_empty() {
            return Err(DomainError::Invalid("at least one shop required".into()));
        }
        for (i, name) in self.persons.iter().enumerate() {
            if self.persons[..i].contains(name) {
                return Err(DomainError::Invalid(format!("duplicate person {name:?}")));
            }
        }

        let mut shops = Vec::with_capacity(self.shops.len());
        let mut items: Vec<String> = Vec::new();
        let mut catalogs = Vec::with_capacity(self.shops.len());
        for (name, shop_items) in self.shops {
            if shops.contains(&name) {
                return Err(DomainError::Invalid(format!("duplicate shop {name:?}")));
            }
            if shop_items.is_empty() {
                return Err(DomainError::Invalid(format!(
                    "shop {name:?} has an empty catalog"
                )));
            }
            let mut catalog = Vec::with_capacity(shop_items.len());
            for item in shop_items {
                let id = match items.iter().position(|n| *n == item) {
                    Some(i) => ItemId(i as u32),
                    None => {
                        items.push(item.clone());
                        ItemId((items.len() - 1) as u32)
                    }
                };
                if catalog.contains(&id) {
                    return Err(DomainError::Invalid(format!(
                        "shop {name:?} lists {item:?} twice"
                    )));
                }
                catalog.push(id);
            }
            shops.push(name);
            catalogs.push(catalog);
        }

        Ok(DomainModel {
            persons: self.persons,
            shops,
            items,
            catalogs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_domain() -> DomainModel {
        DomainModel::builder()
            .person("Alice")
            .person("Bobby")
            .person("Cathy")
            .shop("Fruit", ["Apple", "Bread"])
            .shop("Grocery", ["Apple", "Bread"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_validates_empty_persons() {
        let err = DomainModel::builder().shop("S", ["x"]).build().unwrap_err();
        assert!(matches!(err, DomainError::Invalid(_)));
    }

    #[test]
    fn test_builder_rejects_duplicate_person() {
        let err = DomainModel::builder()
            .person("Alice")
            .person("Alice")
            .shop("S", ["x"])
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::Invalid(_)));
    }

    #[test]
    fn test_builder_rejects_empty_catalog() {
        let err = DomainModel::builder()
            .person("Alice")
            .shop("S", Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::Invalid(_)));
    }

    #[test]
    fn test_shared_item_names_unify() {
        let domain = small_domain();
        assert_eq!(domain.item_count(), 2);
        let apple = domain.item("Apple").unwrap();
        assert!(domain.sells(domain.shop("Fruit").unwrap(), apple));
        assert!(domain.sells(domain.shop("Grocery").unwrap(), apple));
    }

    #[test]
    fn test_name_lookup_round_trip() {
        let domain = small_domain();
        let bobby = domain.person("Bobby").unwrap();
        assert_eq!(domain.person_name(bobby), "Bobby");
        assert_eq!(domain.person("Zelda"), None);
    }

    #[test]
    fn test_choices_are_shop_major() {
        let domain = small_domain();
        let fruit = domain.shop("Fruit").unwrap();
        let grocery = domain.shop("Grocery").unwrap();
        let shops: Vec<ShopId> = domain.choices().iter().map(|c| c.shop).collect();
        assert_eq!(shops, vec![fruit, fruit, grocery, grocery]);
    }

    #[test]
    fn test_assignment_space_size() {
        let domain = small_domain();
        // 4 choices per person, 3 persons.
        assert_eq!(domain.assignments().count(), 64);
    }

    #[test]
    fn test_assignment_enumeration_is_deterministic() {
        let domain = small_domain();
        let first: Vec<Assignment> = domain.assignments().collect();
        let second: Vec<Assignment> = domain.assignments().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_last_person_varies_fastest() {
        let domain = small_domain();
        let mut iter = domain.assignments();
        let a = iter.next().unwrap();
        let b = iter.next().unwrap();
        let alice = domain.person("Alice").unwrap();
        let cathy = domain.person("Cathy").unwrap();
        assert_eq!(a.choice(alice), b.choice(alice));
        assert_ne!(a.choice(cathy), b.choice(cathy));
    }

    #[test]
    fn test_assignment_accessors() {
        let domain = small_domain();
        let a = domain.assignments().next().unwrap();
        let bobby = domain.person("Bobby").unwrap();
        assert_eq!(a.choice(bobby).shop, a.shop_of(bobby));
        assert_eq!(a.choice(bobby).item, a.item_of(bobby));
        assert_eq!(a.iter().count(), 3);
    }
}
