use crate::item::{Category, Item};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The full item collection, fetched once and shared read-only afterwards.
///
/// Cloning a `Catalog` is cheap; all clones share the same items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Arc<[Item]>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Catalog {
    /// Wrap `items`, keeping their order.
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Decode the API payload: a JSON array of item records.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let items: Vec<Item> = serde_json::from_slice(bytes)?;
        Ok(Self::new(items))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The item at `index` in catalog order.
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Every category referenced by any item, deduplicated by id and ordered
    /// by name.  The first occurrence of an id wins.
    pub fn categories(&self) -> Vec<Category> {
        let mut by_id = BTreeMap::new();
        for category in self.items.iter().flat_map(|item| &item.categories) {
            by_id.entry(category.id).or_insert_with(|| category.clone());
        }
        let mut categories: Vec<Category> = by_id.into_values().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        categories
    }
}

impl From<Vec<Item>> for Catalog {
    fn from(items: Vec<Item>) -> Self {
        Self::new(items)
    }
}
