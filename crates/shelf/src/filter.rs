//! Filter predicate engine.
//!
//! Two predicates run in sequence over the full catalog: a case-insensitive
//! substring match on name or tagline, then a conjunctive category match.
//! Each is skipped when its input is empty.  Survivors keep their original
//! relative order; nothing here ever sorts.

use crate::catalog::Catalog;
use crate::item::{CategoryId, Item};
use std::collections::BTreeSet;

/// A normalized free-text query: lower-cased and trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Normalize raw search box text.
    pub fn parse(raw: &str) -> Self {
        Query(raw.to_lowercase().trim().to_string())
    }

    /// Whether the text predicate applies at all.
    pub fn is_active(&self) -> bool {
        !self.0.is_empty()
    }

    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substring match against the item's name or tagline, both lower-cased.
    /// An inactive query matches everything.
    pub fn matches(&self, item: &Item) -> bool {
        !self.is_active()
            || item.name.to_lowercase().contains(&self.0)
            || item.tagline.to_lowercase().contains(&self.0)
    }
}

/// The selected category filters.
///
/// Besides category ids, a selection can hold filters that name no valid id
/// (a checked control whose value is not an integer).  No item carries such a
/// category, so a selection holding one matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<CategoryId>,
    unresolved: bool,
}

impl Selection {
    /// An empty selection; matches every item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`.  Returns whether it was newly added.
    pub fn insert(&mut self, id: CategoryId) -> bool {
        self.ids.insert(id)
    }

    /// Add a filter that no item can satisfy.
    pub fn insert_unresolved(&mut self) {
        self.unresolved = true;
    }

    /// Remove `id`.  Returns whether it was present.
    pub fn remove(&mut self, id: CategoryId) -> bool {
        self.ids.remove(&id)
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: CategoryId) -> bool {
        self.ids.contains(&id)
    }

    /// Whether the category predicate is skipped entirely.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && !self.unresolved
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Selected ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.ids.iter().copied()
    }

    /// Conjunctive match: the item must carry every selected category.
    /// An empty selection matches everything.
    pub fn matches(&self, item: &Item) -> bool {
        !self.unresolved && self.ids.iter().all(|id| item.has_category(*id))
    }
}

impl FromIterator<CategoryId> for Selection {
    fn from_iter<I: IntoIterator<Item = CategoryId>>(iter: I) -> Self {
        Selection {
            ids: iter.into_iter().collect(),
            unresolved: false,
        }
    }
}

/// Result of one filter pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filtered {
    /// Indices into the catalog of the surviving items, in catalog order.
    pub visible: Vec<usize>,
    /// Size of the full catalog.
    pub total: usize,
}

impl Filtered {
    /// Number of surviving items.
    pub fn count(&self) -> usize {
        self.visible.len()
    }

    /// Status line: `"{visible} of {total} items"`.
    pub fn count_text(&self) -> String {
        format!("{} of {} items", self.count(), self.total)
    }

    /// Resolve the surviving indices against `catalog`.
    pub fn items<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a Item> + 'a {
        self.visible.iter().filter_map(move |&i| catalog.get(i))
    }
}

/// Compute the ordered subset of `catalog` that passes both predicates.
pub fn apply(catalog: &Catalog, query: &Query, selection: &Selection) -> Filtered {
    let visible = catalog
        .items()
        .iter()
        .enumerate()
        .filter(|(_, item)| query.matches(item))
        .filter(|(_, item)| selection.matches(item))
        .map(|(i, _)| i)
        .collect();

    Filtered {
        visible,
        total: catalog.len(),
    }
}
