//! Indexed view of one published catalog.
//!
//! The index maps entry ids to their position so lookups and positional
//! navigation ("next lesson") do not rescan categories. It is only built for
//! catalogs that already passed validation, so entry ids are unique here.

use crate::catalog::identity::{CatalogId, EntryId};
use crate::catalog::model::{Catalog, Category, Entry};
use serde::Serialize;
use std::collections::BTreeMap;

/// Where an entry lives inside its catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EntryLocation {
    /// Index into `Catalog::categories`.
    pub category: usize,
    /// Index into that category's entries.
    pub entry: usize,
    /// Flat position across all categories in aggregated order.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Catalog plus a derived index keyed by entry id.
pub struct CatalogIndex {
    catalog: Catalog,
    by_id: BTreeMap<EntryId, EntryLocation>,
    order: Vec<EntryLocation>,
}

impl CatalogIndex {
    pub(crate) fn build(catalog: Catalog) -> Self {
        let mut by_id = BTreeMap::new();
        let mut order = Vec::with_capacity(catalog.entry_count());
        for (category_idx, category) in catalog.categories.iter().enumerate() {
            for (entry_idx, entry) in category.entries.iter().enumerate() {
                let location = EntryLocation {
                    category: category_idx,
                    entry: entry_idx,
                    position: order.len(),
                };
                order.push(location);
                // First occurrence wins; duplicates never reach a published
                // registry.
                by_id.entry(entry.id.clone()).or_insert(location);
            }
        }
        Self {
            catalog,
            by_id,
            order,
        }
    }

    pub fn id(&self) -> &CatalogId {
        self.catalog.id()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn locate(&self, id: &EntryId) -> Option<EntryLocation> {
        self.by_id.get(id).copied()
    }

    pub fn entry(&self, id: &EntryId) -> Option<&Entry> {
        self.locate(id).and_then(|loc| self.entry_at(loc))
    }

    pub fn entry_at(&self, location: EntryLocation) -> Option<&Entry> {
        self.catalog
            .categories
            .get(location.category)?
            .entries
            .get(location.entry)
    }

    pub fn category_at(&self, location: EntryLocation) -> Option<&Category> {
        self.catalog.categories.get(location.category)
    }

    /// Location of the entry at a flat position, crossing category bounds.
    pub fn at_position(&self, position: usize) -> Option<EntryLocation> {
        self.order.get(position).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entry ids in stable (sorted) order.
    pub fn ids(&self) -> impl Iterator<Item = &EntryId> {
        self.by_id.keys()
    }
}
