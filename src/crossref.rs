//! Cross-language reference index.
//!
//! Built in one pass over a published registry: every entry with a
//! non-blank `crossLanguageId` is appended under its trimmed key, so each
//! bucket lists carriers in catalog-registration order and then aggregated
//! entry order. Lookups are exact-key only.

use crate::catalog::identity::CrossLanguageId;
use crate::catalog::index::EntryLocation;
use crate::catalog::registry::Registry;
use std::collections::BTreeMap;

/// Position of one carrier of a concept inside a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossRefSlot {
    /// Catalog position in registration order.
    pub catalog: usize,
    pub location: EntryLocation,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrossReferenceIndex {
    by_concept: BTreeMap<CrossLanguageId, Vec<CrossRefSlot>>,
}

impl CrossReferenceIndex {
    pub fn build(registry: &Registry) -> Self {
        let mut by_concept: BTreeMap<CrossLanguageId, Vec<CrossRefSlot>> = BTreeMap::new();
        for (catalog, location, entry) in registry.located_entries() {
            let Some(key) = entry.cross_language_key() else {
                continue;
            };
            by_concept
                .entry(key)
                .or_default()
                .push(CrossRefSlot { catalog, location });
        }
        tracing::debug!(concepts = by_concept.len(), "built cross-reference index");
        Self { by_concept }
    }

    /// Carriers of `id`; empty for blank or unknown ids.
    pub fn slots(&self, id: &str) -> &[CrossRefSlot] {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return &[];
        }
        self.by_concept
            .get(&CrossLanguageId(trimmed.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Indexed concept ids in sorted order.
    pub fn concepts(&self) -> impl Iterator<Item = &CrossLanguageId> {
        self.by_concept.keys()
    }

    pub fn len(&self) -> usize {
        self.by_concept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_concept.is_empty()
    }
}
