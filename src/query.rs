//! Read-only query surface used by presentation code.
//!
//! `Library` owns a published `Registry` and memoizes the cross-reference
//! index on first use. Every lookup is a pure read; absence is `None` or an
//! empty list, never an error, since deep links to renamed content are an
//! expected condition.

use crate::catalog::identity::{CatalogId, CatalogKind, Difficulty, EntryId};
use crate::catalog::index::EntryLocation;
use crate::catalog::model::{Catalog, Category, Entry};
use crate::catalog::registry::Registry;
use crate::crossref::CrossReferenceIndex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// An entry paired with the catalog that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReference<'a> {
    pub catalog_id: &'a CatalogId,
    pub entry: &'a Entry,
}

/// An entry with its owning category and flat position in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatedEntry<'a> {
    pub catalog_id: &'a CatalogId,
    pub category: &'a Category,
    pub entry: &'a Entry,
    pub position: usize,
}

/// Common predicates over tags and difficulty. Empty criteria match all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// Entry carries at least one of these tags.
    pub any_tags: Vec<String>,
    /// Entry carries every one of these tags.
    pub all_tags: Vec<String>,
    pub difficulty: Option<Difficulty>,
    /// Entry is at or below this level on the difficulty scale.
    pub max_difficulty: Option<Difficulty>,
    pub has_quiz: bool,
    pub has_challenge: bool,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        if !self.any_tags.is_empty() && !self.any_tags.iter().any(|t| entry.has_tag(t)) {
            return false;
        }
        if !self.all_tags.iter().all(|t| entry.has_tag(t)) {
            return false;
        }
        if let Some(wanted) = &self.difficulty {
            if entry.difficulty.as_ref() != Some(wanted) {
                return false;
            }
        }
        if let Some(max) = self.max_difficulty.as_ref().and_then(Difficulty::rank) {
            match entry.difficulty.as_ref().and_then(Difficulty::rank) {
                Some(rank) if rank <= max => {}
                _ => return false,
            }
        }
        if self.has_quiz && entry.quiz_len() == 0 {
            return false;
        }
        if self.has_challenge && entry.challenge.is_none() {
            return false;
        }
        true
    }
}

/// Summary counts for one catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub catalog_id: CatalogId,
    pub kind: CatalogKind,
    pub categories: usize,
    pub entries: usize,
    pub by_difficulty: BTreeMap<String, usize>,
    pub quiz_questions: usize,
    pub challenges: usize,
    pub cross_linked: usize,
}

/// Published registry plus a lazily built cross-reference index.
///
/// The index is built at most once, on first cross-reference lookup; readers
/// on other threads block until it is complete and never see a partial index.
#[derive(Debug)]
pub struct Library {
    registry: Registry,
    crossrefs: OnceLock<CrossReferenceIndex>,
}

impl Library {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            crossrefs: OnceLock::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn cross_reference_index(&self) -> &CrossReferenceIndex {
        self.crossrefs
            .get_or_init(|| CrossReferenceIndex::build(&self.registry))
    }

    pub fn get_catalog(&self, id: &str) -> Option<&Catalog> {
        self.registry.get(&CatalogId::from(id))
    }

    pub fn get_entry(&self, catalog_id: &str, entry_id: &str) -> Option<&Entry> {
        self.registry
            .find_entry(&CatalogId::from(catalog_id), &EntryId::from(entry_id))
    }

    pub fn locate_entry(&self, catalog_id: &str, entry_id: &str) -> Option<LocatedEntry<'_>> {
        let index = self.registry.index(&CatalogId::from(catalog_id))?;
        let location = index.locate(&EntryId::from(entry_id))?;
        self.located(catalog_id, location)
    }

    fn located(&self, catalog_id: &str, location: EntryLocation) -> Option<LocatedEntry<'_>> {
        let index = self.registry.index(&CatalogId::from(catalog_id))?;
        Some(LocatedEntry {
            catalog_id: index.id(),
            category: index.category_at(location)?,
            entry: index.entry_at(location)?,
            position: location.position,
        })
    }

    /// Stable filter over a catalog's entries; `None` when the catalog is
    /// unknown.
    pub fn filter_entries<F>(&self, catalog_id: &str, predicate: F) -> Option<Vec<&Entry>>
    where
        F: Fn(&Entry) -> bool,
    {
        let catalog = self.get_catalog(catalog_id)?;
        Some(
            catalog
                .entries()
                .map(|(_, entry)| entry)
                .filter(|&entry| predicate(entry))
                .collect(),
        )
    }

    pub fn filter(&self, catalog_id: &str, filter: &EntryFilter) -> Option<Vec<&Entry>> {
        self.filter_entries(catalog_id, |entry| filter.matches(entry))
    }

    /// Every entry carrying `id`, in catalog-registration order.
    ///
    /// A concept carried by one catalog yields a single element; blank and
    /// unknown ids yield an empty list.
    pub fn lookup_cross_references(&self, id: &str) -> Vec<CrossReference<'_>> {
        self.cross_reference_index()
            .slots(id)
            .iter()
            .filter_map(|slot| {
                let index = self.registry.index_at(slot.catalog)?;
                Some(CrossReference {
                    catalog_id: index.id(),
                    entry: index.entry_at(slot.location)?,
                })
            })
            .collect()
    }

    /// Entries in other catalogs sharing this entry's `crossLanguageId`.
    ///
    /// The entry itself is excluded. Empty when the entry is unknown or has
    /// no cross-language id.
    pub fn get_cross_language_siblings(
        &self,
        catalog_id: &str,
        entry_id: &str,
    ) -> Vec<CrossReference<'_>> {
        let Some(entry) = self.get_entry(catalog_id, entry_id) else {
            return Vec::new();
        };
        let Some(key) = entry.cross_language_key() else {
            return Vec::new();
        };
        self.lookup_cross_references(key.as_str())
            .into_iter()
            .filter(|reference| reference.catalog_id.as_str() != catalog_id)
            .collect()
    }

    /// The entry after `entry_id` in aggregated order, crossing categories.
    pub fn next_entry(&self, catalog_id: &str, entry_id: &str) -> Option<LocatedEntry<'_>> {
        let index = self.registry.index(&CatalogId::from(catalog_id))?;
        let current = index.locate(&EntryId::from(entry_id))?;
        let next = index.at_position(current.position + 1)?;
        self.located(catalog_id, next)
    }

    pub fn previous_entry(&self, catalog_id: &str, entry_id: &str) -> Option<LocatedEntry<'_>> {
        let index = self.registry.index(&CatalogId::from(catalog_id))?;
        let current = index.locate(&EntryId::from(entry_id))?;
        let previous = index.at_position(current.position.checked_sub(1)?)?;
        self.located(catalog_id, previous)
    }

    pub fn catalog_stats(&self, catalog_id: &str) -> Option<CatalogStats> {
        let catalog = self.get_catalog(catalog_id)?;
        let mut stats = CatalogStats {
            catalog_id: catalog.id().clone(),
            kind: catalog.metadata.kind,
            categories: catalog.categories.len(),
            ..Default::default()
        };
        for difficulty in Difficulty::ALL {
            stats.by_difficulty.insert(difficulty.as_str().to_string(), 0);
        }
        for (_, entry) in catalog.entries() {
            stats.entries += 1;
            if let Some(difficulty) = &entry.difficulty {
                *stats
                    .by_difficulty
                    .entry(difficulty.as_str().to_string())
                    .or_default() += 1;
            }
            stats.quiz_questions += entry.quiz_len();
            if entry.challenge.is_some() {
                stats.challenges += 1;
            }
            if entry.cross_language_key().is_some() {
                stats.cross_linked += 1;
            }
        }
        Some(stats)
    }
}
