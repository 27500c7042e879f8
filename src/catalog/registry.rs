//! Holds every published catalog, keyed by catalog id.
//!
//! Catalogs keep their registration order; cross-references and listings
//! iterate in that order so output is deterministic. A registry only exists
//! after `RegistryBuilder::publish` has validated every catalog, so callers
//! never see partially-invalid content.

use crate::catalog::identity::{CatalogId, EntryId};
use crate::catalog::index::{CatalogIndex, EntryLocation};
use crate::catalog::model::{Catalog, Entry};
use crate::validation::{ValidationReport, validate_registry};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("content failed validation with {count} violation(s):\n{report}", count = .report.len())]
    Invalid { report: ValidationReport },
}

impl PublishError {
    pub fn report(&self) -> &ValidationReport {
        match self {
            PublishError::Invalid { report } => report,
        }
    }
}

#[derive(Default)]
/// Collects catalogs in registration order before publishing.
pub struct RegistryBuilder {
    catalogs: Vec<Catalog>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog. Duplicate ids are reported at publish time.
    pub fn register(&mut self, catalog: Catalog) -> &mut Self {
        self.catalogs.push(catalog);
        self
    }

    pub fn with(mut self, catalog: Catalog) -> Self {
        self.catalogs.push(catalog);
        self
    }

    /// Validation report for everything registered so far.
    pub fn check(&self) -> ValidationReport {
        validate_registry(&self.catalogs)
    }

    /// Validate and freeze the registry.
    ///
    /// Any violation rejects the whole registry; the error carries the full
    /// report.
    pub fn publish(self) -> Result<Registry, PublishError> {
        let report = self.check();
        if !report.is_clean() {
            tracing::warn!(
                violations = report.len(),
                "rejecting content registry with schema violations"
            );
            return Err(PublishError::Invalid { report });
        }

        let mut by_id = BTreeMap::new();
        let mut catalogs = Vec::with_capacity(self.catalogs.len());
        for catalog in self.catalogs {
            by_id.insert(catalog.id().clone(), catalogs.len());
            catalogs.push(CatalogIndex::build(catalog));
        }
        let registry = Registry { catalogs, by_id };
        tracing::info!(
            catalogs = registry.len(),
            entries = registry.entry_count(),
            "published content registry"
        );
        Ok(registry)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable table of published catalogs.
pub struct Registry {
    catalogs: Vec<CatalogIndex>,
    by_id: BTreeMap<CatalogId, usize>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, id: &CatalogId) -> Option<&Catalog> {
        self.index(id).map(CatalogIndex::catalog)
    }

    pub fn index(&self, id: &CatalogId) -> Option<&CatalogIndex> {
        self.by_id.get(id).map(|&idx| &self.catalogs[idx])
    }

    pub(crate) fn index_at(&self, position: usize) -> Option<&CatalogIndex> {
        self.catalogs.get(position)
    }

    /// Resolve an entry inside a registered catalog.
    pub fn find_entry(&self, catalog: &CatalogId, entry: &EntryId) -> Option<&Entry> {
        self.index(catalog)?.entry(entry)
    }

    /// Indexed catalogs in registration order.
    pub fn indexes(&self) -> impl Iterator<Item = &CatalogIndex> {
        self.catalogs.iter()
    }

    /// Catalogs in registration order.
    pub fn catalogs(&self) -> impl Iterator<Item = &Catalog> {
        self.catalogs.iter().map(CatalogIndex::catalog)
    }

    /// Every entry with its catalog position and location, in registration
    /// then aggregated order.
    pub(crate) fn located_entries(&self) -> impl Iterator<Item = (usize, EntryLocation, &Entry)> {
        self.catalogs
            .iter()
            .enumerate()
            .flat_map(|(catalog_pos, index)| {
                (0..index.len()).filter_map(move |position| {
                    let location = index.at_position(position)?;
                    Some((catalog_pos, location, index.entry_at(location)?))
                })
            })
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.catalogs.iter().map(CatalogIndex::len).sum()
    }
}
