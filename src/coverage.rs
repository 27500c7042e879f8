//! Cross-language concept coverage.
//!
//! Builds a concept→catalog mapping used by the content check to show which
//! language catalogs still lack a lesson for a concept that others teach.
//! Role catalogs (interview banks) are listed when they carry a concept but
//! never counted as missing one.

use crate::catalog::identity::{CatalogId, CatalogKind, EntryId};
use crate::query::Library;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Which catalogs teach a concept, and which language catalogs do not.
pub struct ConceptCoverage {
    /// Carrying catalog id → entry id, in registration order of first sight.
    pub carriers: Vec<(CatalogId, EntryId)>,
    pub missing: Vec<CatalogId>,
}

impl ConceptCoverage {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Build the coverage map for every indexed concept, keyed in sorted order.
pub fn build_concept_coverage(library: &Library) -> BTreeMap<String, ConceptCoverage> {
    let languages: Vec<&CatalogId> = library
        .registry()
        .catalogs()
        .filter(|catalog| catalog.metadata.kind == CatalogKind::Language)
        .map(|catalog| catalog.id())
        .collect();

    let mut map = BTreeMap::new();
    for concept in library.cross_reference_index().concepts() {
        let carriers: Vec<(CatalogId, EntryId)> = library
            .lookup_cross_references(concept.as_str())
            .into_iter()
            .map(|reference| (reference.catalog_id.clone(), reference.entry.id.clone()))
            .collect();
        let missing = languages
            .iter()
            .filter(|language| !carriers.iter().any(|(catalog, _)| catalog == **language))
            .map(|language| (*language).clone())
            .collect();
        map.insert(concept.0.clone(), ConceptCoverage { carriers, missing });
    }
    map
}

/// Concepts taught by fewer than `min_catalogs` catalogs.
pub fn sparse_concepts(
    coverage: &BTreeMap<String, ConceptCoverage>,
    min_catalogs: usize,
) -> Vec<&str> {
    coverage
        .iter()
        .filter(|(_, entry)| entry.carriers.len() < min_catalogs)
        .map(|(concept, _)| concept.as_str())
        .collect()
}
