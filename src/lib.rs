//! Content model and retrieval layer for lesson catalogs and interview banks.
//!
//! The crate exposes the typed content schema (entries, categories,
//! catalogs), batch validation, aggregation of partitioned part files, the
//! published registry, and the cross-language lookup surface used by the
//! presentation layer. Public functions here form the contract the
//! `content-check` and `content-query` binaries depend on.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod coverage;
pub mod crossref;
pub mod loader;
pub mod query;
pub mod runtime;
pub mod schema_loader;
pub mod validation;

pub use catalog::{
    Catalog, CatalogId, CatalogIndex, CatalogKind, CatalogMetadata, Category, CategoryId,
    Challenge, CrossLanguageId, Diagram, Difficulty, Entry, EntryId, EntryLocation, PublishError,
    QuizQuestion, Registry, RegistryBuilder, Section, aggregate,
};
pub use coverage::{ConceptCoverage, build_concept_coverage, sparse_concepts};
pub use crossref::CrossReferenceIndex;
pub use loader::{ContentLoader, check_content, load_library, load_registry};
pub use query::{CatalogStats, CrossReference, EntryFilter, Library, LocatedEntry};
pub use validation::{
    SchemaViolation, ValidationReport, ViolationKind, ViolationPath, validate_catalog,
    validate_category, validate_entry, validate_registry,
};

const ROOT_SENTINEL: &str = "content/registry.json";

/// Returns true when `candidate` holds a content tree.
fn is_content_root(candidate: &Path) -> bool {
    candidate.join(ROOT_SENTINEL).is_file()
}

fn content_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.exists() || !is_content_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_content_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the content root.
///
/// Search order: `LESSONBANK_ROOT` when it points at a content tree, then
/// the directories above the current executable, then the build-time hint.
pub fn find_content_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var("LESSONBANK_ROOT") {
        if let Some(root) = content_root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(root) = search_upwards(exe_dir) {
                return Ok(root);
            }
        }
    }

    if let Some(hint) = option_env!("LESSONBANK_ROOT_HINT") {
        if let Some(root) = content_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!(
        "Unable to locate a content root (a directory containing {ROOT_SENTINEL}). Set LESSONBANK_ROOT or pass --root."
    );
}

/// Resolve an explicit `--root` value, or fall back to discovery.
pub fn resolve_content_root(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            if !is_content_root(path) {
                bail!("{} does not contain {ROOT_SENTINEL}", path.display());
            }
            Ok(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
        }
        None => find_content_root(),
    }
}

/// Split comma- or whitespace-delimited lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_accepts_commas_and_spaces() {
        assert_eq!(
            split_list("basics, io  types,,"),
            vec!["basics", "io", "types"]
        );
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn resolve_content_root_rejects_plain_dirs() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_content_root(Some(dir.path())).is_err());
    }

    #[test]
    fn crate_root_is_a_content_root() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        assert!(resolve_content_root(Some(root)).is_ok());
    }
}
