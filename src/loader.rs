//! Loads a content tree from disk into typed catalogs.
//!
//! Layout under a content root:
//!
//! ```text
//! content/registry.json            schema_version + catalog ids in registration order
//! content/<catalog>/catalog.json   display metadata + part files in aggregation order
//! content/<catalog>/<part>.json    array of categories
//! schema/*.schema.json             optional; falls back to the crate's schemas
//! ```
//!
//! Files are checked against their JSON Schema before deserialization, so
//! structural mistakes fail the load with file context. Semantic problems
//! (missing titles, bad `correctIndex`, duplicate ids) are left to
//! `validation` and surface when the registry is published.

use crate::catalog::aggregate::aggregate;
use crate::catalog::identity::{CatalogId, is_url_safe};
use crate::catalog::model::{Catalog, CatalogMetadata, Category};
use crate::catalog::registry::{Registry, RegistryBuilder};
use crate::query::Library;
use crate::schema_loader::{
    CATALOG_SCHEMA_FILE, LoadedSchema, PART_SCHEMA_FILE, REGISTRY_SCHEMA_FILE, check_instance,
    load_json_schema, read_json, resolve_schema_dir, validate_schema_version,
};
use crate::validation::{ValidationReport, validate_registry};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

pub const CONTENT_DIR: &str = "content";
pub const REGISTRY_FILE: &str = "registry.json";
pub const CATALOG_FILE: &str = "catalog.json";

#[derive(Clone, Debug, Deserialize)]
/// Parsed `content/registry.json`.
pub struct RegistryManifest {
    pub schema_version: String,
    pub catalogs: Vec<CatalogId>,
}

#[derive(Clone, Debug, Deserialize)]
/// Parsed `content/<catalog>/catalog.json`.
pub struct CatalogManifest {
    #[serde(flatten)]
    pub metadata: CatalogMetadata,
    pub parts: Vec<String>,
}

/// Loader bound to one content root and its compiled schemas.
pub struct ContentLoader {
    content_dir: PathBuf,
    manifest: RegistryManifest,
    catalog_schema: LoadedSchema,
    part_schema: LoadedSchema,
}

impl ContentLoader {
    /// Read `content/registry.json` under `root` and compile the schemas.
    pub fn open(root: &Path) -> Result<Self> {
        let content_dir = root.join(CONTENT_DIR);
        let registry_path = content_dir.join(REGISTRY_FILE);
        let registry_value = read_json(&registry_path)?;

        let schema_version = registry_value
            .get("schema_version")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        validate_schema_version(&schema_version)
            .with_context(|| format!("checking {}", registry_path.display()))?;

        let schema_dir = resolve_schema_dir(root);
        let registry_schema =
            load_json_schema(&schema_dir.join(REGISTRY_SCHEMA_FILE), &schema_version)?;
        check_instance(&registry_schema, &registry_value, &registry_path)?;
        let manifest: RegistryManifest = serde_json::from_value(registry_value)
            .with_context(|| format!("decoding {}", registry_path.display()))?;

        let catalog_schema =
            load_json_schema(&schema_dir.join(CATALOG_SCHEMA_FILE), &schema_version)?;
        let part_schema = load_json_schema(&schema_dir.join(PART_SCHEMA_FILE), &schema_version)?;

        tracing::debug!(
            root = %root.display(),
            catalogs = manifest.catalogs.len(),
            %schema_version,
            "opened content root"
        );
        Ok(Self {
            content_dir,
            manifest,
            catalog_schema,
            part_schema,
        })
    }

    pub fn manifest(&self) -> &RegistryManifest {
        &self.manifest
    }

    /// Load every declared catalog in registration order.
    pub fn load_catalogs(&self) -> Result<Vec<Catalog>> {
        self.manifest
            .catalogs
            .iter()
            .map(|id| self.load_catalog(id))
            .collect()
    }

    /// Load one catalog and aggregate its parts in declared order.
    pub fn load_catalog(&self, id: &CatalogId) -> Result<Catalog> {
        if !is_url_safe(id.as_str()) {
            bail!("catalog id '{}' must match ^[A-Za-z0-9_.-]+$", id);
        }
        let catalog_dir = self.content_dir.join(id.as_str());
        let manifest_path = catalog_dir.join(CATALOG_FILE);
        let value = read_json(&manifest_path)?;
        check_instance(&self.catalog_schema, &value, &manifest_path)?;
        let manifest: CatalogManifest = serde_json::from_value(value)
            .with_context(|| format!("decoding {}", manifest_path.display()))?;
        if &manifest.metadata.id != id {
            bail!(
                "{} declares id '{}' but is registered as '{}'",
                manifest_path.display(),
                manifest.metadata.id,
                id
            );
        }

        let mut parts = Vec::with_capacity(manifest.parts.len());
        for part in &manifest.parts {
            let part_path = resolve_part_path(&catalog_dir, part)
                .with_context(|| format!("resolving parts of {}", manifest_path.display()))?;
            parts.push(self.load_part(&part_path)?);
        }
        let categories = aggregate(parts);
        tracing::debug!(
            catalog = %id,
            parts = manifest.parts.len(),
            categories = categories.len(),
            "aggregated catalog"
        );
        Ok(Catalog::new(manifest.metadata, categories))
    }

    /// Load a single part file.
    pub fn load_part(&self, path: &Path) -> Result<Vec<Category>> {
        let value = read_json(path)?;
        check_instance(&self.part_schema, &value, path)?;
        serde_json::from_value(value).with_context(|| format!("decoding {}", path.display()))
    }
}

/// Part paths are relative to the catalog directory and may not leave it.
fn resolve_part_path(catalog_dir: &Path, part: &str) -> Result<PathBuf> {
    let relative = Path::new(part.trim());
    if relative.as_os_str().is_empty() {
        bail!("empty part path");
    }
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        bail!("part path '{part}' must stay inside the catalog directory");
    }
    Ok(catalog_dir.join(relative))
}

/// Load catalogs and the validation report without publishing.
///
/// Used by the content check, which wants every violation even when the
/// registry would be rejected.
pub fn check_content(root: &Path) -> Result<(Vec<Catalog>, ValidationReport)> {
    let catalogs = ContentLoader::open(root)?.load_catalogs()?;
    let report = validate_registry(&catalogs);
    Ok((catalogs, report))
}

/// Load, validate, and publish the registry under `root`.
pub fn load_registry(root: &Path) -> Result<Registry> {
    let catalogs = ContentLoader::open(root)?.load_catalogs()?;
    let mut builder = RegistryBuilder::new();
    for catalog in catalogs {
        builder.register(catalog);
    }
    builder
        .publish()
        .with_context(|| format!("publishing content under {}", root.display()))
}

pub fn load_library(root: &Path) -> Result<Library> {
    load_registry(root).map(Library::new)
}
