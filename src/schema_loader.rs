//! JSON Schema loading for content files.
//!
//! Every content file kind (registry, catalog manifest, part) has a schema
//! under `schema/`. Schemas carry a top-level `schema_version` that must
//! match the content's declared version, so a content tree cannot be checked
//! against a schema from a different generation.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Content schema generation understood by this crate.
pub const CONTENT_SCHEMA_VERSION: &str = "lessonbank_content_v1";

pub const REGISTRY_SCHEMA_FILE: &str = "registry.schema.json";
pub const CATALOG_SCHEMA_FILE: &str = "catalog.schema.json";
pub const PART_SCHEMA_FILE: &str = "part.schema.json";

/// Compiled schema plus the version it declared.
pub(crate) struct LoadedSchema {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

pub(crate) fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([CONTENT_SCHEMA_VERSION.to_string()])
}

pub(crate) fn validate_schema_version(schema_version: &str) -> Result<()> {
    if schema_version.is_empty() {
        bail!("schema_version must not be empty");
    }
    let allowed = allowed_schema_versions();
    if !allowed.contains(schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }
    Ok(())
}

/// Load and compile the schema at `path`, checking its declared version.
pub(crate) fn load_json_schema(path: &Path, expected_version: &str) -> Result<LoadedSchema> {
    let schema = read_json(path).with_context(|| format!("loading schema {}", path.display()))?;

    let schema_version = schema
        .get("schema_version")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("schema {} missing schema_version", path.display()))?;
    if schema_version != expected_version {
        bail!(
            "schema {} declares version '{}' but content uses '{}'",
            path.display(),
            schema_version,
            expected_version
        );
    }

    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling schema {}: {err}", path.display()))?;

    Ok(LoadedSchema {
        schema_version,
        compiled,
    })
}

/// Validate `instance` against `schema`, reporting every structural error.
pub(crate) fn check_instance(schema: &LoadedSchema, instance: &Value, path: &Path) -> Result<()> {
    if let Err(errors) = schema.compiled.validate(instance) {
        let details = errors
            .map(|err| format!("  {}: {}", err.instance_path, err))
            .collect::<Vec<_>>()
            .join("\n");
        bail!(
            "{} failed {} schema validation:\n{}",
            path.display(),
            schema.schema_version,
            details
        );
    }
    Ok(())
}

pub(crate) fn read_json(path: &Path) -> Result<Value> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))
}

/// Schema directory for a content root.
///
/// Prefers `<root>/schema` so content trees can pin their own schemas, then
/// falls back to the schemas shipped with the crate.
pub fn resolve_schema_dir(root: &Path) -> PathBuf {
    let candidate = root.join("schema");
    if candidate.join(REGISTRY_SCHEMA_FILE).is_file() {
        return candidate;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::NamedTempFile;

    fn schema_file(value: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut file, value).unwrap();
        file
    }

    #[test]
    fn rejects_mismatched_schema_version() {
        let file = schema_file(&json!({"schema_version": "lessonbank_content_v0", "type": "object"}));
        let err = load_json_schema(file.path(), CONTENT_SCHEMA_VERSION)
            .err()
            .expect("version mismatch should fail");
        assert!(err.to_string().contains("lessonbank_content_v0"));
    }

    #[test]
    fn check_instance_lists_every_error() {
        let file = schema_file(&json!({
            "schema_version": CONTENT_SCHEMA_VERSION,
            "type": "object",
            "properties": {"a": {"type": "string"}, "b": {"type": "array"}}
        }));
        let schema = load_json_schema(file.path(), CONTENT_SCHEMA_VERSION).unwrap();
        assert!(check_instance(&schema, &json!({"a": "ok"}), file.path()).is_ok());
        let err = check_instance(&schema, &json!({"a": 1, "b": 2}), file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("/a"), "{message}");
        assert!(message.contains("/b"), "{message}");
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        assert!(validate_schema_version(CONTENT_SCHEMA_VERSION).is_ok());
        assert!(validate_schema_version("").is_err());
        assert!(validate_schema_version("lessonbank_content_v9").is_err());
    }

    #[test]
    fn shipped_schemas_compile() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema");
        for name in [REGISTRY_SCHEMA_FILE, CATALOG_SCHEMA_FILE, PART_SCHEMA_FILE] {
            load_json_schema(&dir.join(name), CONTENT_SCHEMA_VERSION)
                .unwrap_or_else(|err| panic!("{name}: {err:#}"));
        }
    }
}
