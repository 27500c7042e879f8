#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Run `content-check` with `args`, returning its output regardless of status.
pub fn content_check(args: &[&str]) -> Result<Output> {
    run(Command::new(env!("CARGO_BIN_EXE_content-check")), args)
}

/// Run `content-query` with `args`, returning its output regardless of status.
pub fn content_query(args: &[&str]) -> Result<Output> {
    run(Command::new(env!("CARGO_BIN_EXE_content-query")), args)
}

fn run(mut cmd: Command, args: &[&str]) -> Result<Output> {
    cmd.args(args).env_remove("LESSONBANK_ROOT");
    cmd.output()
        .with_context(|| format!("failed to run command: {:?}", cmd))
}

pub fn stdout_json(output: &Output) -> Result<Value> {
    serde_json::from_slice(&output.stdout).with_context(|| {
        format!(
            "stdout was not JSON:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

/// Content tree in a temporary directory.
///
/// No `schema/` directory is written, so loads fall back to the crate's
/// shipped schemas.
pub struct ContentFixture {
    dir: TempDir,
}

impl ContentFixture {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("allocating fixture dir")?;
        fs::create_dir_all(dir.path().join("content"))?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn root_arg(&self) -> String {
        self.root().display().to_string()
    }

    pub fn write_registry(&self, catalogs: &[&str]) -> Result<()> {
        self.write_json(
            "content/registry.json",
            &json!({"schema_version": "lessonbank_content_v1", "catalogs": catalogs}),
        )
    }

    /// Write a catalog manifest plus one file per part, named `partN.json`.
    pub fn write_catalog(&self, id: &str, kind: &str, parts: &[Value]) -> Result<()> {
        let part_names: Vec<String> = (1..=parts.len()).map(|n| format!("part{n}.json")).collect();
        self.write_json(
            &format!("content/{id}/catalog.json"),
            &json!({
                "id": id,
                "kind": kind,
                "label": id.to_uppercase(),
                "icon": id,
                "color": "#000000",
                "tagline": format!("{id} fixture"),
                "links": {"docs": format!("https://example.test/{id}")},
                "parts": part_names,
            }),
        )?;
        for (name, part) in part_names.iter().zip(parts) {
            self.write_json(&format!("content/{id}/{name}"), part)?;
        }
        Ok(())
    }

    pub fn write_json(&self, relative: &str, value: &Value) -> Result<()> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_vec_pretty(value)?)
            .with_context(|| format!("writing {}", path.display()))
    }
}

pub fn entry(id: &str, cross: Option<&str>) -> Value {
    let mut value = json!({
        "id": id,
        "title": format!("Lesson {id}"),
        "difficulty": "beginner",
        "tags": ["basics"],
        "sections": [{"heading": "Intro", "content": format!("About {id}.")}]
    });
    if let Some(cross) = cross {
        value["crossLanguageId"] = json!(cross);
    }
    value
}

pub fn category(id: &str, entries: Vec<Value>) -> Value {
    json!({"id": id, "label": id.to_uppercase(), "icon": "book", "entries": entries})
}
