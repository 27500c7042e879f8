//! Build-time content check.
//!
//! Loads every catalog under the content root, runs schema validation, and
//! prints each violation with its catalog/category/entry path. Exits 1 when
//! any violation is found so CI can block publishing broken content.

use anyhow::{Context, Result, bail};
use lessonbank::{
    Library, Registry, build_concept_coverage, check_content, resolve_content_root,
    runtime::{init_logging, take_root_flag},
};
use serde_json::json;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

fn main() {
    init_logging();
    match run() {
        Ok(clean) => std::process::exit(if clean { 0 } else { 1 }),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

struct Cli {
    root: Option<PathBuf>,
    json: bool,
    coverage: bool,
}

impl Cli {
    fn parse() -> Result<Self> {
        let args: Vec<OsString> = env::args_os().skip(1).collect();
        let (root, rest) = take_root_flag(args)?;
        let mut cli = Cli {
            root,
            json: false,
            coverage: false,
        };
        for arg in rest {
            let arg = arg
                .to_str()
                .with_context(|| "Invalid UTF-8 in argument")?
                .to_string();
            match arg.as_str() {
                "--json" => cli.json = true,
                "--coverage" => cli.coverage = true,
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument '{other}' (see --help)"),
            }
        }
        Ok(cli)
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: content-check [--root DIR] [--json] [--coverage]\n\nValidates every catalog under the content root.\n\nOptions:\n  --root DIR   Content root (defaults to LESSONBANK_ROOT or discovery).\n  --json       Print the violation report as JSON.\n  --coverage   Also print cross-language concept coverage (under \"coverage\" with --json)."
    );
    std::process::exit(code);
}

/// Returns whether the content is free of violations.
fn run() -> Result<bool> {
    let cli = Cli::parse()?;
    let root = resolve_content_root(cli.root.as_deref())?;
    let (catalogs, report) = check_content(&root)?;
    let entry_total: usize = catalogs.iter().map(|c| c.entry_count()).sum();

    if cli.coverage && !report.is_clean() {
        bail!("coverage requires content without violations");
    }
    let coverage = if cli.coverage {
        let mut builder = Registry::builder();
        for catalog in &catalogs {
            builder.register(catalog.clone());
        }
        let library = Library::new(builder.publish()?);
        Some(serde_json::to_value(build_concept_coverage(&library))?)
    } else {
        None
    };

    if cli.json {
        let mut output = json!({
            "root": root.display().to_string(),
            "catalogs": catalogs.len(),
            "entries": entry_total,
            "violations": report.violations,
        });
        if let Some(coverage) = coverage {
            output["coverage"] = coverage;
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for violation in &report.violations {
            println!("{violation}");
        }
        eprintln!(
            "checked {} catalog(s), {} entr{}: {} violation(s)",
            catalogs.len(),
            entry_total,
            if entry_total == 1 { "y" } else { "ies" },
            report.len()
        );
        if let Some(coverage) = coverage {
            println!("{}", serde_json::to_string_pretty(&coverage)?);
        }
    }

    Ok(report.is_clean())
}
