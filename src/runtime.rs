//! Runtime helpers shared across binaries.
//!
//! Centralizes logging setup and the `--root` flag so the CLIs behave the
//! same way instead of re-implementing it.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `lessonbank=debug`).
pub const LOG_ENV: &str = "LESSONBANK_LOG";

/// Install a stderr `tracing` subscriber filtered by `LESSONBANK_LOG`.
///
/// Defaults to `warn`. Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Pull `--root <dir>` (or `--root=<dir>`) out of `args`, returning the
/// remaining arguments in order.
pub fn take_root_flag(args: Vec<OsString>) -> Result<(Option<PathBuf>, Vec<OsString>)> {
    let mut root = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--root" {
            let value = iter.next().context("--root requires a directory")?;
            root = Some(PathBuf::from(value));
            continue;
        }
        if let Some(value) = arg.to_str().and_then(|s| s.strip_prefix("--root=")) {
            root = Some(PathBuf::from(value));
            continue;
        }
        rest.push(arg);
    }
    Ok((root, rest))
}
