// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// File name looked up when `--config` is not given.
pub const DEFAULT_TASK_FILE: &str = "Initdag.toml";

/// Parse task-file TOML without semantic checks.
pub fn parse_str(contents: &str) -> Result<RawConfigFile> {
    Ok(toml::from_str(contents)?)
}

/// Read and parse the task file at `path`.
///
/// Only deserializes; see [`load_and_validate`] for the checked variant.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading task file");
    parse_str(&fs::read_to_string(path)?)
}

/// Read, parse and validate the task file at `path`.
///
/// Rejects files without tasks, unknown or self `after` references, cyclic
/// dependencies and out-of-range `[config]` values.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    ConfigFile::try_from(load_from_path(path)?)
}
