// src/config/mod.rs

//! Configuration for initdag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a task file from disk (`loader.rs`).
//! - Validate basic invariants like DAG correctness (`validate.rs`).
//! - Assemble the immutable run configuration in code (`builder.rs`).

pub mod builder;
pub mod loader;
pub mod model;
pub mod validate;

pub use builder::{RunConfig, RunListener, SchedulerBuilder};
pub use loader::{DEFAULT_TASK_FILE, load_and_validate, load_from_path, parse_str};
pub use model::{ConfigFile, RawConfigFile, SchedulerOptions, TaskConfig};
