// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

/// Top-level task file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// await_timeout_ms = 5000
/// max_workers = 8
///
/// [task.fetch]
/// cmd = "curl -sSf https://example.com -o /dev/null"
/// caller_waits = true
///
/// [task.migrate]
/// cmd = "./migrate.sh"
/// after = ["fetch"]
/// on_caller = true
/// ```
///
/// All sections are optional and have reasonable defaults; validation
/// rejects a file without tasks.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Scheduler options from `[config]`.
    #[serde(default)]
    pub config: SchedulerOptions,

    /// All tasks from `[task.<name>]`.
    ///
    /// Tasks are registered in key order.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// A validated task file. Construct through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: SchedulerOptions,
    pub task: BTreeMap<String, TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: SchedulerOptions, task: BTreeMap<String, TaskConfig>) -> Self {
        Self { config, task }
    }
}

/// `[config]` section; also the option set of [`SchedulerBuilder`](super::SchedulerBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchedulerOptions {
    /// Upper bound for `await_completion`, in milliseconds.
    #[serde(default = "default_await_timeout_ms")]
    pub await_timeout_ms: u64,

    /// Maximum number of tasks the default worker pool runs at once.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Log verbosity (`error`, `warn`, `info`, `debug`, `trace`).
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_await_timeout_ms() -> u64 {
    10_000
}

fn default_max_workers() -> usize {
    64
}

impl SchedulerOptions {
    pub fn await_timeout(&self) -> Duration {
        Duration::from_millis(self.await_timeout_ms)
    }
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            await_timeout_ms: default_await_timeout_ms(),
            max_workers: default_max_workers(),
            log_level: None,
        }
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Shell command to run.
    pub cmd: String,

    /// Dependency list: this task waits for all tasks listed here.
    #[serde(default)]
    pub after: Vec<String>,

    /// Run synchronously on the caller (main) thread.
    #[serde(default)]
    pub on_caller: bool,

    /// The caller's bounded wait includes this task.
    #[serde(default)]
    pub caller_waits: bool,
}
