// src/cli.rs

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Run initialization commands from a task file, parents before children.
///
/// Independent tasks run concurrently on a worker pool; tasks marked
/// `on_caller` run on the main thread.
#[derive(Debug, Clone, Parser)]
#[command(name = "initdag", version)]
pub struct CliArgs {
    /// Task file to load.
    #[arg(short, long, value_name = "PATH", default_value = crate::config::DEFAULT_TASK_FILE)]
    pub config: PathBuf,

    /// Verbosity; falls back to `INITDAG_LOG`, then `[config].log_level`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// How long to wait for `caller_waits` tasks, overriding
    /// `[config].await_timeout_ms`.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Validate the file and print the dispatch order without running
    /// anything.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
