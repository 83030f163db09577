// src/lib.rs

//! Dependency-ordered initialization tasks.
//!
//! `initdag` takes a set of tasks that declare dependencies on each other,
//! dispatches them in topological order, runs independent tasks concurrently
//! on worker contexts, runs caller-bound tasks synchronously inside
//! [`Scheduler::start`], and lets the caller wait (bounded) for a chosen
//! subset via [`Scheduler::await_completion`]. Results are memoized in a
//! [`ResultCache`] so a task runs at most once per cache.

pub mod cache;
pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod sync;
pub mod task;
pub mod types;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub use cache::{CachedResult, ResultCache};
pub use config::{SchedulerBuilder, SchedulerOptions};
pub use engine::{ErrorSink, RunReport, Scheduler, TaskTiming, TracingErrorSink};
pub use errors::{InitDagError, TaskError};
pub use exec::{InlineContext, ThreadContext, TokioWorkerPool, WorkerContext};
pub use sync::{CompletionGate, DependencyTracker, ParentResults};
pub use task::{FnTask, InitTask, TaskRef};
pub use types::{ContextKind, GateOutcome, TaskId};

use crate::cli::CliArgs;
use crate::config::model::ConfigFile;
use crate::dag::{DependencyGraph, TopologicalOrder};
use crate::exec::command::{ExitCode, command_task};

/// What the `initdag` binary reports after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Outcome of the bounded wait; `None` for a dry run.
    pub awaited: Option<GateOutcome>,
    /// Full run report; `None` for a dry run or when the deadline passed
    /// before every task finished.
    pub report: Option<RunReport>,
    pub failed: Vec<TaskId>,
    /// Tasks still running (or waiting on a parent) at the deadline.
    pub pending: Vec<TaskId>,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && self.pending.is_empty()
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - shell-command tasks from the validated task file
/// - the scheduler and its default worker pool
/// - the bounded wait, then the wait for the full run report
///
/// `await_timeout_ms` (or `--timeout-ms`) is the deadline for the whole run,
/// measured from `start()`. Tasks unfinished by then are listed in
/// [`RunSummary::pending`]; their processes are left running.
pub fn run(args: &CliArgs, cfg: ConfigFile) -> Result<RunSummary> {
    let tasks: Vec<TaskRef<ExitCode>> = cfg
        .task
        .iter()
        .map(|(name, tc)| command_task(name, tc).shared() as TaskRef<ExitCode>)
        .collect();

    if args.dry_run {
        print_dry_run(&cfg, &tasks)?;
        return Ok(RunSummary {
            awaited: None,
            report: None,
            failed: Vec::new(),
            pending: Vec::new(),
        });
    }

    let mut options = cfg.config.clone();
    if let Some(ms) = args.timeout_ms {
        options.await_timeout_ms = ms;
    }

    let deadline = Instant::now() + options.await_timeout();
    let (report_tx, mut report_rx) = mpsc::unbounded_channel::<RunReport>();

    let mut scheduler = Scheduler::builder()
        .options(options)
        .tasks(tasks)
        .on_run_completed(move |report| {
            let _ = report_tx.send(report.clone());
        })
        .build()
        .context("building scheduler")?;

    scheduler.start().context("starting run")?;
    let awaited = scheduler.await_completion()?;
    info!(?awaited, "caller released");

    let remaining = deadline.saturating_duration_since(Instant::now());
    let report = wait_for_report(&mut report_rx, remaining)?;
    match &report {
        Some(report) => print_report(report),
        None => warn!("deadline passed before every task finished"),
    }

    let mut failed = Vec::new();
    let mut pending = Vec::new();
    for task in scheduler.config().tasks() {
        match scheduler.cache().get(task.id().as_str()) {
            Some(Ok(_)) => {}
            Some(Err(_)) => failed.push(task.id().clone()),
            None => pending.push(task.id().clone()),
        }
    }
    if !pending.is_empty() {
        let names: Vec<&str> = pending.iter().map(TaskId::as_str).collect();
        println!("still running at deadline: {}", names.join(", "));
    }

    Ok(RunSummary {
        awaited: Some(awaited),
        report,
        failed,
        pending,
    })
}

/// Receive the run report, giving up after `within`.
fn wait_for_report(
    rx: &mut mpsc::UnboundedReceiver<RunReport>,
    within: Duration,
) -> Result<Option<RunReport>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("building report-wait runtime")?;

    Ok(runtime.block_on(async { tokio::time::timeout(within, rx.recv()).await.ok().flatten() }))
}

/// Print the options, each task with its flags, and the dispatch order.
fn print_dry_run(cfg: &ConfigFile, tasks: &[TaskRef<ExitCode>]) -> Result<()> {
    let graph = DependencyGraph::build(tasks)?;
    let order = TopologicalOrder::sort(&graph)?;

    println!(
        "dry run: {} task(s), await timeout {} ms, up to {} workers",
        graph.len(),
        cfg.config.await_timeout_ms,
        cfg.config.max_workers
    );

    for (position, id) in order.ids().iter().enumerate() {
        let Some(task) = cfg.task.get(id.as_str()) else {
            continue;
        };
        let mut flags = Vec::new();
        if task.on_caller {
            flags.push("on_caller");
        }
        if task.caller_waits {
            flags.push("caller_waits");
        }
        let deps: Vec<&str> = graph
            .dependencies_of(id.as_str())
            .into_iter()
            .map(TaskId::as_str)
            .collect();

        println!("{:>3}. {id}  [{}]", position + 1, flags.join(", "));
        println!("       cmd:   {}", task.cmd);
        if !deps.is_empty() {
            println!("       after: {}", deps.join(", "));
        }
    }

    debug!("dry run finished; nothing executed");
    Ok(())
}

fn print_report(report: &RunReport) {
    println!(
        "run finished in {} ms (caller blocked {} ms)",
        report.total_elapsed.as_millis(),
        report.caller_elapsed.as_millis()
    );
    for timing in &report.tasks {
        println!(
            "  {:<24} {:>8} ms  {:?}{}{}",
            timing.task.as_str(),
            timing.elapsed.as_millis(),
            timing.context,
            if timing.cached { "  cached" } else { "" },
            if timing.succeeded { "" } else { "  FAILED" },
        );
    }
}
