// src/engine/scheduler.rs

use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::config::builder::{RunConfig, SchedulerBuilder};
use crate::dag::{DependencyGraph, TopologicalOrder};
use crate::engine::dispatcher::Dispatcher;
use crate::engine::run_state::RunState;
use crate::errors::{InitDagError, Result};
use crate::exec::WorkerContext;
use crate::types::{GateOutcome, TaskId};

/// Runs a registered set of tasks once.
///
/// A scheduler is bound to the thread that built it (the caller context)
/// and supports a single `start()` / `await_completion()` cycle. Results
/// persist in its [`ResultCache`], which can be shared with later
/// schedulers so already completed tasks are not executed again.
pub struct Scheduler<O> {
    config: RunConfig<O>,
    default_context: Arc<dyn WorkerContext>,
    caller: ThreadId,
    required_await_count: usize,
    run: Option<Arc<RunState<O>>>,
}

impl<O: Clone + Send + Sync + 'static> Scheduler<O> {
    pub fn builder() -> SchedulerBuilder<O> {
        SchedulerBuilder::new()
    }

    pub(crate) fn new(config: RunConfig<O>, default_context: Arc<dyn WorkerContext>) -> Self {
        let required_await_count = config.required_await_count();
        Self {
            config,
            default_context,
            caller: thread::current().id(),
            required_await_count,
            run: None,
        }
    }

    /// Build the graph and dispatch every task.
    ///
    /// Caller-bound tasks run before this returns; worker tasks are queued.
    pub fn start(&mut self) -> Result<()> {
        self.ensure_caller_context()?;

        if self.run.is_some() {
            return Err(InitDagError::AlreadyStarted);
        }
        if self.config.tasks.is_empty() {
            return Err(InitDagError::EmptyTaskList);
        }

        let graph = DependencyGraph::build(&self.config.tasks)?;
        let order = TopologicalOrder::sort(&graph)?;

        info!(
            tasks = graph.len(),
            required_await_count = self.required_await_count,
            "starting run"
        );
        debug!(order = ?order.ids(), "dispatch order");

        let run = Arc::new(RunState::new(
            self.config.tasks.clone(),
            graph,
            order,
            Arc::clone(&self.config.cache),
            self.required_await_count,
            self.config.listener.clone(),
            Arc::clone(&self.config.error_sink),
            Arc::clone(&self.config.callback_context),
        ));
        self.run = Some(Arc::clone(&run));

        Dispatcher::new(&run, &self.default_context).dispatch_all();
        Ok(())
    }

    /// Block until every `caller_waits` worker task has completed, or the
    /// configured timeout elapses.
    ///
    /// A timeout is reported as [`GateOutcome::TimedOut`], not as an error;
    /// in-flight tasks keep running and still update the cache.
    pub fn await_completion(&self) -> Result<GateOutcome> {
        self.ensure_caller_context()?;
        let run = self.run.as_ref().ok_or(InitDagError::NotStarted)?;

        let timeout = self.config.options.await_timeout();
        let outcome = run.gate.wait_timeout(timeout);
        match outcome {
            GateOutcome::Signaled => {
                debug!(required = run.required_await_count, "awaited tasks completed");
            }
            GateOutcome::TimedOut => {
                warn!(
                    timeout_ms = self.config.options.await_timeout_ms,
                    remaining = run.gate.remaining(),
                    "timed out waiting for tasks; continuing"
                );
            }
        }
        Ok(outcome)
    }

    /// Number of tasks `await_completion` waits for.
    pub fn required_await_count(&self) -> usize {
        self.required_await_count
    }

    pub fn task_count(&self) -> usize {
        self.config.tasks.len()
    }

    /// Tasks that have passed through the completion protocol in this run.
    pub fn completed_count(&self) -> usize {
        self.run.as_ref().map_or(0, |run| run.completed_count())
    }

    pub fn is_started(&self) -> bool {
        self.run.is_some()
    }

    /// Whether every task of the run has completed.
    pub fn is_finished(&self) -> bool {
        self.run.as_ref().is_some_and(|run| run.is_finished())
    }

    /// Order in which tasks were dispatched, once started.
    pub fn dispatch_order(&self) -> Option<&[TaskId]> {
        self.run.as_ref().map(|run| run.order.ids())
    }

    pub fn cache(&self) -> &Arc<ResultCache<O>> {
        &self.config.cache
    }

    pub fn config(&self) -> &RunConfig<O> {
        &self.config
    }

    fn ensure_caller_context(&self) -> Result<()> {
        if thread::current().id() == self.caller {
            Ok(())
        } else {
            Err(InitDagError::WrongContext)
        }
    }
}

impl<O> fmt::Debug for Scheduler<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("config", &self.config)
            .field("caller", &self.caller)
            .field("started", &self.run.is_some())
            .finish_non_exhaustive()
    }
}
