// src/engine/run_state.rs

//! Mutable state of a single run and the completion protocol.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::cache::{CachedResult, ResultCache};
use crate::config::builder::RunListener;
use crate::dag::{DependencyGraph, TopologicalOrder};
use crate::engine::report::{RunReport, TaskTiming, TimingRecorder};
use crate::engine::sink::ErrorSink;
use crate::exec::WorkerContext;
use crate::sync::CompletionGate;
use crate::task::TaskRef;
use crate::types::ContextKind;

/// How a task reached the completion protocol.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Completion {
    pub context: ContextKind,
    pub cached: bool,
    pub elapsed: Duration,
}

/// State owned by one `start()`/`await_completion()` cycle.
///
/// Shared (via `Arc`) with every unit of work submitted during the run.
pub(crate) struct RunState<O> {
    /// Indexed like the graph (declaration order).
    pub tasks: Vec<TaskRef<O>>,
    pub graph: DependencyGraph,
    pub order: TopologicalOrder,
    pub cache: Arc<ResultCache<O>>,
    pub gate: CompletionGate,
    pub required_await_count: usize,
    completed: AtomicUsize,
    finished: AtomicBool,
    timings: TimingRecorder,
    started_at: Instant,
    caller_finished_at: Mutex<Option<Instant>>,
    listener: Option<RunListener>,
    error_sink: Arc<dyn ErrorSink>,
    callback_context: Arc<dyn WorkerContext>,
}

impl<O: Clone + Send + Sync + 'static> RunState<O> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tasks: Vec<TaskRef<O>>,
        graph: DependencyGraph,
        order: TopologicalOrder,
        cache: Arc<ResultCache<O>>,
        required_await_count: usize,
        listener: Option<RunListener>,
        error_sink: Arc<dyn ErrorSink>,
        callback_context: Arc<dyn WorkerContext>,
    ) -> Self {
        Self {
            tasks,
            graph,
            order,
            cache,
            gate: CompletionGate::new(required_await_count),
            required_await_count,
            completed: AtomicUsize::new(0),
            finished: AtomicBool::new(false),
            timings: TimingRecorder::default(),
            started_at: Instant::now(),
            caller_finished_at: Mutex::new(None),
            listener,
            error_sink,
            callback_context,
        }
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Run the completion protocol for the task at `index`.
    ///
    /// Invoked exactly once per task per run, whether the result was freshly
    /// produced, taken from the cache, or awaited from another run.
    pub fn complete(&self, index: usize, result: CachedResult<O>, how: Completion) {
        let task = &self.tasks[index];
        let id = task.id();

        // The cache write must precede any child notification.
        let (written, result) = self.cache.settle(id, result);

        if let Err(err) = &result {
            if written {
                guard_user_code(id.as_str(), "error sink", || self.error_sink.report(err));
            }
        }

        if task.caller_waits() && !task.must_run_on_caller() {
            self.gate.count_down();
        }

        for &child in self.graph.children_at(index) {
            let child = &self.tasks[child];
            guard_user_code(child.id().as_str(), "dependency notification", || {
                child.on_dependency_completed(id, &result)
            });
        }

        if how.context == ContextKind::Caller {
            *self.caller_finished_at.lock() = Some(Instant::now());
        }

        self.timings.record(TaskTiming {
            task: id.clone(),
            context: how.context,
            cached: how.cached,
            elapsed: how.elapsed,
            succeeded: result.is_ok(),
        });

        let done = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(
            task = %id,
            cached = how.cached,
            ok = result.is_ok(),
            completed = done,
            total = self.total(),
            "task completed"
        );

        if done == self.total() {
            self.finish();
        }
    }

    /// Fire the run-completed listener, at most once.
    fn finish(&self) {
        if self.finished.swap(true, Ordering::AcqRel) {
            return;
        }

        let report = self.report();
        info!(
            tasks = report.tasks.len(),
            executed = report.executed_count(),
            failed = report.failures().count(),
            total_ms = report.total_elapsed.as_millis() as u64,
            caller_ms = report.caller_elapsed.as_millis() as u64,
            "all tasks completed"
        );

        if let Some(listener) = self.listener.clone() {
            let context = Arc::clone(&self.callback_context);
            guard_user_code("<run>", "callback context", move || {
                context.submit(Box::new(move || {
                    guard_user_code("<run>", "run-completed listener", || listener(&report));
                }));
            });
        }
    }

    fn report(&self) -> RunReport {
        let caller_elapsed = self
            .caller_finished_at
            .lock()
            .map(|at| at.saturating_duration_since(self.started_at))
            .unwrap_or_default();

        RunReport {
            caller_elapsed,
            total_elapsed: self.started_at.elapsed(),
            tasks: self.timings.snapshot(),
        }
    }
}

/// Run a hook supplied by the embedding application.
///
/// A panic is logged and swallowed so the completion protocol still reaches
/// the gate, the remaining children and the completion counter.
fn guard_user_code<F: FnOnce()>(task: &str, hook: &str, f: F) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
        error!(
            task,
            hook,
            panic = %panic_message(payload.as_ref()),
            "hook panicked during task completion"
        );
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
