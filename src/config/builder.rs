// src/config/builder.rs

//! In-code configuration surface.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::ResultCache;
use crate::engine::report::RunReport;
use crate::engine::scheduler::Scheduler;
use crate::engine::sink::{ErrorSink, TracingErrorSink};
use crate::errors::Result;
use crate::exec::{InlineContext, TokioWorkerPool, WorkerContext};
use crate::task::{InitTask, TaskRef};
use crate::config::model::SchedulerOptions;

/// Listener invoked once per run after every task has completed.
pub type RunListener = Arc<dyn Fn(&RunReport) + Send + Sync>;

/// Immutable configuration of one scheduler instance.
pub struct RunConfig<O> {
    pub(crate) tasks: Vec<TaskRef<O>>,
    pub(crate) options: SchedulerOptions,
    pub(crate) listener: Option<RunListener>,
    pub(crate) error_sink: Arc<dyn ErrorSink>,
    pub(crate) callback_context: Arc<dyn WorkerContext>,
    pub(crate) cache: Arc<ResultCache<O>>,
}

impl<O: Clone + Send + Sync + 'static> RunConfig<O> {
    pub fn tasks(&self) -> &[TaskRef<O>] {
        &self.tasks
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    /// Number of tasks the caller waits for: `caller_waits` tasks that are
    /// not bound to the caller context.
    pub fn required_await_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.caller_waits() && !t.must_run_on_caller())
            .count()
    }
}

impl<O> fmt::Debug for RunConfig<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("tasks", &self.tasks)
            .field("options", &self.options)
            .field("has_listener", &self.listener.is_some())
            .field("error_sink", &self.error_sink)
            .field("callback_context", &self.callback_context)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Scheduler`].
///
/// `build()` must be called on the caller context: the building thread is
/// the only one later allowed to call `start()` and `await_completion()`.
pub struct SchedulerBuilder<O> {
    tasks: Vec<TaskRef<O>>,
    options: SchedulerOptions,
    listener: Option<RunListener>,
    error_sink: Option<Arc<dyn ErrorSink>>,
    worker_context: Option<Arc<dyn WorkerContext>>,
    callback_context: Option<Arc<dyn WorkerContext>>,
    cache: Option<Arc<ResultCache<O>>>,
}

impl<O: Clone + Send + Sync + 'static> SchedulerBuilder<O> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            options: SchedulerOptions::default(),
            listener: None,
            error_sink: None,
            worker_context: None,
            callback_context: None,
            cache: None,
        }
    }

    /// Register a task. Registration order is the declaration order.
    pub fn task<T>(mut self, task: T) -> Self
    where
        T: InitTask<Output = O> + 'static,
    {
        self.tasks.push(Arc::new(task));
        self
    }

    /// Register an already shared task.
    pub fn task_ref(mut self, task: TaskRef<O>) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn tasks(mut self, tasks: impl IntoIterator<Item = TaskRef<O>>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    pub fn options(mut self, options: SchedulerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn await_timeout(mut self, timeout: Duration) -> Self {
        self.options.await_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn max_workers(mut self, max_workers: usize) -> Self {
        self.options.max_workers = max_workers;
        self
    }

    /// Listener called once all tasks of a run have completed.
    pub fn on_run_completed<F>(mut self, listener: F) -> Self
    where
        F: Fn(&RunReport) + Send + Sync + 'static,
    {
        self.listener = Some(Arc::new(listener));
        self
    }

    pub fn error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = Some(sink);
        self
    }

    /// Default context for tasks that do not bring their own.
    ///
    /// When unset, a [`TokioWorkerPool`] with `max_workers` threads is
    /// created.
    pub fn worker_context(mut self, context: Arc<dyn WorkerContext>) -> Self {
        self.worker_context = Some(context);
        self
    }

    /// Context the run-completed listener runs on.
    ///
    /// Defaults to [`InlineContext`]: the listener runs on whichever context
    /// completed the last task.
    pub fn callback_context(mut self, context: Arc<dyn WorkerContext>) -> Self {
        self.callback_context = Some(context);
        self
    }

    /// Share a result cache with other schedulers.
    pub fn cache(mut self, cache: Arc<ResultCache<O>>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<Scheduler<O>> {
        let worker_context: Arc<dyn WorkerContext> = match self.worker_context {
            Some(ctx) => ctx,
            None => Arc::new(TokioWorkerPool::new(self.options.max_workers)?),
        };

        let config = RunConfig {
            tasks: self.tasks,
            options: self.options,
            listener: self.listener,
            error_sink: self
                .error_sink
                .unwrap_or_else(|| Arc::new(TracingErrorSink)),
            callback_context: self
                .callback_context
                .unwrap_or_else(|| Arc::new(InlineContext)),
            cache: self.cache.unwrap_or_default(),
        };

        Ok(Scheduler::new(config, worker_context))
    }
}

impl<O: Clone + Send + Sync + 'static> Default for SchedulerBuilder<O> {
    fn default() -> Self {
        Self::new()
    }
}
