// src/task/fn_task.rs

//! Closure-backed [`InitTask`].

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::cache::CachedResult;
use crate::errors::TaskError;
use crate::exec::WorkerContext;
use crate::sync::{DependencyTracker, ParentResults};
use crate::task::InitTask;
use crate::types::TaskId;

type TaskFn<O> = dyn Fn(&ParentResults<O>) -> Result<O, TaskError> + Send + Sync;

/// A task whose work is a closure receiving its parents' results.
///
/// If any parent failed, the closure is skipped and the task fails with
/// [`TaskError::DependencyFailed`].
pub struct FnTask<O> {
    id: TaskId,
    deps: Vec<TaskId>,
    on_caller: bool,
    caller_waits: bool,
    context: Option<Arc<dyn WorkerContext>>,
    tracker: DependencyTracker<O>,
    work: Box<TaskFn<O>>,
}

impl<O: Clone + Send + Sync + 'static> FnTask<O> {
    pub fn new<F>(id: impl Into<TaskId>, work: F) -> Self
    where
        F: Fn(&ParentResults<O>) -> Result<O, TaskError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            deps: Vec::new(),
            on_caller: false,
            caller_waits: false,
            context: None,
            tracker: DependencyTracker::new(&[]),
            work: Box::new(work),
        }
    }

    /// Declare a dependency on `parent`.
    pub fn after(mut self, parent: impl Into<TaskId>) -> Self {
        let parent = parent.into();
        if !self.deps.contains(&parent) {
            self.deps.push(parent);
        }
        self.tracker = DependencyTracker::new(&self.deps);
        self
    }

    pub fn on_caller(mut self, val: bool) -> Self {
        self.on_caller = val;
        self
    }

    pub fn caller_waits(mut self, val: bool) -> Self {
        self.caller_waits = val;
        self
    }

    /// Run this task on `context` instead of the scheduler's default pool.
    pub fn with_context(mut self, context: Arc<dyn WorkerContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Finish building and wrap in an `Arc` for registration.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl<O: Clone + Send + Sync + 'static> InitTask for FnTask<O> {
    type Output = O;

    fn id(&self) -> &TaskId {
        &self.id
    }

    fn dependencies(&self) -> &[TaskId] {
        &self.deps
    }

    fn must_run_on_caller(&self) -> bool {
        self.on_caller
    }

    fn caller_waits(&self) -> bool {
        self.caller_waits
    }

    fn worker_context(&self) -> Option<Arc<dyn WorkerContext>> {
        self.context.clone()
    }

    fn wait_for_dependencies(&self) {
        if !self.tracker.is_satisfied() {
            debug!(
                task = %self.id,
                pending = self.tracker.pending(),
                "waiting for dependencies"
            );
        }
        self.tracker.wait();
    }

    fn on_dependency_completed(&self, parent: &TaskId, result: &CachedResult<O>) {
        self.tracker.notify(parent, result);
    }

    fn execute(&self) -> Result<O, TaskError> {
        let parents = self.tracker.results();
        if let Some(failed) = parents.first_failure() {
            return Err(TaskError::DependencyFailed {
                task: self.id.clone(),
                dependency: failed.clone(),
            });
        }
        (self.work)(&parents)
    }
}

impl<O> fmt::Debug for FnTask<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTask")
            .field("id", &self.id)
            .field("deps", &self.deps)
            .field("on_caller", &self.on_caller)
            .field("caller_waits", &self.caller_waits)
            .finish_non_exhaustive()
    }
}
