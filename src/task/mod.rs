// src/task/mod.rs

//! The task abstraction the scheduler drives.
//!
//! The scheduler never decides *when* a task may begin real work. It submits
//! every task ahead of time and delivers one
//! [`on_dependency_completed`](InitTask::on_dependency_completed) call per
//! declared parent; the task itself blocks in
//! [`wait_for_dependencies`](InitTask::wait_for_dependencies) until all of
//! them have arrived. [`DependencyTracker`](crate::sync::DependencyTracker)
//! implements that bookkeeping, and [`FnTask`] wires it up for closures.

pub mod fn_task;

use std::fmt::Debug;
use std::sync::Arc;

use crate::cache::CachedResult;
use crate::errors::TaskError;
use crate::exec::WorkerContext;
use crate::types::TaskId;

pub use fn_task::FnTask;

/// One unit of initialization work.
pub trait InitTask: Send + Sync + Debug {
    /// Value produced by a successful run; cached and handed to children.
    type Output: Clone + Send + Sync + 'static;

    fn id(&self) -> &TaskId;

    /// Identities of the tasks that must complete before this one does real
    /// work.
    fn dependencies(&self) -> &[TaskId];

    /// Run synchronously on the caller context instead of a worker.
    fn must_run_on_caller(&self) -> bool {
        false
    }

    /// Count this task towards the caller's `await_completion` gate.
    ///
    /// Ignored for caller-bound tasks, which block the caller anyway.
    fn caller_waits(&self) -> bool {
        false
    }

    /// Dedicated worker context for this task, if any.
    fn worker_context(&self) -> Option<Arc<dyn WorkerContext>> {
        None
    }

    /// Block until every declared dependency has reported completion.
    fn wait_for_dependencies(&self);

    /// Called once per declared parent, after that parent's result is cached.
    fn on_dependency_completed(&self, parent: &TaskId, result: &CachedResult<Self::Output>);

    /// Perform the task's work.
    fn execute(&self) -> Result<Self::Output, TaskError>;
}

/// Shared handle to a task with output type `O`.
pub type TaskRef<O> = Arc<dyn InitTask<Output = O>>;
