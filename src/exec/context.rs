// src/exec/context.rs

//! Pluggable execution contexts.

use std::fmt::Debug;

/// A unit of work handed to an execution context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Somewhere jobs can run.
///
/// Jobs submitted to a worker context may block (a task waiting for its
/// parents does), so implementations must not run them on a thread that
/// other queued jobs depend on to make progress.
pub trait WorkerContext: Send + Sync + Debug {
    fn submit(&self, job: Job);
}

/// Runs every job immediately on the submitting thread.
///
/// Useful as a callback context, and in tests that want deterministic
/// execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineContext;

impl WorkerContext for InlineContext {
    fn submit(&self, job: Job) {
        job();
    }
}

/// Runs every job on a freshly spawned OS thread.
#[derive(Debug, Clone, Default)]
pub struct ThreadContext {
    name: Option<String>,
}

impl ThreadContext {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl WorkerContext for ThreadContext {
    fn submit(&self, job: Job) {
        let mut builder = std::thread::Builder::new();
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Err(err) = builder.spawn(job) {
            tracing::error!(error = %err, "failed to spawn worker thread");
        }
    }
}
