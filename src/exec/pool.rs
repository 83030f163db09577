// src/exec/pool.rs

//! Default shared worker pool backed by a dedicated Tokio runtime.

use std::fmt;

use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::context::{Job, WorkerContext};

/// Worker pool that runs jobs on Tokio's blocking thread pool.
///
/// Jobs are allowed to block, so `spawn_blocking` is used rather than
/// `spawn`. The pool either owns its runtime or borrows a handle to an
/// existing one.
pub struct TokioWorkerPool {
    handle: Handle,
    runtime: Option<Runtime>,
    max_workers: usize,
}

impl TokioWorkerPool {
    /// Build a pool with its own runtime and at most `max_workers` threads
    /// running jobs concurrently.
    pub fn new(max_workers: usize) -> Result<Self> {
        let max_workers = max_workers.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(max_workers)
            .thread_name("initdag-worker")
            .enable_time()
            .build()?;

        info!(max_workers, "worker pool started");

        Ok(Self {
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
            max_workers,
        })
    }

    /// Submit jobs to an existing runtime instead of owning one.
    pub fn from_handle(handle: Handle) -> Self {
        Self {
            handle,
            runtime: None,
            max_workers: 0,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }
}

impl WorkerContext for TokioWorkerPool {
    fn submit(&self, job: Job) {
        // The JoinHandle is dropped on purpose: completion is reported by
        // the job itself.
        drop(self.handle.spawn_blocking(job));
    }
}

impl Drop for TokioWorkerPool {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            // Jobs still blocked (e.g. after an await timeout) must not hang
            // the dropping thread.
            debug!("worker pool shutting down in background");
            runtime.shutdown_background();
        }
    }
}

impl fmt::Debug for TokioWorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioWorkerPool")
            .field("owns_runtime", &self.runtime.is_some())
            .field("max_workers", &self.max_workers)
            .finish()
    }
}
