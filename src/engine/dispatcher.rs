// src/engine/dispatcher.rs

//! Walks the topological order and hands every task to its context.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::{CacheClaim, CachedResult};
use crate::engine::run_state::{Completion, RunState, panic_message};
use crate::errors::TaskError;
use crate::exec::{Job, WorkerContext};
use crate::types::ContextKind;

/// Submits every task of a run, in topological order.
///
/// Submission is ahead of readiness: a child may be queued before its
/// parents finish, and relies on its own dependency wait for ordering.
pub(crate) struct Dispatcher<'a, O> {
    run: &'a Arc<RunState<O>>,
    default_context: &'a Arc<dyn WorkerContext>,
}

impl<'a, O: Clone + Send + Sync + 'static> Dispatcher<'a, O> {
    pub fn new(run: &'a Arc<RunState<O>>, default_context: &'a Arc<dyn WorkerContext>) -> Self {
        Self {
            run,
            default_context,
        }
    }

    /// Dispatch every task once. Caller-bound tasks run inline, so this
    /// returns only after all of them have finished.
    pub fn dispatch_all(&self) {
        for &index in self.run.order.indices() {
            self.dispatch(index);
        }
    }

    fn dispatch(&self, index: usize) {
        let task = &self.run.tasks[index];
        let id = task.id();
        let context = if task.must_run_on_caller() {
            ContextKind::Caller
        } else {
            ContextKind::Worker
        };

        match self.run.cache.claim(id) {
            CacheClaim::Cached(result) => {
                debug!(task = %id, "result cached; skipping execution");
                self.run.complete(
                    index,
                    result,
                    Completion {
                        context: ContextKind::Caller,
                        cached: true,
                        elapsed: Duration::ZERO,
                    },
                );
            }
            CacheClaim::InFlight(slot) => {
                debug!(task = %id, "task running in another run; awaiting its result");
                let run = Arc::clone(self.run);
                self.submit(index, context, Box::new(move || {
                    let result = slot.wait();
                    run.complete(
                        index,
                        result,
                        Completion {
                            context,
                            cached: true,
                            elapsed: Duration::ZERO,
                        },
                    );
                }));
            }
            CacheClaim::Execute => {
                let run = Arc::clone(self.run);
                self.submit(index, context, Box::new(move || {
                    execute_and_complete(&run, index, context);
                }));
            }
        }
    }

    fn submit(&self, index: usize, context: ContextKind, job: Job) {
        let task = &self.run.tasks[index];
        match context {
            ContextKind::Caller => {
                trace!(task = %task.id(), "running on caller context");
                job();
            }
            ContextKind::Worker => {
                trace!(task = %task.id(), "submitting to worker context");
                match task.worker_context() {
                    Some(own) => own.submit(job),
                    None => self.default_context.submit(job),
                }
            }
        }
    }
}

/// The unit of work for a task that must actually run.
fn execute_and_complete<O: Clone + Send + Sync + 'static>(
    run: &RunState<O>,
    index: usize,
    context: ContextKind,
) {
    let task = &run.tasks[index];
    let mut elapsed = Duration::ZERO;

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        task.wait_for_dependencies();
        let started = Instant::now();
        debug!(task = %task.id(), ?context, "executing task");
        let result = task.execute();
        elapsed = started.elapsed();
        result
    }));

    let result: CachedResult<O> = outcome.unwrap_or_else(|payload| {
        Err(TaskError::Panicked {
            task: task.id().clone(),
            message: panic_message(payload.as_ref()),
        })
    });

    run.complete(
        index,
        result,
        Completion {
            context,
            cached: false,
            elapsed,
        },
    );
}
