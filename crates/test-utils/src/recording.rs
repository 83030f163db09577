#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use initdag::errors::TaskError;
use initdag::exec::{Job, ThreadContext, WorkerContext};
use initdag::engine::ErrorSink;

/// Shared record of which tasks actually executed, and in what order.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    entries: Arc<Mutex<Vec<String>>>,
    counts: Arc<Mutex<HashMap<String, usize>>>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &str) {
        self.entries.lock().push(name.to_string());
        *self.counts.lock().entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// How many times `name` executed.
    pub fn count(&self, name: &str) -> usize {
        self.counts.lock().get(name).copied().unwrap_or(0)
    }

    /// Position of the first execution of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.lock().iter().position(|e| e == name)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Error sink that keeps every reported failure.
#[derive(Debug, Default)]
pub struct CollectingErrorSink {
    errors: Mutex<Vec<TaskError>>,
}

impl CollectingErrorSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn errors(&self) -> Vec<TaskError> {
        self.errors.lock().clone()
    }
}

impl ErrorSink for CollectingErrorSink {
    fn report(&self, error: &TaskError) {
        self.errors.lock().push(error.clone());
    }
}

/// Worker context that counts submissions and runs each job on its own
/// thread.
#[derive(Debug, Default)]
pub struct CountingContext {
    submitted: AtomicUsize,
    inner: ThreadContext,
}

impl CountingContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }
}

impl WorkerContext for CountingContext {
    fn submit(&self, job: Job) {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        self.inner.submit(job);
    }
}

/// Collects run reports delivered to a run-completed listener.
#[derive(Debug, Clone, Default)]
pub struct ReportCollector {
    reports: Arc<Mutex<Vec<initdag::RunReport>>>,
    arrived: Arc<parking_lot::Condvar>,
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener to pass to `SchedulerBuilder::on_run_completed`.
    pub fn listener(&self) -> impl Fn(&initdag::RunReport) + Send + Sync + 'static {
        let reports = Arc::clone(&self.reports);
        let arrived = Arc::clone(&self.arrived);
        move |report| {
            reports.lock().push(report.clone());
            arrived.notify_all();
        }
    }

    pub fn count(&self) -> usize {
        self.reports.lock().len()
    }

    /// Wait until at least `n` reports arrived, or `timeout` elapses.
    pub fn wait_for(&self, n: usize, timeout: std::time::Duration) -> Vec<initdag::RunReport> {
        let deadline = std::time::Instant::now() + timeout;
        let mut reports = self.reports.lock();
        while reports.len() < n {
            if self.arrived.wait_until(&mut reports, deadline).timed_out() {
                break;
            }
        }
        reports.clone()
    }
}
