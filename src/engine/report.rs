// src/engine/report.rs

//! Timing data collected during a run.

use std::time::Duration;

use parking_lot::Mutex;

use crate::types::{ContextKind, TaskId};

/// Timing of one task within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTiming {
    pub task: TaskId,
    /// Context the task's completion was processed on.
    pub context: ContextKind,
    /// The result came from the cache; no work was done in this run.
    pub cached: bool,
    /// Time spent in `execute` (zero for cached tasks).
    pub elapsed: Duration,
    pub succeeded: bool,
}

/// Summary handed to the run-completed listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// From `start()` until the last caller-bound task finished.
    pub caller_elapsed: Duration,
    /// From `start()` until the last task finished.
    pub total_elapsed: Duration,
    /// Per-task timings, in completion order.
    pub tasks: Vec<TaskTiming>,
}

impl RunReport {
    pub fn timing(&self, task: &str) -> Option<&TaskTiming> {
        self.tasks.iter().find(|t| t.task.as_str() == task)
    }

    /// Tasks that completed with an error.
    pub fn failures(&self) -> impl Iterator<Item = &TaskId> {
        self.tasks.iter().filter(|t| !t.succeeded).map(|t| &t.task)
    }

    pub fn executed_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.cached).count()
    }
}

/// Thread-safe accumulator of [`TaskTiming`]s.
#[derive(Debug, Default)]
pub(crate) struct TimingRecorder {
    timings: Mutex<Vec<TaskTiming>>,
}

impl TimingRecorder {
    pub(crate) fn record(&self, timing: TaskTiming) {
        self.timings.lock().push(timing);
    }

    pub(crate) fn snapshot(&self) -> Vec<TaskTiming> {
        self.timings.lock().clone()
    }
}
