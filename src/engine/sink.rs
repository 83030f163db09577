// src/engine/sink.rs

//! Where task failures are reported.

use std::fmt::Debug;

use tracing::error;

use crate::errors::TaskError;

/// Receives every task failure of a run, once per failed execution.
pub trait ErrorSink: Send + Sync + Debug {
    fn report(&self, error: &TaskError);
}

/// Default sink: logs failures at `error` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, err: &TaskError) {
        error!(task = %err.task(), error = %err, "task execution error");
    }
}
