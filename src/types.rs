use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Opaque, stable identity of a task.
///
/// Cheap to clone; the graph, the cache and the timing report are all keyed
/// on it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(Arc<str>);

impl TaskId {
    pub fn new(name: impl AsRef<str>) -> Self {
        TaskId(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::new(s)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(Arc::from(s))
    }
}

impl Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Where a task's unit of work ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// Synchronously on the caller context, inside `start()`.
    Caller,
    /// On a worker context.
    Worker,
}

/// Result of a bounded wait on a [`CompletionGate`](crate::sync::CompletionGate).
///
/// A timeout is not an error: the caller proceeds regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Signaled,
    TimedOut,
}

impl GateOutcome {
    pub fn is_signaled(self) -> bool {
        matches!(self, GateOutcome::Signaled)
    }
}
