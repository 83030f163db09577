// src/sync/tracker.rs

//! Per-task bookkeeping of satisfied dependencies.

use std::collections::{BTreeMap, HashSet};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::cache::CachedResult;
use crate::sync::gate::CompletionGate;
use crate::types::TaskId;

/// Tracks how many of a task's declared parents have completed.
///
/// The dispatcher delivers exactly one notification per parent; the task's
/// unit of work calls [`wait`](Self::wait) before doing any real work.
#[derive(Debug)]
pub struct DependencyTracker<O> {
    expected: HashSet<TaskId>,
    results: Mutex<BTreeMap<TaskId, CachedResult<O>>>,
    gate: CompletionGate,
}

impl<O: Clone> DependencyTracker<O> {
    pub fn new(dependencies: &[TaskId]) -> Self {
        let expected: HashSet<TaskId> = dependencies.iter().cloned().collect();
        let gate = CompletionGate::new(expected.len());
        Self {
            expected,
            results: Mutex::new(BTreeMap::new()),
            gate,
        }
    }

    /// Record that `parent` completed with `result`.
    ///
    /// Notifications from undeclared parents, and repeated notifications from
    /// the same parent, are ignored.
    pub fn notify(&self, parent: &TaskId, result: &CachedResult<O>) {
        if !self.expected.contains(parent) {
            warn!(parent = %parent, "completion from undeclared dependency; ignoring");
            return;
        }

        {
            let mut results = self.results.lock();
            if results.contains_key(parent) {
                debug!(parent = %parent, "dependency already reported; ignoring");
                return;
            }
            results.insert(parent.clone(), result.clone());
        }

        debug!(
            parent = %parent,
            remaining = self.gate.remaining().saturating_sub(1),
            "dependency satisfied"
        );
        self.gate.count_down();
    }

    /// Block until every declared parent has reported.
    pub fn wait(&self) {
        self.gate.wait();
    }

    pub fn is_satisfied(&self) -> bool {
        self.gate.is_open()
    }

    /// Number of parents that have not reported yet.
    pub fn pending(&self) -> usize {
        self.gate.remaining()
    }

    /// Snapshot of the parent results received so far.
    pub fn results(&self) -> ParentResults<O> {
        ParentResults {
            results: self.results.lock().clone(),
        }
    }
}

/// Results of a task's parents, keyed by parent identity.
#[derive(Debug, Clone)]
pub struct ParentResults<O> {
    results: BTreeMap<TaskId, CachedResult<O>>,
}

impl<O> ParentResults<O> {
    pub fn empty() -> Self {
        Self {
            results: BTreeMap::new(),
        }
    }

    pub fn get(&self, parent: &str) -> Option<&CachedResult<O>> {
        self.results.get(parent)
    }

    /// Successful output of `parent`, if it completed without error.
    pub fn output(&self, parent: &str) -> Option<&O> {
        self.results.get(parent).and_then(|r| r.as_ref().ok())
    }

    /// The first parent (by identity) that completed with an error.
    pub fn first_failure(&self) -> Option<&TaskId> {
        self.results
            .iter()
            .find(|(_, r)| r.is_err())
            .map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &CachedResult<O>)> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
