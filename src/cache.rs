// src/cache.rs

//! Process-lifetime memoization of task results.
//!
//! A [`ResultCache`] outlives individual runs: share it between schedulers
//! (via `Arc`) and every task identity is executed at most once for the
//! lifetime of the cache. Failures are cached too, so a later lookup can tell
//! "completed with error" apart from "never attempted".

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex, RwLock};
use tracing::{debug, trace};

use crate::errors::TaskError;
use crate::types::TaskId;

/// What the cache remembers for a completed task.
pub type CachedResult<O> = std::result::Result<O, TaskError>;

/// A write-once cell for one task identity.
#[derive(Debug)]
pub struct CacheSlot<O> {
    value: Mutex<Option<CachedResult<O>>>,
    filled: Condvar,
}

impl<O: Clone> CacheSlot<O> {
    fn empty() -> Self {
        Self {
            value: Mutex::new(None),
            filled: Condvar::new(),
        }
    }

    /// Store `result` unless a value is already present.
    ///
    /// Returns the value that ends up in the slot.
    fn fill(&self, result: CachedResult<O>) -> (bool, CachedResult<O>) {
        let mut value = self.value.lock();
        match value.as_ref() {
            Some(existing) => (false, existing.clone()),
            None => {
                *value = Some(result.clone());
                self.filled.notify_all();
                (true, result)
            }
        }
    }

    fn peek(&self) -> Option<CachedResult<O>> {
        self.value.lock().clone()
    }

    fn is_filled(&self) -> bool {
        self.value.lock().is_some()
    }

    /// Block until the owning run stores a result.
    pub fn wait(&self) -> CachedResult<O> {
        let mut value = self.value.lock();
        loop {
            if let Some(result) = value.as_ref() {
                return result.clone();
            }
            self.filled.wait(&mut value);
        }
    }
}

/// Outcome of [`ResultCache::claim`].
#[derive(Debug)]
pub enum CacheClaim<O> {
    /// Nobody has run this task yet; the claimant now owns its execution.
    Execute,
    /// The task already completed.
    Cached(CachedResult<O>),
    /// Another run owns the task and has not finished it yet.
    InFlight(Arc<CacheSlot<O>>),
}

/// Thread-safe, write-once map from task identity to result.
#[derive(Debug)]
pub struct ResultCache<O> {
    slots: RwLock<HashMap<TaskId, Arc<CacheSlot<O>>>>,
}

impl<O: Clone> ResultCache<O> {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Whether `task` has completed (successfully or not).
    pub fn has(&self, task: &str) -> bool {
        self.slots
            .read()
            .get(task)
            .is_some_and(|slot| slot.is_filled())
    }

    /// The completed result of `task`, if any.
    pub fn get(&self, task: &str) -> Option<CachedResult<O>> {
        let slot = self.slots.read().get(task).cloned()?;
        slot.peek()
    }

    /// Record the result of `task`.
    ///
    /// Returns `false` (and keeps the existing value) if a result was already
    /// stored.
    pub fn put(&self, task: &TaskId, result: CachedResult<O>) -> bool {
        self.settle(task, result).0
    }

    /// Number of completed entries.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| slot.is_filled())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomically decide who executes `task`.
    ///
    /// The first claimant gets [`CacheClaim::Execute`] and must eventually
    /// [`put`](Self::put) a result; everyone after that either sees the
    /// result or a slot to wait on.
    pub fn claim(&self, task: &TaskId) -> CacheClaim<O> {
        if let Some(slot) = self.slots.read().get(task) {
            return Self::claim_existing(task, slot);
        }

        let mut slots = self.slots.write();
        if let Some(slot) = slots.get(task) {
            return Self::claim_existing(task, slot);
        }
        slots.insert(task.clone(), Arc::new(CacheSlot::empty()));
        trace!(task = %task, "cache: claimed for execution");
        CacheClaim::Execute
    }

    /// Store `result` and return the value that won (first writer wins).
    pub(crate) fn settle(&self, task: &TaskId, result: CachedResult<O>) -> (bool, CachedResult<O>) {
        let slot = {
            let mut slots = self.slots.write();
            Arc::clone(
                slots
                    .entry(task.clone())
                    .or_insert_with(|| Arc::new(CacheSlot::empty())),
            )
        };

        let (written, value) = slot.fill(result);
        if !written {
            debug!(task = %task, "cache: result already present; keeping first value");
        }
        (written, value)
    }

    fn claim_existing(task: &TaskId, slot: &Arc<CacheSlot<O>>) -> CacheClaim<O> {
        match slot.peek() {
            Some(result) => {
                trace!(task = %task, "cache: hit");
                CacheClaim::Cached(result)
            }
            None => {
                trace!(task = %task, "cache: in flight elsewhere");
                CacheClaim::InFlight(Arc::clone(slot))
            }
        }
    }
}

impl<O: Clone> Default for ResultCache<O> {
    fn default() -> Self {
        Self::new()
    }
}
