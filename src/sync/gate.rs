// src/sync/gate.rs

//! Countdown gate with a bounded wait.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{trace, warn};

use crate::types::GateOutcome;

/// A countdown latch.
///
/// The target count is fixed at construction. Every qualifying completion
/// calls [`count_down`](Self::count_down); waiters are released once the
/// count reaches zero.
#[derive(Debug)]
pub struct CompletionGate {
    remaining: Mutex<usize>,
    released: Condvar,
}

impl CompletionGate {
    /// Create a gate that opens after `count` calls to `count_down`.
    ///
    /// A zero count yields a gate that is already open.
    pub fn new(count: usize) -> Self {
        Self {
            remaining: Mutex::new(count),
            released: Condvar::new(),
        }
    }

    /// Decrement the remaining count by one.
    ///
    /// Decrementing an open gate is a logic error upstream; it is logged and
    /// otherwise ignored.
    pub fn count_down(&self) {
        let mut remaining = self.remaining.lock();
        match *remaining {
            0 => {
                warn!("completion gate decremented past zero; ignoring");
            }
            1 => {
                *remaining = 0;
                trace!("completion gate opened");
                self.released.notify_all();
            }
            n => {
                *remaining = n - 1;
            }
        }
    }

    /// Number of completions still required to open the gate.
    pub fn remaining(&self) -> usize {
        *self.remaining.lock()
    }

    pub fn is_open(&self) -> bool {
        self.remaining() == 0
    }

    /// Block until the gate opens or `timeout` elapses.
    pub fn wait_timeout(&self, timeout: Duration) -> GateOutcome {
        let deadline = Instant::now() + timeout;
        let mut remaining = self.remaining.lock();

        while *remaining > 0 {
            if self
                .released
                .wait_until(&mut remaining, deadline)
                .timed_out()
            {
                return if *remaining == 0 {
                    GateOutcome::Signaled
                } else {
                    GateOutcome::TimedOut
                };
            }
        }

        GateOutcome::Signaled
    }

    /// Block until the gate opens, however long that takes.
    pub fn wait(&self) {
        let mut remaining = self.remaining.lock();
        while *remaining > 0 {
            self.released.wait(&mut remaining);
        }
    }
}
