// tests/sync_primitives.rs

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use initdag::errors::TaskError;
use initdag::sync::{CompletionGate, DependencyTracker};
use initdag::types::{GateOutcome, TaskId};

#[test]
fn zero_count_gate_is_open() {
    let gate = CompletionGate::new(0);
    assert!(gate.is_open());

    let started = Instant::now();
    assert_eq!(gate.wait_timeout(Duration::from_secs(10)), GateOutcome::Signaled);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn gate_opens_after_count_downs() {
    let gate = CompletionGate::new(2);
    gate.count_down();
    assert_eq!(gate.remaining(), 1);
    assert_eq!(gate.wait_timeout(Duration::from_millis(10)), GateOutcome::TimedOut);

    gate.count_down();
    assert!(gate.is_open());
    assert_eq!(gate.wait_timeout(Duration::from_millis(10)), GateOutcome::Signaled);
}

#[test]
fn over_decrement_is_clamped() {
    let gate = CompletionGate::new(1);
    gate.count_down();
    gate.count_down();
    gate.count_down();
    assert_eq!(gate.remaining(), 0);
}

#[test]
fn gate_releases_waiter_on_another_thread() {
    let gate = Arc::new(CompletionGate::new(3));

    let worker = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || {
            for _ in 0..3 {
                thread::sleep(Duration::from_millis(10));
                gate.count_down();
            }
        })
    };

    assert_eq!(gate.wait_timeout(Duration::from_secs(5)), GateOutcome::Signaled);
    worker.join().unwrap();
}

#[test]
fn tracker_waits_for_every_declared_parent() {
    let a = TaskId::new("a");
    let b = TaskId::new("b");
    let tracker = Arc::new(DependencyTracker::<u32>::new(&[a.clone(), b.clone(), a.clone()]));
    assert_eq!(tracker.pending(), 2);

    tracker.notify(&a, &Ok(1));
    // Repeats and strangers do not count.
    tracker.notify(&a, &Ok(99));
    tracker.notify(&TaskId::new("stranger"), &Ok(0));
    assert_eq!(tracker.pending(), 1);
    assert!(!tracker.is_satisfied());

    let waiter = {
        let tracker = Arc::clone(&tracker);
        thread::spawn(move || tracker.wait())
    };
    tracker.notify(&b, &Err(TaskError::failed(&b, "nope")));
    waiter.join().unwrap();

    let results = tracker.results();
    assert_eq!(results.len(), 2);
    assert_eq!(results.output("a"), Some(&1));
    assert_eq!(results.output("b"), None);
    assert_eq!(results.first_failure(), Some(&b));
}

#[test]
fn tracker_without_parents_is_satisfied() {
    let tracker = DependencyTracker::<()>::new(&[]);
    assert!(tracker.is_satisfied());
    tracker.wait();
    assert!(tracker.results().is_empty());
}
