// tests/result_cache.rs

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use initdag::cache::{CacheClaim, ResultCache};
use initdag::errors::TaskError;
use initdag::types::TaskId;

#[test]
fn first_write_wins() {
    let cache = ResultCache::<u32>::new();
    let id = TaskId::new("db");

    assert!(!cache.has("db"));
    assert_eq!(cache.get("db"), None);

    assert!(cache.put(&id, Ok(1)));
    assert!(!cache.put(&id, Ok(2)));
    assert!(!cache.put(&id, Err(TaskError::failed(&id, "late"))));

    assert!(cache.has("db"));
    assert_eq!(cache.get("db"), Some(Ok(1)));
    assert_eq!(cache.len(), 1);
}

#[test]
fn failures_are_remembered() {
    let cache = ResultCache::<u32>::new();
    let id = TaskId::new("flaky");
    let err = TaskError::failed(&id, "boom");

    cache.put(&id, Err(err.clone()));

    assert!(cache.has("flaky"));
    assert_eq!(cache.get("flaky"), Some(Err(err)));
    assert!(!cache.has("never-ran"));
}

#[test]
fn claim_hands_out_execution_once() {
    let cache = ResultCache::<&'static str>::new();
    let id = TaskId::new("net");

    assert!(matches!(cache.claim(&id), CacheClaim::Execute));

    // Claimed but unfinished: not a completed entry.
    assert!(!cache.has("net"));
    assert!(cache.is_empty());
    let slot = match cache.claim(&id) {
        CacheClaim::InFlight(slot) => slot,
        other => panic!("expected InFlight, got {other:?}"),
    };

    cache.put(&id, Ok("up"));
    assert_eq!(slot.wait(), Ok("up"));

    match cache.claim(&id) {
        CacheClaim::Cached(result) => assert_eq!(result, Ok("up")),
        other => panic!("expected Cached, got {other:?}"),
    }
}

#[test]
fn in_flight_waiter_sees_result_from_other_thread() {
    let cache = Arc::new(ResultCache::<u64>::new());
    let id = TaskId::new("slow");

    assert!(matches!(cache.claim(&id), CacheClaim::Execute));
    let CacheClaim::InFlight(slot) = cache.claim(&id) else {
        panic!("expected InFlight");
    };

    let producer = {
        let cache = Arc::clone(&cache);
        let id = id.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            cache.put(&id, Ok(42));
        })
    };

    assert_eq!(slot.wait(), Ok(42));
    producer.join().unwrap();
}

#[test]
fn concurrent_claims_yield_single_executor() {
    let cache = Arc::new(ResultCache::<()>::new());
    let id = TaskId::new("once");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let id = id.clone();
            thread::spawn(move || matches!(cache.claim(&id), CacheClaim::Execute))
        })
        .collect();

    let executors = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&won| won)
        .count();
    assert_eq!(executors, 1);
}
