#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use common::{small_config, CountingBackend};
use webmetrics_core::{MetricRegistry, PathKey};

fn registry() -> (Arc<CountingBackend>, MetricRegistry) {
    let backend = Arc::new(CountingBackend::default());
    let registry = MetricRegistry::new(backend.clone(), small_config());
    (backend, registry)
}

#[test]
fn total_exists_from_construction() {
    let (backend, registry) = registry();
    assert_eq!(registry.paths(), vec![PathKey::total()]);
    assert_eq!(backend.meter_calls_for_scope("total"), 3);
    assert_eq!(backend.timer_calls.len(), 1);
}

#[test]
fn one_meter_per_bucket_plus_catch_all() {
    let (backend, registry) = registry();
    let meters = registry.resolve_status_bucket_map(&PathKey::from_path("/items"));
    assert_eq!(meters.meter_count(), 3);
    assert_eq!(backend.meter_calls_for_scope("items"), 3);
}

#[test]
fn deep_paths_share_one_entry() {
    let (_backend, registry) = registry();
    let a = registry.resolve_status_bucket_map(&PathKey::from_path("/orders/123"));
    let b = registry.resolve_status_bucket_map(&PathKey::from_path("/orders/456"));
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn racing_first_access_creates_once() {
    let (backend, registry) = registry();
    let registry = Arc::new(registry);
    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.resolve_status_bucket_map(&PathKey::from_path("/fresh/x"))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for r in &results[1..] {
        assert!(Arc::ptr_eq(&results[0], r));
    }
    assert_eq!(backend.meter_calls_for_scope("fresh"), 3);
}

#[test]
fn racing_timer_creation_creates_once() {
    let (backend, registry) = registry();
    let registry = Arc::new(registry);
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.resolve_timer(&PathKey::from_path("/slow"));
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let calls: usize = backend
        .timer_calls
        .iter()
        .filter(|r| r.key().scope.as_deref() == Some("slow"))
        .map(|r| *r.value())
        .sum();
    assert_eq!(calls, 1);
}

#[test]
fn configured_status_hits_path_and_total_bucket() {
    let (backend, registry) = registry();
    registry.record_outcome(&PathKey::from_path("/items/1"), 200);

    assert_eq!(backend.meter("items", "ok"), 1);
    assert_eq!(backend.meter("total", "ok"), 1);
    assert_eq!(backend.meter("items", "other"), 0);
    assert_eq!(backend.meter("total", "other"), 0);
    assert_eq!(backend.meter("items", "notFound"), 0);
}

#[test]
fn unknown_status_hits_catch_all_only() {
    let (backend, registry) = registry();
    registry.record_outcome(&PathKey::from_path("/items/2"), 503);

    assert_eq!(backend.meter("items", "other"), 1);
    assert_eq!(backend.meter("total", "other"), 1);
    assert_eq!(backend.meter("items", "ok"), 0);
    assert_eq!(backend.meter("items", "notFound"), 0);
}

#[test]
fn no_range_semantics() {
    let (backend, registry) = registry();
    registry.record_outcome(&PathKey::from_path("/items"), 201);
    assert_eq!(backend.meter("items", "ok"), 0);
    assert_eq!(backend.meter("items", "other"), 1);
}

#[test]
fn total_path_is_not_double_counted() {
    let (backend, registry) = registry();
    registry.record_outcome(&PathKey::total(), 404);
    assert_eq!(backend.meter("total", "notFound"), 1);
}

#[test]
fn unseen_path_is_created_on_record() {
    let (backend, registry) = registry();
    registry.record_outcome(&PathKey::from_path("/never-timed"), 200);
    assert_eq!(backend.meter("never-timed", "ok"), 1);
    assert!(registry.paths().contains(&PathKey::from_path("/never-timed")));
}

#[test]
fn timer_is_cached() {
    let (_backend, registry) = registry();
    let a = registry.resolve_timer(&PathKey::from_path("/a"));
    let b = registry.resolve_timer(&PathKey::from_path("/a/b"));
    assert!(Arc::ptr_eq(&a, &b));
}
