/// Concurrent access integration tests
///
/// These tests verify that ferrous-ioc behaves correctly under concurrent access:
/// singleton construction runs at most once, registration stays consistent
/// and resolution from many threads sees the same registry.

use ferrous_ioc::{Constructor, Container, IocError, Resolver, ServiceType};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

// ===== Test Services =====

#[derive(Debug)]
pub struct CounterService {
    count: AtomicU32,
    thread_id: String,
}

impl CounterService {
    pub fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
            thread_id: format!("created-by-{:?}", thread::current().id()),
        }
    }

    pub fn increment(&self) -> u32 {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get_count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }
}

fn slow_singleton(constructions: Arc<AtomicU32>) -> ServiceType<CounterService> {
    ServiceType::<CounterService>::new()
        .singleton_contract::<CounterService>(|s| s)
        .constructor(Constructor::new(move |_| {
            constructions.fetch_add(1, Ordering::SeqCst);
            // Widen the window for racing first resolutions
            thread::sleep(Duration::from_millis(20));
            CounterService::new()
        }))
}

#[test]
fn test_singleton_built_once_under_contention() {
    const THREADS: usize = 16;

    let constructions = Arc::new(AtomicU32::new(0));
    let container = Container::new();
    container.register(slow_singleton(constructions.clone())).unwrap();

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let service = container.get_required::<CounterService>().unwrap();
                service.increment();
                service
            })
        })
        .collect();

    let services: Vec<Arc<CounterService>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(constructions.load(Ordering::SeqCst), 1);
    assert!(services.iter().all(|s| Arc::ptr_eq(s, &services[0])));
    assert_eq!(services[0].get_count(), THREADS as u32);
    assert!(services[0].thread_id.starts_with("created-by-"));
}

#[test]
fn test_child_containers_share_parent_singleton() {
    let constructions = Arc::new(AtomicU32::new(0));
    let root = Container::new();
    root.register(slow_singleton(constructions.clone())).unwrap();

    let results: Vec<Arc<CounterService>> = crossbeam_utils::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let root = &root;
                scope.spawn(move |_| {
                    let child = root.create_child(Some(&format!("worker-{}", i)));
                    child.get_required::<CounterService>().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(constructions.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|s| Arc::ptr_eq(s, &results[0])));
}

#[test]
fn test_concurrent_duplicate_registration_has_one_winner() {
    const THREADS: usize = 8;

    let container = Container::new();
    let barrier = Arc::new(Barrier::new(THREADS));

    let outcomes: Vec<Result<(), IocError>> = crossbeam_utils::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let container = &container;
                let barrier = barrier.clone();
                scope.spawn(move |_| {
                    barrier.wait();
                    container
                        .register_instance::<String>(Arc::new(format!("instance-{}", i)))
                        .map(|_| ())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    let winners = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(outcomes
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, IocError::DuplicateRegistration { .. })));
    assert!(container.get_required::<String>().unwrap().starts_with("instance-"));
}

#[test]
fn test_register_and_resolve_concurrently() {
    const WRITERS: usize = 4;
    const PER_WRITER: usize = 25;

    let container = Container::new();
    crossbeam_utils::thread::scope(|scope| {
        for w in 0..WRITERS {
            let container = &container;
            scope.spawn(move |_| {
                for i in 0..PER_WRITER {
                    let name = format!("svc-{}-{}", w, i);
                    container
                        .apply_instance::<u32>(Arc::new((w * PER_WRITER + i) as u32), Some(&name), None)
                        .unwrap();
                }
            });
        }
        for _ in 0..WRITERS {
            let container = &container;
            scope.spawn(move |_| {
                for i in 0..PER_WRITER {
                    // May or may not be registered yet; must never fail
                    let found = container.get_named::<u32>(&format!("svc-0-{}", i)).unwrap();
                    if let Some(value) = found {
                        assert_eq!(*value, i as u32);
                    }
                }
            });
        }
    })
    .unwrap();

    assert_eq!(container.len(), WRITERS * PER_WRITER);
    assert_eq!(*container.get_named::<u32>("SVC-3-24").unwrap().unwrap(), 99);
}
