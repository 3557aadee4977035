#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

use tally_core::{Counter, Histogram, Metric, MetricKey, SampleMode};
use tally_registry::Registry;

fn key(owner: &str, name: &str) -> MetricKey {
    MetricKey::new(owner, name).unwrap()
}

#[test]
fn concurrent_first_access_yields_one_counter() {
    const THREADS: usize = 32;
    let reg = Registry::new();
    let barrier = Barrier::new(THREADS);

    let handles: Vec<Arc<Counter>> = std::thread::scope(|s| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    reg.get_or_create_counter(key("Server", "requests")).unwrap()
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    let first = &handles[0];
    assert!(handles.iter().all(|h| Arc::ptr_eq(first, h)));

    let snap = reg.snapshot();
    assert_eq!(snap.len(), 1);
    let stored = snap.get(&key("Server", "requests")).unwrap();
    assert!(stored.same_instance(&Metric::Counter(Arc::clone(first))));
}

#[test]
fn losing_candidates_are_never_published() {
    const THREADS: usize = 16;
    let reg = Registry::new();
    let barrier = Barrier::new(THREADS);
    let built = AtomicUsize::new(0);

    let winners: Vec<Metric> = std::thread::scope(|s| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    reg.get_or_create_with(key("Db", "rows"), || {
                        built.fetch_add(1, Ordering::Relaxed);
                        Metric::Histogram(Arc::new(Histogram::new(SampleMode::Uniform)))
                    })
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    // Any number of candidates may be built, but only one is ever returned.
    assert!(built.load(Ordering::Relaxed) >= 1);
    assert!(winners.iter().all(|m| m.same_instance(&winners[0])));
    assert_eq!(reg.len(), 1);
}

#[test]
fn candidate_built_while_another_caller_publishes_is_discarded() {
    let reg = Registry::new();
    let k = key("Server", "requests");

    let mut winner: Option<Arc<Counter>> = None;
    let mut loser: Option<Arc<Counter>> = None;

    // The factory registers the same key itself, so the insert that follows
    // finds the slot taken. A factory run under the shard lock would deadlock.
    let got = reg.get_or_create_with(k.clone(), || {
        winner = Some(reg.get_or_create_counter(k.clone()).unwrap());
        let candidate = Arc::new(Counter::new());
        loser = Some(Arc::clone(&candidate));
        Metric::Counter(candidate)
    });

    let winner = winner.unwrap();
    let loser = loser.unwrap();
    assert!(got.same_instance(&Metric::Counter(Arc::clone(&winner))));
    assert!(!got.same_instance(&Metric::Counter(Arc::clone(&loser))));
    assert_eq!(Arc::strong_count(&loser), 1);
    assert_eq!(reg.len(), 1);
    assert!(reg
        .get(&k)
        .unwrap()
        .same_instance(&Metric::Counter(winner)));
}

#[test]
fn interleaved_increments_are_all_counted() {
    let reg = Registry::new();
    let barrier = Barrier::new(3);

    std::thread::scope(|s| {
        for _ in 0..3 {
            s.spawn(|| {
                barrier.wait();
                for _ in 0..5 {
                    reg.get_or_create_counter(key("Server", "requests")).unwrap().inc();
                }
            });
        }
    });

    let counter = reg.get_or_create_counter(key("Server", "requests")).unwrap();
    assert_eq!(counter.count(), 15);

    let snap = reg.snapshot();
    let names: Vec<String> = snap.keys().map(ToString::to_string).collect();
    assert_eq!(names, ["Server.requests"]);
}

#[test]
fn distinct_keys_register_independently() {
    const THREADS: usize = 8;
    let reg = Registry::new();

    std::thread::scope(|s| {
        for t in 0..THREADS {
            let reg = &reg;
            s.spawn(move || {
                for i in 0..50 {
                    let owner = format!("worker{}", (t + i) % THREADS);
                    reg.get_or_create_counter(key(&owner, &format!("m{i}"))).unwrap().inc();
                }
            });
        }
    });

    let snap = reg.snapshot();
    let total: i64 = snap
        .iter()
        .map(|(_, m)| match m {
            Metric::Counter(c) => c.count(),
            other => panic!("unexpected {other:?}"),
        })
        .sum();
    assert_eq!(total, (THREADS * 50) as i64);
}

#[test]
fn histogram_request_on_counter_key_returns_counter() {
    let reg = Registry::new();
    let k = key("Server", "requests");
    let counter = reg.get_or_create_counter(k.clone()).unwrap();

    let err = reg.get_or_create_histogram(k.clone(), SampleMode::Biased).unwrap_err();
    assert_eq!(err.code().as_str(), "KIND_MISMATCH");

    let got = reg.get_or_create_with(k.clone(), || {
        Metric::Histogram(Arc::new(Histogram::new(SampleMode::Biased)))
    });
    assert!(got.same_instance(&Metric::Counter(Arc::clone(&counter))));
    assert_eq!(reg.snapshot().get(&k).unwrap().kind(), tally_core::MetricKind::Counter);
}
