#![allow(missing_docs)]
#![cfg(not(feature = "loom"))]

use crossbeam_channel::RecvTimeoutError;
use proptest::prelude::*;
use std::{
    io::Cursor,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};
use taskmill::{
    pool::Pool,
    source::{IterSource, LineSource},
    ConfigError, WorkerCount,
};

fn workers(count: usize) -> WorkerCount {
    WorkerCount::new(count).unwrap()
}

fn square_pool(count: usize) -> Pool<fn(i64) -> i64> {
    Pool::new(workers(count), (|v| v * v) as fn(i64) -> i64)
}

#[test]
fn zero_worker_count_is_rejected() {
    assert_eq!(WorkerCount::new(0), Err(ConfigError::ZeroWorkers));
    assert_eq!(WorkerCount::new(1).unwrap().get(), 1);
}

#[test]
fn four_tasks_two_workers_yield_square_permutation() {
    let pool = square_pool(2);
    let mut results = pool.collect(IterSource::new([1, 2, 3, 4]));
    assert_eq!(results.len(), 4);
    results.sort_unstable();
    assert_eq!(results, vec![1, 4, 9, 16]);
}

#[test]
fn zero_tasks_close_the_stream_immediately() {
    let pool = square_pool(4);
    let stream = pool.run(IterSource::new(Vec::new()));
    assert_eq!(
        stream.recv_timeout(Duration::from_secs(5)),
        Err(RecvTimeoutError::Disconnected)
    );
}

#[test]
fn malformed_line_truncates_the_task_list() {
    let pool = square_pool(2);
    let source = LineSource::new(Cursor::new("3\n5\nx\n7\n"));
    let mut results = pool.collect(source);
    results.sort_unstable();
    // "x" stops the source; "7" is never read.
    assert_eq!(results, vec![9, 25]);
}

fn concurrency_stays_bounded(count: usize) {
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let pool = {
        let current = Arc::clone(&current);
        let peak = Arc::clone(&peak);
        Pool::new(workers(count), move |v| {
            let now = current.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::yield_now();
            current.fetch_sub(1, Ordering::SeqCst);
            v * v
        })
    };
    let results = pool.collect(IterSource::new(0_i64..1000));
    assert_eq!(results.len(), 1000);
    let peak = peak.load(Ordering::SeqCst);
    assert!(
        peak <= count,
        "observed {peak} concurrent computations with {count} workers"
    );
}

#[test]
fn one_worker_never_runs_two_computations() {
    concurrency_stays_bounded(1);
}

#[test]
fn two_workers_never_run_three_computations() {
    concurrency_stays_bounded(2);
}

#[test]
fn eight_workers_never_run_nine_computations() {
    concurrency_stays_bounded(8);
}

#[test]
fn stream_stays_open_while_the_last_task_runs() {
    let pool = Pool::new(workers(4), |v| {
        if v == 3 {
            thread::sleep(Duration::from_millis(500));
        }
        v * v
    });
    let stream = pool.run(IterSource::new([1, 2, 3]));

    let first = stream.recv_timeout(Duration::from_secs(5)).unwrap();
    let second = stream.recv_timeout(Duration::from_secs(5)).unwrap();
    let mut fast = [first, second];
    fast.sort_unstable();
    assert_eq!(fast, [1, 4]);

    // The slow task is still in flight: open stream, no value yet.
    assert_eq!(
        stream.recv_timeout(Duration::from_millis(50)),
        Err(RecvTimeoutError::Timeout)
    );

    assert_eq!(stream.recv_timeout(Duration::from_secs(5)), Ok(9));
    assert_eq!(
        stream.recv_timeout(Duration::from_secs(5)),
        Err(RecvTimeoutError::Disconnected)
    );
}

#[test]
fn stress_run_completes_and_drains_the_gate() {
    let pool = square_pool(50);
    let results = pool.collect(IterSource::new(0_i64..10_000));
    assert_eq!(results.len(), 10_000);

    // Every admission slot must be free again after the stream closed.
    let gate = pool.gate();
    let permits: Vec<_> = (0..gate.capacity())
        .map(|slot| {
            gate.try_acquire()
                .unwrap_or_else(|| panic!("slot {slot} still held after completion"))
        })
        .collect();
    assert!(gate.try_acquire().is_none());
    drop(permits);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Running the same input twice yields the same multiset of squares,
    /// regardless of worker count and emission order.
    #[test]
    fn same_input_yields_same_square_multiset(
        tasks in prop::collection::vec(-1000_i64..1000, 0..64),
        count in 1_usize..8,
    ) {
        let pool = square_pool(count);
        let mut first = pool.collect(IterSource::new(tasks.clone()));
        let mut second = pool.collect(IterSource::new(tasks.clone()));
        let mut expected: Vec<i64> = tasks.iter().map(|v| v * v).collect();
        first.sort_unstable();
        second.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(&first, &expected);
        prop_assert_eq!(&second, &expected);
    }
}
