mod barrier;
mod gate;

pub use barrier::{FlightGuard, InFlight};
pub use gate::{Gate, Permit};

use crate::{
    config::WorkerCount,
    source::{SourceItem, TaskSource},
};
use crossbeam_channel::{Receiver, Sender};
use derive_more::Debug;
use std::{sync::Arc, thread};

/// Bounded worker pool: a gated fan-out from a task source to a
/// completion-ordered result stream.
///
/// Key responsibilities:
/// - Admits at most `W` concurrent computations via the [`Gate`].
/// - Dispatches each admitted task on its own thread; the dispatcher itself
///   only ever blocks on admission, never on a computation finishing.
/// - Joins all in-flight work through [`InFlight`] before the result stream
///   disconnects, making a premature or double close unrepresentable.
///
/// Results arrive in completion order, not submission order.
#[must_use]
#[derive(Debug)]
pub struct Pool<F> {
    gate: Gate,
    #[debug(skip)]
    compute: Arc<F>,
}

impl<F> Pool<F>
where
    F: Fn(i64) -> i64 + Send + Sync + 'static,
{
    /// Build a pool with `workers` admission slots running `compute`.
    pub fn new(workers: WorkerCount, compute: F) -> Self {
        Self {
            gate: Gate::new(workers),
            compute: Arc::new(compute),
        }
    }

    /// The pool's admission gate.
    ///
    /// Useful for observing drain: once a run's result stream has
    /// disconnected, all `capacity()` slots are acquirable again.
    #[must_use]
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Run the pool over `source`, returning the result stream.
    ///
    /// A dedicated dispatcher thread reads the source, admits tasks through
    /// the gate, and spawns one computation per task. When the source is
    /// exhausted (or terminates on malformed input) the dispatcher waits
    /// for all in-flight computations and then drops the last live sender,
    /// so the receiver disconnects exactly once, after every dispatched
    /// task has published its result.
    ///
    /// The stream is a rendezvous channel: producers block until the
    /// consumer takes each value, so a slow consumer backpressures the
    /// pool.
    pub fn run<S>(&self, source: S) -> Receiver<i64>
    where
        S: TaskSource + Send + 'static,
    {
        let (results, stream) = crossbeam_channel::bounded(0);
        let gate = self.gate.clone();
        let compute = Arc::clone(&self.compute);
        thread::spawn(move || dispatch(source, &gate, &compute, results));
        stream
    }

    /// Run the pool over `source` and drain the stream into a `Vec`.
    pub fn collect<S>(&self, source: S) -> Vec<i64>
    where
        S: TaskSource + Send + 'static,
    {
        self.run(source).into_iter().collect()
    }
}

/// Dispatcher loop. Runs on its own thread and is the sole closer of the
/// result stream.
///
/// Lifecycle: READING -> DISPATCHING while tasks arrive -> DRAINING once
/// the source stops with computations outstanding -> closed when the
/// in-flight count reaches zero and `results` drops.
fn dispatch<S, F>(mut source: S, gate: &Gate, compute: &Arc<F>, results: Sender<i64>)
where
    S: TaskSource,
    F: Fn(i64) -> i64 + Send + Sync + 'static,
{
    let in_flight = InFlight::new();
    let mut dispatched = 0_u64;
    loop {
        let task = match source.next_task() {
            SourceItem::Task(task) => task,
            SourceItem::Exhausted => break,
            SourceItem::Malformed(err) => {
                // Reference behavior: report and mirror clean exhaustion.
                tracing::warn!(%err, "task source terminated on malformed input");
                break;
            }
        };
        // The only backpressure point for the dispatcher itself.
        let permit = gate.acquire();
        let guard = in_flight.register();
        let results = results.clone();
        let compute = Arc::clone(compute);
        dispatched += 1;
        thread::spawn(move || {
            let output = compute(task);
            // A disconnected receiver means the caller abandoned the run;
            // the result is discarded, the slot is still released.
            let _ = results.send(output);
            // Release the slot before the guard so the join observes a
            // fully drained gate, and before this thread's sender drops.
            drop(permit);
            drop(guard);
        });
    }
    tracing::debug!(dispatched, "task source drained; joining in-flight work");
    in_flight.wait();
    // `results` drops here: the last sender, hence the single disconnect.
}
