//! Bounded worker pool and channel-based concurrency patterns.
//!
//! The engineered core is the worker pool: a file- or iterator-driven task
//! source feeds a dispatcher that admits at most `W` concurrent
//! computations through a counting semaphore, runs each on its own thread,
//! and joins all in-flight work before the result stream closes. It:
//! - Bounds concurrency with an RAII admission gate, so a held slot is
//!   always returned.
//! - Tracks in-flight computations with a join barrier, so the result
//!   stream disconnects exactly once, only after the source is exhausted
//!   and every dispatched computation has published.
//! - Emits results in completion order; submission order is deliberately
//!   not preserved.
//!
//! Key modules:
//! - `config`: validated worker count and configuration errors.
//! - `source`: the `TaskSource` abstraction with line-oriented, in-memory,
//!   and cancellable implementations.
//! - `pool`: the dispatcher, admission gate, and join barrier.
//! - `pipeline`: a deadline-cancelled generator -> square transform chain.
//! - `pubsub`: a broadcast bus with per-subscriber event channels.
//!
//! Quick start:
//! 1. Validate a worker count with `WorkerCount::new`.
//! 2. Build a `Pool` with the computation to apply per task.
//! 3. Call `Pool::run` with any `TaskSource` and read the returned
//!    receiver until it disconnects.
//!
//! Malformed input lines terminate the task source the same way clean
//! end-of-input does; the difference is observable only through the
//! `SourceItem::Malformed` variant and the log side-channel. Cancellation
//! stops new admissions but never aborts work already dispatched.

/// Pool configuration: the validated worker count and its error type.
pub mod config;
/// Deadline-cancelled generator and square transform stages.
///
/// Collaborator of the worker pool; demonstrates channel lifecycle and
/// cancellation without an admission gate.
pub mod pipeline;
/// The bounded worker pool.
///
/// Contains the dispatcher (sole closer of the result stream), the
/// `Gate` admission semaphore, and the `InFlight` join barrier.
pub mod pool;
/// Publish/subscribe fan-out over per-subscriber channels.
pub mod pubsub;
/// Task sources: line-oriented, in-memory, and cancellation-wrapped
/// producers of the work sequence.
pub mod source;
mod sync;

pub use config::{ConfigError, WorkerCount};
pub use pool::Pool;
