use crate::sync::{Arc, Condvar, Mutex};

/// Join barrier over the number of in-flight computations.
///
/// `register` increments the count and returns an RAII [`FlightGuard`]
/// whose drop decrements it, so a decrement without a matching increment
/// is unrepresentable. `wait` unblocks only when the count is zero.
///
/// Correct closure relies on call order, not on the primitive itself: the
/// dispatcher calls `wait` only after it has stopped registering, so the
/// count is monotonically non-increasing from that point on, and every
/// decrement synchronizes with the final zero-check through the mutex.
#[must_use]
#[derive(Debug, Clone)]
pub struct InFlight {
    inner: Arc<FlightInner>,
}

#[derive(Debug)]
struct FlightInner {
    count: Mutex<usize>,
    drained: Condvar,
}

impl InFlight {
    /// A barrier with no registered work.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(FlightInner {
                count: Mutex::new(0),
                drained: Condvar::new(),
            }),
        }
    }

    /// Account for one newly dispatched computation.
    pub fn register(&self) -> FlightGuard {
        let mut count = self.inner.count.lock().expect("InFlight::register: [1]");
        *count = count.checked_add(1).expect("InFlight::register: [2]");
        drop(count);
        FlightGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Block until every registered computation has finished.
    pub fn wait(&self) {
        let mut count = self.inner.count.lock().expect("InFlight::wait: [1]");
        while *count > 0 {
            count = self.inner.drained.wait(count).expect("InFlight::wait: [2]");
        }
    }
}

impl Default for InFlight {
    fn default() -> Self {
        Self::new()
    }
}

/// Accounts for one in-flight computation; dropping marks it finished.
#[must_use]
#[derive(Debug)]
pub struct FlightGuard {
    inner: Arc<FlightInner>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let mut count = self.inner.count.lock().expect("FlightGuard::drop: [1]");
        *count = count.checked_sub(1).expect("FlightGuard::drop: [2]");
        let drained = *count == 0;
        drop(count);
        if drained {
            self.inner.drained.notify_all();
        }
    }
}
