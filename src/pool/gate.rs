use crate::{
    config::WorkerCount,
    sync::{Arc, Condvar, Mutex},
};

/// Bounded counting semaphore limiting concurrent computations.
///
/// Capacity is fixed at construction. `acquire` hands out RAII [`Permit`]s,
/// so a slot acquired without a matching release is unrepresentable. No
/// fairness guarantee beyond the underlying condvar's; only bounded
/// concurrency.
#[must_use]
#[derive(Debug, Clone)]
pub struct Gate {
    inner: Arc<GateInner>,
}

#[derive(Debug)]
struct GateInner {
    capacity: usize,
    held: Mutex<usize>,
    freed: Condvar,
}

impl Gate {
    /// Construct a gate with `capacity` slots.
    pub fn new(capacity: WorkerCount) -> Self {
        Self {
            inner: Arc::new(GateInner {
                capacity: capacity.get(),
                held: Mutex::new(0),
                freed: Condvar::new(),
            }),
        }
    }

    /// Number of slots this gate was constructed with.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Block until a slot is free, then take it.
    pub fn acquire(&self) -> Permit {
        let mut held = self.inner.held.lock().expect("Gate::acquire: [1]");
        while *held == self.inner.capacity {
            held = self.inner.freed.wait(held).expect("Gate::acquire: [2]");
        }
        *held = held.checked_add(1).expect("Gate::acquire: [3]");
        drop(held);
        Permit {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Take a slot without blocking, if one is free.
    pub fn try_acquire(&self) -> Option<Permit> {
        let mut held = self.inner.held.lock().expect("Gate::try_acquire: [1]");
        if *held == self.inner.capacity {
            return None;
        }
        *held = held.checked_add(1).expect("Gate::try_acquire: [2]");
        drop(held);
        Some(Permit {
            inner: Arc::clone(&self.inner),
        })
    }
}

/// An admission slot. Dropping it returns the slot to the gate.
#[must_use]
#[derive(Debug)]
pub struct Permit {
    inner: Arc<GateInner>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        let mut held = self.inner.held.lock().expect("Permit::drop: [1]");
        *held = held.checked_sub(1).expect("Permit::drop: [2]");
        drop(held);
        self.inner.freed.notify_one();
    }
}
