use core::num::NonZeroUsize;
use thiserror::Error;

/// Error kind for pool configuration failures.
///
/// Produced before any thread is spawned; a pool with an invalid
/// configuration never starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested worker count was zero.
    #[error("worker count must be a positive integer")]
    ZeroWorkers,
}

/// Validated worker count for the admission gate.
///
/// Compact `NonZeroUsize` makes a zero-capacity gate unrepresentable once
/// construction has succeeded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct WorkerCount(NonZeroUsize);

impl WorkerCount {
    /// Validate a caller-supplied worker count.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroWorkers`] if `workers == 0`.
    pub fn new(workers: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(workers)
            .map(Self)
            .ok_or(ConfigError::ZeroWorkers)
    }

    /// The underlying count.
    #[must_use]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for WorkerCount {
    type Error = ConfigError;

    fn try_from(workers: usize) -> Result<Self, Self::Error> {
        Self::new(workers)
    }
}
