#[cfg(feature = "loom")]
mod imp {
    pub(crate) use loom::sync::{Arc, Condvar, Mutex};
}

#[cfg(not(feature = "loom"))]
mod imp {
    pub(crate) use std::sync::{Arc, Condvar, Mutex};
}

pub(crate) use imp::*;
