#[cfg(feature = "loom")]
mod imp {
    pub(crate) use loom::{
        sync::{
            Condvar, Mutex, MutexGuard,
            atomic::{AtomicBool, Ordering},
        },
        thread::ThreadId,
    };

    pub(crate) fn current_thread_id() -> ThreadId {
        loom::thread::current().id()
    }
}

#[cfg(not(feature = "loom"))]
mod imp {
    pub(crate) use core::sync::atomic::{AtomicBool, Ordering};
    pub(crate) use std::{
        sync::{Condvar, Mutex, MutexGuard},
        thread::ThreadId,
    };

    pub(crate) fn current_thread_id() -> ThreadId {
        std::thread::current().id()
    }
}

pub(crate) use imp::*;
