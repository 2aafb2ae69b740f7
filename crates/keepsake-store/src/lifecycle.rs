//! Open/closed lifecycle shared by both store types.
//!
//! State lives behind an `RwLock<Option<S>>`: readers share the lock and see a
//! consistent snapshot, mutations take it exclusively, and `close` takes it
//! exclusively too, so it waits for any in-flight write before dropping the
//! state. The atomic flag lets callers that arrive after close fail without
//! queueing behind the lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::error::{Result, StoreError};

pub(crate) struct Lifecycle<S> {
    closed: AtomicBool,
    state: RwLock<Option<S>>,
}

impl<S> Lifecycle<S> {
    pub(crate) fn new(state: S) -> Self {
        Self {
            closed: AtomicBool::new(false),
            state: RwLock::new(Some(state)),
        }
    }

    /// Run `f` under the shared lock.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&S) -> Result<R>) -> Result<R> {
        if self.is_closed() {
            return Err(StoreError::StoreClosed);
        }
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(state) => f(state),
            None => Err(StoreError::StoreClosed),
        }
    }

    /// Run `f` under the exclusive lock.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut S) -> Result<R>) -> Result<R> {
        if self.is_closed() {
            return Err(StoreError::StoreClosed);
        }
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(state) => f(state),
            None => Err(StoreError::StoreClosed),
        }
    }

    /// Drain in-flight operations and take the state out.
    ///
    /// Returns `None` when the store was already closed.
    pub(crate) fn close(&self) -> Option<S> {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.closed.store(true, Ordering::Release);
        guard.take()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
