// SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

/// One-shot slot shared by a task's completer and its handle.
struct ResultSlot<T> {
    /// Outcome of the task, written exactly once.
    outcome: Mutex<Option<Result<T>>>,
    /// Signalled when the outcome is written.
    ready: Condvar,
}

impl<T> ResultSlot<T> {
    fn lock(&self) -> MutexGuard<'_, Option<Result<T>>> {
        self.outcome.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fill(&self, outcome: Result<T>) {
        let mut outcome_guard = self.lock();
        *outcome_guard = Some(outcome);
        self.ready.notify_all();
    }
}

/// Handle to the eventual result of a task submitted to a pool.
///
/// The result is written once by the worker that runs the task and read once
/// by [`TaskHandle::wait`].
pub struct TaskHandle<T> {
    slot: Arc<ResultSlot<T>>,
}

/// Producer half of a [`TaskHandle`]. Dropping it without completing
/// resolves the handle to [`Error::TaskAbandoned`].
pub(crate) struct Completer<T> {
    slot: Option<Arc<ResultSlot<T>>>,
}

/// Creates a connected completer/handle pair.
pub(crate) fn channel<T>() -> (Completer<T>, TaskHandle<T>) {
    let slot = Arc::new(ResultSlot {
        outcome: Mutex::new(None),
        ready: Condvar::new(),
    });
    (
        Completer {
            slot: Some(slot.clone()),
        },
        TaskHandle { slot },
    )
}

impl<T> Completer<T> {
    pub(crate) fn complete(mut self, outcome: Result<T>) {
        if let Some(slot) = self.slot.take() {
            slot.fill(outcome);
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.fill(Err(Error::TaskAbandoned));
        }
    }
}

impl<T> TaskHandle<T> {
    /// Blocks until the task has finished and returns its value, or the error
    /// that prevented it from producing one.
    pub fn wait(self) -> Result<T> {
        let mut outcome_guard = self.slot.lock();
        loop {
            if let Some(outcome) = outcome_guard.take() {
                return outcome;
            }
            outcome_guard = self
                .slot
                .ready
                .wait(outcome_guard)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Blocks for at most `timeout` and reports whether the result is ready.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let outcome_guard = self.slot.lock();
        let (outcome_guard, _) = self
            .slot
            .ready
            .wait_timeout_while(outcome_guard, timeout, |outcome| {
                outcome.is_none()
            })
            .unwrap_or_else(|e| e.into_inner());
        outcome_guard.is_some()
    }

    /// Returns true once the task has finished, successfully or not.
    pub fn is_ready(&self) -> bool {
        self.slot.lock().is_some()
    }
}
