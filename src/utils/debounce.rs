//! Trailing-edge debouncing
//!
//! A [`Debouncer`] collapses a burst of calls into a single invocation of its
//! callback, made `wait` after the last call of the burst with that call's
//! arguments. There is no leading edge and no maximum wait.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::trace;

type Callback<A> = Arc<dyn Fn(A) + Send + Sync>;

pub struct Debouncer<A> {
    wait: Duration,
    callback: Callback<A>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F>(wait: Duration, callback: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            wait,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    /// Re-arm the timer with `args`, superseding any pending invocation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call(&self, args: A) {
        let mut pending = self.pending();
        if let Some(previous) = pending.take() {
            trace!("Debouncer superseding pending invocation");
            previous.abort();
        }

        let callback = Arc::clone(&self.callback);
        let wait = self.wait;
        *pending = Some(tokio::spawn(async move {
            sleep(wait).await;
            callback(args);
        }));
    }

    /// Drop the pending invocation, if any. Returns whether one was dropped.
    pub fn cancel(&self) -> bool {
        match self.pending().take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}
