//! Trailing-edge debouncing on top of tokio timers.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Collapses bursts of calls into a single trailing invocation.
///
/// Each [`Debouncer::call`] cancels the pending invocation and restarts the
/// wait window; the function runs once the window elapses without another
/// call, with the arguments of the last call. Must be used inside a tokio
/// runtime. Dropping the debouncer cancels any pending invocation.
pub struct Debouncer<A: Send + 'static> {
    wait: Duration,
    func: Arc<dyn Fn(A) + Send + Sync>,
    pending: Mutex<Option<CancellationToken>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new(wait: Duration, func: impl Fn(A) + Send + Sync + 'static) -> Self {
        Self {
            wait,
            func: Arc::new(func),
            pending: Mutex::new(None),
        }
    }

    /// Schedule `func(args)` after the wait window, replacing any pending call.
    pub fn call(&self, args: A) {
        let token = CancellationToken::new();
        match self.pending.lock() {
            Ok(mut pending) => {
                if let Some(previous) = pending.replace(token.clone()) {
                    previous.cancel();
                }
            }
            Err(e) => {
                error!("Debouncer state poisoned: {e}");
                return;
            }
        }

        let func = Arc::clone(&self.func);
        let wait = self.wait;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => debug!("Debounced call superseded"),
                () = tokio::time::sleep(wait) => func(args),
            }
        });
    }

    /// Drop the pending invocation, if any.
    pub fn cancel(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(token) = pending.take() {
                token.cancel();
            }
        }
    }

    #[must_use]
    pub fn wait(&self) -> Duration {
        self.wait
    }
}

impl<A: Send + 'static> Drop for Debouncer<A> {
    fn drop(&mut self) {
        self.cancel();
    }
}
