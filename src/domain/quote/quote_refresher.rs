//! Debounced quote refresh

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Quiet period after the last input change before a quote is requested
pub const DEFAULT_QUOTE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Cancellable delayed action, at most one pending per instance.
///
/// Only the wait is cancellable. Once the quiet period is over the fetch runs as its own
/// task and is never aborted, so overlapping fetches resolve in whatever order they finish.
pub struct QuoteRefresher {
    quiet_period: Duration,
    pending: Option<JoinHandle<()>>,
}

impl QuoteRefresher {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    /// Replace any pending fetch with `fetch`, to run after the quiet period
    pub fn schedule<F>(&mut self, fetch: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.cancel() {
            debug!("Quote refresh rescheduled");
        }

        let quiet_period = self.quiet_period;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            tokio::spawn(fetch);
        }));
    }

    /// Drop the pending fetch, if any. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for QuoteRefresher {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTE_DEBOUNCE)
    }
}

impl Drop for QuoteRefresher {
    fn drop(&mut self) {
        self.cancel();
    }
}
