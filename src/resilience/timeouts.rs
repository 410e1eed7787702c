//! Timeout enforcement.
//!
//! # Responsibilities
//! - Arm one deadline per outbound call, measured from dispatch
//! - Race the call against a cancellation token the timer trips
//! - Release the timer on every exit path
//!
//! # Design Decisions
//! - The timer is a spawned task that cancels the token; the guard owns it
//!   and aborts it on drop, so success, failure and a dropped handler all
//!   leave nothing scheduled behind
//! - The deadline is not extended by partial progress

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Returned when the deadline fires before the raced future completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deadline of {}ms elapsed", .0.as_millis())]
pub struct DeadlineElapsed(pub Duration);

/// An armed deadline. Dropping it disarms the timer.
#[derive(Debug)]
pub struct DeadlineGuard {
    token: CancellationToken,
    timer: JoinHandle<()>,
    timeout: Duration,
}

impl DeadlineGuard {
    /// Arm a deadline `timeout` from now. Must be called inside a Tokio runtime.
    pub fn arm(timeout: Duration) -> Self {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            trigger.cancel();
        });

        Self {
            token,
            timer,
            timeout,
        }
    }

    /// Drive `fut` until it completes or the deadline fires, whichever is first.
    ///
    /// On expiry `fut` is dropped, which aborts whatever I/O it had in flight.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, DeadlineElapsed>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(DeadlineElapsed(self.timeout)),
            output = fut => Ok(output),
        }
    }
}

impl Drop for DeadlineGuard {
    fn drop(&mut self) {
        self.timer.abort();
    }
}
