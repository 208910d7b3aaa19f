//! Cancellation and deadline context for a single request.

use std::future::{Future, pending};
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::error::NetworkFailure;

/// Carries the caller's cancellation signal and deadline into a request.
///
/// The default context never cancels and has no deadline; the request is then
/// bounded only by its own timeout.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that never cancels and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Drives `fut` to completion unless the context is cancelled or its
    /// deadline passes first. The future is dropped in that case.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, NetworkFailure> {
        if self.is_cancelled() {
            return Err(NetworkFailure::Cancelled);
        }

        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => pending::<()>().await,
            }
        };

        let expired = async {
            match self.deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            output = fut => Ok(output),
            _ = cancelled => Err(NetworkFailure::Cancelled),
            _ = expired => Err(NetworkFailure::DeadlineExceeded),
        }
    }
}
