// Per-call cancellation and deadline.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation scope for a single request.
///
/// [`RequestContext::background`] (also the `Default`) never cancels and
/// has no deadline; the client's configured timeout still applies. A
/// context's deadline can only shorten a request, never extend it past
/// the client timeout.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn background() -> Self {
        Self::default()
    }

    /// A context cancelled when `token` is.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            deadline: None,
        }
    }

    /// Add (or tighten) an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Add (or tighten) a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// The earlier of this context's deadline and `now + timeout`.
    pub(crate) fn effective_deadline(&self, timeout: Duration) -> Instant {
        let bounded = Instant::now() + timeout;
        self.deadline.map_or(bounded, |d| d.min(bounded))
    }

    /// Resolves once the context is cancelled; pending forever otherwise.
    pub(crate) async fn cancelled(&self) {
        match &self.cancel {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn client_timeout_bounds_a_background_context() {
        let ctx = RequestContext::background();
        let start = Instant::now();
        assert_eq!(ctx.effective_deadline(Duration::from_secs(60)), start + Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn shorter_caller_deadline_wins() {
        let start = Instant::now();
        let ctx = RequestContext::background().with_timeout(Duration::from_secs(5));
        assert_eq!(ctx.effective_deadline(Duration::from_secs(60)), start + Duration::from_secs(5));

        let ctx = RequestContext::background().with_timeout(Duration::from_secs(600));
        assert_eq!(ctx.effective_deadline(Duration::from_secs(60)), start + Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn deadlines_only_tighten() {
        let start = Instant::now();
        let ctx = RequestContext::background()
            .with_timeout(Duration::from_secs(3))
            .with_timeout(Duration::from_secs(30));
        assert_eq!(ctx.deadline(), Some(start + Duration::from_secs(3)));
    }

    #[test]
    fn cancellation_is_observed() {
        let token = CancellationToken::new();
        let ctx = RequestContext::with_cancellation(token.clone());
        assert!(!ctx.is_cancelled());
        token.cancel();
        assert!(ctx.is_cancelled());
        assert!(!RequestContext::background().is_cancelled());
    }
}
