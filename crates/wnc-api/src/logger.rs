// Logger handle carried by a client.
//
// `tracing` already routes events through whatever dispatcher is current,
// so the handle only needs to say *which* dispatcher a request runs under.

use std::future::Future;

use tracing::Dispatch;
use tracing::instrument::WithSubscriber;

/// Where a client's request logs go.
///
/// The default ([`Logger::ambient`]) follows the dispatcher that is current
/// when the request executes, i.e. the process-wide subscriber installed by
/// the application (or nothing, if none was installed).
#[derive(Debug, Clone, Default)]
pub struct Logger {
    dispatch: Option<Dispatch>,
}

impl Logger {
    /// Log through the caller's current `tracing` dispatcher.
    pub fn ambient() -> Self {
        Self { dispatch: None }
    }

    /// Discard every event emitted by the client.
    pub fn disabled() -> Self {
        Self {
            dispatch: Some(Dispatch::none()),
        }
    }

    /// The explicit dispatcher, if one was supplied.
    pub fn dispatch(&self) -> Option<&Dispatch> {
        self.dispatch.as_ref()
    }

    /// Drive `fut` with this logger's dispatcher installed.
    pub(crate) async fn scope<F: Future>(&self, fut: F) -> F::Output {
        match &self.dispatch {
            Some(dispatch) => fut.with_subscriber(dispatch.clone()).await,
            None => fut.await,
        }
    }
}

impl From<Dispatch> for Logger {
    fn from(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }
}
