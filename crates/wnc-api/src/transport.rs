// Shared HTTP transport.
//
// One `reqwest::Client` is built per `wnc_api::Client` and reused for every
// request; its connection pool is the only shared mutable resource and is
// synchronized internally by reqwest/hyper.

use std::time::Duration;

use crate::error::Error;

/// Bound on TCP connect plus TLS handshake.
pub const TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Floor on waiting for response data once the request is written.
pub const RESPONSE_HEADER_TIMEOUT: Duration = Duration::from_secs(30);

/// Margin keeping the transport's read timer behind the request deadline.
const DEADLINE_SLACK: Duration = Duration::from_secs(1);

/// How long an idle pooled connection is kept.
pub const IDLE_CONN_TIMEOUT: Duration = Duration::from_secs(90);

/// TCP keep-alive probe interval.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Transport settings derived from a validated client configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub insecure_skip_verify: bool,
    pub tls_handshake_timeout: Duration,
    pub response_header_timeout: Duration,
    pub idle_conn_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            insecure_skip_verify: false,
            tls_handshake_timeout: TLS_HANDSHAKE_TIMEOUT,
            response_header_timeout: RESPONSE_HEADER_TIMEOUT,
            idle_conn_timeout: IDLE_CONN_TIMEOUT,
            user_agent: crate::config::DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl TransportConfig {
    /// Settings for a client whose requests are bounded by `timeout`.
    ///
    /// The read timeout always outlasts `timeout`, so a slow controller
    /// hits the request deadline (and `RequestTimeout`) rather than a
    /// transport-level read error.
    pub fn for_client(timeout: Duration, insecure_skip_verify: bool, user_agent: String) -> Self {
        Self {
            insecure_skip_verify,
            response_header_timeout: timeout
                .saturating_add(DEADLINE_SLACK)
                .max(RESPONSE_HEADER_TIMEOUT),
            user_agent,
            ..Self::default()
        }
    }

    /// Build a `reqwest::Client` from this config.
    ///
    /// HTTP/2 is never negotiated: the controller's RESTCONF server is
    /// driven over HTTP/1.1 with keep-alive.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .http1_only()
            .connect_timeout(self.tls_handshake_timeout)
            .read_timeout(self.response_header_timeout)
            .pool_idle_timeout(self.idle_conn_timeout)
            .tcp_keepalive(KEEPALIVE_INTERVAL);

        if self.insecure_skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| Error::invalid_config(format!("failed to build HTTP transport: {e}")))
    }
}
