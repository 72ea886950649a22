// Client facade and request executor.
//
// Every domain accessor funnels through `Client::get` (or `rpc`): build the
// URL, attach the RESTCONF headers, run one HTTP exchange bounded by the
// effective deadline, classify the status, then decode the body.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, error, trace};
use url::Url;

use crate::classify::classify;
use crate::config::{ClientConfig, Protocol, Settings};
use crate::context::RequestContext;
use crate::endpoint;
use crate::error::Error;
use crate::logger::Logger;
use crate::transport::TransportConfig;

/// Media type for RESTCONF JSON payloads (RFC 8040).
pub const YANG_DATA_JSON: &str = "application/yang-data+json";

const BODY_PREVIEW_LEN: usize = 200;

/// Handle to one controller.
///
/// Cheap to clone; all state is immutable after [`Client::new`], so clones
/// may be used from any number of tasks concurrently.
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    settings: Settings,
    transport: TransportConfig,
    http: reqwest::Client,
    authorization: HeaderValue,
}

/// Status and body of a completed exchange, before classification.
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl Client {
    // ── Construction ─────────────────────────────────────────────────

    /// Validate `config` and build the shared transport.
    ///
    /// Performs no I/O. Every failure is [`Error::InvalidConfiguration`]:
    /// an empty controller address, an empty token, a timeout that is not
    /// greater than [`MIN_TIMEOUT`](crate::config::MIN_TIMEOUT), or a token
    /// or user agent that cannot be sent as a header.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let settings = config.validate()?;

        let mut authorization =
            HeaderValue::from_str(&format!("Basic {}", settings.access_token.expose_secret()))
                .map_err(|e| {
                    Error::invalid_config(format!("access token is not a valid header value: {e}"))
                })?;
        authorization.set_sensitive(true);

        let transport = TransportConfig::for_client(
            settings.timeout,
            settings.insecure_skip_verify,
            settings.user_agent.clone(),
        );
        let http = transport.build_client()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                settings,
                transport,
                http,
                authorization,
            }),
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn controller(&self) -> &str {
        &self.inner.settings.controller
    }

    /// Effective per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.settings.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.inner.settings.user_agent
    }

    pub fn insecure_skip_verify(&self) -> bool {
        self.inner.settings.insecure_skip_verify
    }

    pub fn protocol(&self) -> Protocol {
        self.inner.settings.protocol
    }

    pub fn logger(&self) -> &Logger {
        &self.inner.settings.logger
    }

    /// Settings the shared HTTP transport was built from.
    pub fn transport(&self) -> &TransportConfig {
        &self.inner.transport
    }

    /// The absolute URL a request for `endpoint` is sent to.
    pub fn url_for(&self, endpoint: &str) -> String {
        endpoint::build_url(
            self.protocol(),
            self.controller(),
            &endpoint::resolve(endpoint),
        )
    }

    // ── Operations ───────────────────────────────────────────────────

    /// GET `endpoint` and decode the JSON body into `T`.
    ///
    /// Unknown fields in the payload are ignored and missing ones keep
    /// their serde default, so response types only need the leaves a caller
    /// actually reads.
    pub async fn get<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
    ) -> Result<T, Error> {
        let url = self.url_for(endpoint);
        self.logger()
            .scope(async {
                let raw = self.round_trip(ctx, Method::GET, &url, None).await?;
                classify(raw.status, &raw.body, &url)?;
                decode(&url, raw.body)
            })
            .await
    }

    /// GET `endpoint` and decode into `target`.
    ///
    /// `target` is only written on success.
    pub async fn send_api_request<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        target: &mut T,
    ) -> Result<(), Error> {
        *target = self.get(ctx, endpoint).await?;
        Ok(())
    }

    // ── Executor ─────────────────────────────────────────────────────

    /// Run one HTTP exchange under `ctx` and the client timeout.
    ///
    /// The response body is fully read (and the response dropped) before
    /// returning, on every path.
    pub(crate) async fn round_trip(
        &self,
        ctx: &RequestContext,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse, Error> {
        if ctx.is_cancelled() {
            debug!(%method, url, "context already cancelled");
            return Err(Error::Cancelled);
        }

        let mut request = self
            .inner
            .http
            .request(method.clone(), Url::parse(url)?)
            .header(AUTHORIZATION, self.inner.authorization.clone())
            .header(ACCEPT, YANG_DATA_JSON)
            .header(CONTENT_TYPE, YANG_DATA_JSON);
        if let Some(body) = body {
            request = request.body(body);
        }

        let deadline = ctx.effective_deadline(self.timeout());
        debug!(%method, url, "sending request");

        let exchange = async {
            let resp = request.send().await?;
            let status = resp.status().as_u16();
            let body = resp.text().await?;
            Ok::<_, reqwest::Error>(RawResponse { status, body })
        };

        tokio::select! {
            biased;
            () = ctx.cancelled() => {
                debug!(%method, url, "request cancelled");
                Err(Error::Cancelled)
            }
            result = tokio::time::timeout_at(deadline, exchange) => match result {
                Ok(Ok(raw)) => {
                    trace!(%method, url, status = raw.status, "response received");
                    Ok(raw)
                }
                Ok(Err(e)) => {
                    error!(%method, url, error = %e, "request failed");
                    Err(Error::Transport(e))
                }
                Err(_) => {
                    error!(%method, url, timeout = ?self.timeout(), "request timed out");
                    Err(Error::RequestTimeout)
                }
            },
        }
    }
}

/// Decode a successful body, keeping the raw text on failure.
pub(crate) fn decode<T: DeserializeOwned>(url: &str, body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| {
        error!(url, error = %e, "failed to unmarshal response");
        let preview: String = body.chars().take(BODY_PREVIEW_LEN).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn client(controller: &str) -> Client {
        Client::new(ClientConfig::new(controller, "YWRtaW46c2VjcmV0")).unwrap()
    }

    #[test]
    fn url_for_prefixes_data_root() {
        let c = client("wnc.example.com");
        assert_eq!(
            c.url_for("Cisco-IOS-XE-wireless-wlan-cfg:wlan-cfg-data"),
            "https://wnc.example.com/restconf/data/Cisco-IOS-XE-wireless-wlan-cfg:wlan-cfg-data"
        );
        assert_eq!(
            c.url_for("/restconf/data/Cisco-IOS-XE-wireless-wlan-cfg:wlan-cfg-data"),
            c.url_for("Cisco-IOS-XE-wireless-wlan-cfg:wlan-cfg-data"),
        );
    }

    #[test]
    fn clones_share_settings() {
        let a = client("wnc");
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.inner, &b.inner));
        assert_eq!(b.timeout(), crate::config::DEFAULT_TIMEOUT);
    }

    #[test]
    fn token_with_control_characters_is_invalid_configuration() {
        let err = Client::new(ClientConfig::new("wnc", "bad\ntoken")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn unsendable_user_agent_is_invalid_configuration() {
        let config = ClientConfig::builder("wnc", "token")
            .user_agent("poller\r\nx")
            .build();
        let err = Client::new(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn transport_follows_configured_timeout() {
        for secs in [2, 60, 120, 900] {
            let timeout = Duration::from_secs(secs);
            let c = Client::new(ClientConfig::builder("wnc", "token").timeout(timeout).build())
                .unwrap();
            assert_eq!(c.timeout(), timeout);
            assert!(c.transport().response_header_timeout > timeout);
        }

        let c = client("wnc");
        assert!(c.transport().response_header_timeout > crate::config::DEFAULT_TIMEOUT);
        assert!(!c.transport().insecure_skip_verify);
    }

    #[test]
    fn decode_failure_keeps_body() {
        let err = decode::<serde_json::Map<String, serde_json::Value>>("u", "not json".into())
            .unwrap_err();
        match err {
            Error::Deserialization { body, message } => {
                assert_eq!(body, "not json");
                assert!(message.contains("body preview"));
            }
            other => panic!("expected Deserialization, got: {other:?}"),
        }
    }
}
