//! Async client core for the Cisco Catalyst 9800 wireless controller
//! RESTCONF API.
//!
//! This crate is the shared request/response pipeline that every
//! per-domain accessor (access points, WLANs, RF, mobility, ...) delegates
//! to. An accessor supplies an endpoint path and a response type; the core
//! handles the rest:
//!
//! - **[`ClientConfig`]** — connection parameters, validated once by
//!   [`Client::new`]. Unset options fall back to defaults (60s timeout,
//!   verified TLS, ambient logger, crate user-agent).
//! - **[`endpoint`]** — URL construction and RESTCONF path helpers.
//! - **[`Client`]** — immutable, cheaply clonable handle. [`Client::get`]
//!   runs one `GET` bounded by the effective deadline of the caller's
//!   [`RequestContext`] and the client timeout; [`Client::rpc`] posts an
//!   `{"input": ...}` envelope to `/restconf/operations`.
//! - **[`classify`]** — maps status codes onto [`Error`]: 401, 403 and 404
//!   become sentinels, every other non-200 becomes an [`ApiError`].
//!
//! ```no_run
//! use serde::Deserialize;
//! use wnc_api::{Client, ClientConfig, RequestContext};
//!
//! #[derive(Debug, Deserialize)]
//! struct WlanCfg {
//!     #[serde(rename = "Cisco-IOS-XE-wireless-wlan-cfg:wlan-cfg-data")]
//!     data: serde_json::Value,
//! }
//!
//! # async fn run() -> Result<(), wnc_api::Error> {
//! let client = Client::new(ClientConfig::new("wnc.example.com", "YWRtaW46c2VjcmV0"))?;
//! let cfg: WlanCfg = wnc_api::get(
//!     &RequestContext::background(),
//!     &client,
//!     "Cisco-IOS-XE-wireless-wlan-cfg:wlan-cfg-data",
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod client;
pub mod config;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod logger;
pub mod rpc;
pub mod transport;

use serde::de::DeserializeOwned;

pub use classify::classify;
pub use client::{Client, YANG_DATA_JSON};
pub use config::{
    ClientConfig, ClientConfigBuilder, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, MIN_TIMEOUT, Protocol,
};
pub use context::RequestContext;
pub use error::{ApiError, Error, ErrorKind};
pub use logger::Logger;
pub use transport::TransportConfig;

/// GET `endpoint` through `client` and decode the body into `T`.
///
/// Free-function form of [`Client::get`] for accessors that hold a
/// `&Client` rather than calling methods on it.
pub async fn get<T: DeserializeOwned>(
    ctx: &RequestContext,
    client: &Client,
    endpoint: &str,
) -> Result<T, Error> {
    client.get(ctx, endpoint).await
}
