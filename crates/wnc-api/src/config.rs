// ── Connection configuration ──
//
// Describes how to reach one controller. Validation runs exactly once, in
// `Client::new`; afterwards the settings are frozen inside the client.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;
use crate::logger::Logger;

/// Timeout substituted when none (or zero) is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeouts must be strictly longer than this after defaults are applied.
pub const MIN_TIMEOUT: Duration = Duration::from_secs(1);

/// `User-Agent` sent when the caller does not supply one.
pub const DEFAULT_USER_AGENT: &str = concat!("wnc-rs/", env!("CARGO_PKG_VERSION"));

/// URL scheme used to reach the controller.
///
/// Controllers only serve RESTCONF over HTTPS; plain HTTP exists for
/// pointing a client at a local mock server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Https,
    Http,
}

impl Protocol {
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

/// Caller-supplied connection parameters.
///
/// Unset optional fields are filled with defaults by [`Client::new`](crate::Client::new).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Controller address: host name or IP, optionally with `:port`.
    pub controller: String,
    /// Pre-encoded credential sent as `Authorization: Basic <token>`.
    pub access_token: SecretString,
    /// Per-request timeout. `None` or zero selects [`DEFAULT_TIMEOUT`].
    pub timeout: Option<Duration>,
    /// Accept any TLS certificate (self-signed controllers).
    pub insecure_skip_verify: bool,
    /// Log sink. `None` selects [`Logger::ambient`].
    pub logger: Option<Logger>,
    /// `User-Agent` override. `None` or empty selects [`DEFAULT_USER_AGENT`].
    pub user_agent: Option<String>,
    pub protocol: Protocol,
}

impl ClientConfig {
    pub fn new(controller: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::with_token(controller, SecretString::from(access_token.into()))
    }

    /// Like [`ClientConfig::new`] for a token that is already a secret.
    pub fn with_token(controller: impl Into<String>, access_token: SecretString) -> Self {
        Self {
            controller: controller.into(),
            access_token,
            timeout: None,
            insecure_skip_verify: false,
            logger: None,
            user_agent: None,
            protocol: Protocol::Https,
        }
    }

    pub fn builder(
        controller: impl Into<String>,
        access_token: impl Into<String>,
    ) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::new(controller, access_token),
        }
    }

    pub fn builder_with_token(
        controller: impl Into<String>,
        access_token: SecretString,
    ) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::with_token(controller, access_token),
        }
    }

    /// Apply the validation rules in order and freeze the result.
    pub(crate) fn validate(self) -> Result<Settings, Error> {
        let controller = self.controller.trim().to_owned();
        if controller.is_empty() {
            return Err(Error::invalid_config("controller address must not be empty"));
        }

        if self.access_token.expose_secret().trim().is_empty() {
            return Err(Error::invalid_config("access token must not be empty"));
        }

        let timeout = match self.timeout {
            Some(t) if !t.is_zero() => t,
            _ => DEFAULT_TIMEOUT,
        };

        let logger = self.logger.unwrap_or_default();

        if timeout <= MIN_TIMEOUT {
            return Err(Error::invalid_config(format!(
                "timeout must be greater than {}s, got {timeout:?}",
                MIN_TIMEOUT.as_secs()
            )));
        }

        let user_agent = self
            .user_agent
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

        Ok(Settings {
            controller,
            access_token: self.access_token,
            timeout,
            insecure_skip_verify: self.insecure_skip_verify,
            logger,
            user_agent,
            protocol: self.protocol,
        })
    }
}

/// Builder over [`ClientConfig`]; each setter is one recognized option.
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn insecure_skip_verify(mut self, skip: bool) -> Self {
        self.config.insecure_skip_verify = skip;
        self
    }

    pub fn logger(mut self, logger: impl Into<Logger>) -> Self {
        self.config.logger = Some(logger.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.config.protocol = protocol;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Validated, immutable settings held by a client.
#[derive(Debug)]
pub(crate) struct Settings {
    pub controller: String,
    pub access_token: SecretString,
    pub timeout: Duration,
    pub insecure_skip_verify: bool,
    pub logger: Logger,
    pub user_agent: String,
    pub protocol: Protocol,
}
