// ── Runtime connection configuration ──
//
// Describes *how* to reach a router. Carries credentials and tuning but
// never touches disk: the CLI (or any embedder) builds a `RouterConfig`
// and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;
use crate::poller::DEFAULT_POLL_INTERVAL;

pub const DEFAULT_ROUTER_URL: &str = "http://192.168.0.1";

/// Configuration for talking to a single router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Router admin URL (e.g., `http://192.168.0.1`). HTTP only.
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Client-list poll interval used when none is given to `enable_client_poll`.
    pub poll_interval: Duration,
}

impl RouterConfig {
    /// Config for `url` with the given credentials and default tuning.
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            timeout: Duration::from_secs(30),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Reject settings the client cannot work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.url.scheme() != "http" {
            return Err(CoreError::Config {
                message: format!(
                    "unsupported scheme '{}' in {}: the router admin UI is plain HTTP",
                    self.url.scheme(),
                    self.url
                ),
            });
        }
        if self.url.host_str().is_none() {
            return Err(CoreError::Config {
                message: format!("router URL has no host: {}", self.url),
            });
        }
        if self.poll_interval.is_zero() {
            return Err(CoreError::Config {
                message: "poll interval must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new(
            Url::parse(DEFAULT_ROUTER_URL).expect("default router URL is valid"),
            "admin",
            SecretString::from(String::new()),
        )
    }
}
