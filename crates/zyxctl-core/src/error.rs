// ── Core error types ──
//
// User-facing errors from zyxctl-core. Consumers never see reqwest errors
// or regex details directly: the `From<zyxctl_api::Error>` impl translates
// transport-layer failures into domain-appropriate variants.

use thiserror::Error;

use zyxctl_api::PageKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to router at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Router request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Authentication errors ────────────────────────────────────────
    #[error("Login rejected: invalid credentials")]
    InvalidCredentials,

    #[error("Router accepted the login but sent no usable session cookie: {message}")]
    MalformedLoginResponse { message: String },

    #[error("Router keeps rejecting the session after re-authentication")]
    SessionUnavailable,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unexpected {page} page content: {message}")]
    Parse { page: PageKind, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for failures that re-trying with the same
    /// credentials will not fix.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::MalformedLoginResponse { .. } | Self::SessionUnavailable
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<zyxctl_api::Error> for CoreError {
    fn from(err: zyxctl_api::Error) -> Self {
        match err {
            zyxctl_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            zyxctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            zyxctl_api::Error::InvalidCredentials => CoreError::InvalidCredentials,
            zyxctl_api::Error::MalformedLoginResponse { message } => {
                CoreError::MalformedLoginResponse { message }
            }
            zyxctl_api::Error::SessionUnavailable => CoreError::SessionUnavailable,
            zyxctl_api::Error::Parse(e) => CoreError::Parse {
                page: e.page(),
                message: e.to_string(),
            },
        }
    }
}
