use thiserror::Error;

use crate::pages::PageKind;

/// Top-level error type for the `zyxctl-api` crate.
///
/// Covers every failure mode of talking to the router's admin pages:
/// transport, authentication, session recovery, and page scraping.
/// `zyxctl-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Authentication ──────────────────────────────────────────────
    /// The login page did not redirect to the index page.
    #[error("Login rejected: invalid credentials")]
    InvalidCredentials,

    /// The login page accepted the credentials but the session cookie
    /// could not be extracted from the response.
    #[error("Malformed login response: {message}")]
    MalformedLoginResponse { message: String },

    /// The router kept redirecting to the login page after a fresh login.
    #[error("Session unavailable -- router rejected the session after re-authentication")]
    SessionUnavailable,

    // ── Data ────────────────────────────────────────────────────────
    /// Page content did not match the expected shape.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// Returns `true` if the router refused our credentials or session,
    /// as opposed to a network or scraping failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::MalformedLoginResponse { .. } | Self::SessionUnavailable
        )
    }

    /// Returns `true` if this is a transient error worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Failure to extract a typed record from raw page content.
///
/// Always returned instead of panicking when the markup is not what the
/// parser expects (unknown firmware, truncated body, login page, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An embedded variable the parser relies on is absent.
    #[error("{page} page: missing `{marker}`")]
    MissingMarker { page: PageKind, marker: &'static str },

    /// A counter was present but not a non-negative integer.
    #[error("{page} page: `{marker}` is not a number: {value:?}")]
    InvalidNumber {
        page: PageKind,
        marker: &'static str,
        value: String,
    },

    /// A client entry did not carry the expected slash-delimited fields.
    #[error("{page} page: malformed client entry {entry:?} (expected {expected} fields, got {got})")]
    MalformedEntry {
        page: PageKind,
        entry: String,
        expected: usize,
        got: usize,
    },
}

impl ParseError {
    /// The page that failed to parse.
    pub fn page(&self) -> PageKind {
        match self {
            Self::MissingMarker { page, .. }
            | Self::InvalidNumber { page, .. }
            | Self::MalformedEntry { page, .. } => *page,
        }
    }
}
