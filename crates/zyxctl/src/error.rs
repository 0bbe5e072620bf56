//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use zyxctl_config::ConfigError;
use zyxctl_core::{CoreError, PageKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const PARSE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to router at {url}")]
    #[diagnostic(
        code(zyxctl::connection_failed),
        help(
            "Check that the router is reachable from this machine.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(zyxctl::timeout),
        help("Increase the timeout with --timeout or check the router's responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login rejected by the router")]
    #[diagnostic(
        code(zyxctl::auth_failed),
        help(
            "Verify the admin username and password.\n\
             Run: zyxctl config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("Router session could not be established")]
    #[diagnostic(
        code(zyxctl::session),
        help(
            "The router accepted the login but keeps treating the session as expired.\n\
             Another admin session may be open in a browser; log out there and retry.\n\
             Detail: {detail}"
        )
    )]
    Session { detail: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(zyxctl::no_credentials),
        help(
            "Store one with: zyxctl config set-password --profile {profile}\n\
             Or set ZYXCTL_PASSWORD / pass --password."
        )
    )]
    NoCredentials { profile: String },

    // ── Router data ──────────────────────────────────────────────────
    #[error("Could not read the {page} page")]
    #[diagnostic(
        code(zyxctl::parse),
        help(
            "The page did not look as expected; the router firmware may differ.\n\
             Detail: {message}"
        )
    )]
    Parse { page: PageKind, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(zyxctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No router configured")]
    #[diagnostic(
        code(zyxctl::no_config),
        help(
            "Pass --host, set ZYXCTL_HOST, or add a profile to the config file.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(zyxctl::config))]
    Config(Box<ConfigError>),

    // ── Internal ─────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(zyxctl::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::Session { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::Parse { .. } => exit_code::PARSE,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            Self::Config(_) | Self::Internal(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to auth failures.
    pub fn for_profile(self, name: &str) -> Self {
        match self {
            Self::AuthFailed { .. } => Self::AuthFailed {
                profile: name.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::InvalidCredentials => CliError::AuthFailed {
                profile: "default".into(),
            },

            CoreError::MalformedLoginResponse { message } => CliError::Session { detail: message },

            CoreError::SessionUnavailable => CliError::Session {
                detail: "session expired again right after logging in".into(),
            },

            CoreError::Parse { page, message } => CliError::Parse { page, message },

            CoreError::Config { message } => CliError::Validation {
                field: "router".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_documented_exit_codes() {
        let cases = [
            (
                CoreError::ConnectionFailed {
                    url: "http://192.168.0.1/".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (CoreError::Timeout { timeout_secs: 5 }, exit_code::TIMEOUT),
            (CoreError::InvalidCredentials, exit_code::AUTH),
            (CoreError::SessionUnavailable, exit_code::AUTH),
            (
                CoreError::Parse {
                    page: PageKind::NetworkMap,
                    message: "missing wlActiveUsers".into(),
                },
                exit_code::PARSE,
            ),
            (
                CoreError::Config {
                    message: "bad url".into(),
                },
                exit_code::USAGE,
            ),
        ];

        for (core, expected) in cases {
            let label = core.to_string();
            assert_eq!(CliError::from(core).exit_code(), expected, "{label}");
        }
    }

    #[test]
    fn auth_failure_names_the_profile() {
        let err = CliError::from(CoreError::InvalidCredentials).for_profile("office");
        assert!(matches!(err, CliError::AuthFailed { ref profile } if profile == "office"));
    }

    #[test]
    fn missing_password_is_an_auth_error() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "home".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
