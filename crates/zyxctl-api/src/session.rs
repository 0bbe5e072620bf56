// Session manager
//
// Cookie-based login against the router's form endpoint, plus a single
// "authenticated fetch" operation that re-logs in once when the router
// answers with its redirect-to-login script instead of the page.

use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::error::Error;
use crate::transport::HttpTransport;

/// Form endpoint accepting `AuthName` / `AuthPassword`.
pub const LOGIN_PATH: &str = "/login/login-page.cgi";

/// Script the login page returns when the credentials were accepted.
pub const LOGIN_SUCCESS_MARKER: &str = "top.location='/index.html';";

/// Script any page returns once the router has dropped our session.
pub const SESSION_EXPIRED_MARKER: &str = "top.location='/login/login.html';";

/// Name of the cookie the router expects the token under.
pub const SESSION_COOKIE: &str = "SESSION";

/// How many times a single request may recover from a stale session.
const MAX_SESSION_RETRIES: usize = 1;

/// Authentication state for one router.
///
/// Holds the session token (if any) and hides login mechanics behind
/// [`authenticated_request`](Self::authenticated_request). Share it via
/// `Arc`; concurrent callers that find no token may each log in, and
/// whichever login finishes last owns the stored token.
pub struct Session {
    transport: HttpTransport,
    username: String,
    password: SecretString,
    token: RwLock<Option<String>>,
}

impl Session {
    pub fn new(transport: HttpTransport, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            transport,
            username: username.into(),
            password,
            token: RwLock::new(None),
        }
    }

    /// Whether a session token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.token.read().expect("session lock poisoned").is_some()
    }

    /// Drop the current token; the next request logs in again.
    pub fn invalidate(&self) {
        *self.token.write().expect("session lock poisoned") = None;
    }

    /// Log in with the configured credentials and store the session token.
    pub async fn login(&self) -> Result<(), Error> {
        self.login_for_token().await?;
        Ok(())
    }

    async fn login_for_token(&self) -> Result<String, Error> {
        debug!(user = %self.username, "logging in at {}", LOGIN_PATH);

        let resp = self
            .transport
            .post_form(
                LOGIN_PATH,
                &[
                    ("AuthName", self.username.as_str()),
                    ("AuthPassword", self.password.expose_secret()),
                ],
            )
            .await?;

        if !resp.contains(LOGIN_SUCCESS_MARKER) {
            return Err(Error::InvalidCredentials);
        }

        let cookie = resp
            .first_set_cookie()
            .ok_or_else(|| Error::MalformedLoginResponse {
                message: "no Set-Cookie header on successful login".into(),
            })?;
        let token = parse_session_token(cookie).ok_or_else(|| Error::MalformedLoginResponse {
            message: format!("unparsable session cookie: {cookie:?}"),
        })?;

        *self.token.write().expect("session lock poisoned") = Some(token.clone());
        debug!("login successful");
        Ok(token)
    }

    /// GET `path` with the session cookie attached and return the body.
    ///
    /// Logs in first when no token is held. If the router answers with
    /// its session-expired redirect, the token is discarded and the request
    /// is retried once after a fresh login; a second redirect in a row
    /// fails with [`Error::SessionUnavailable`].
    pub async fn authenticated_request(&self, path: &str) -> Result<String, Error> {
        let mut force_login = false;

        for attempt in 0..=MAX_SESSION_RETRIES {
            let current = if force_login {
                None
            } else {
                self.token.read().expect("session lock poisoned").clone()
            };
            let token = match current {
                Some(token) => token,
                None => self.login_for_token().await?,
            };

            let cookie = format!("{SESSION_COOKIE}={token}");
            let resp = self.transport.get(path, Some(&cookie)).await?;

            if !resp.contains(SESSION_EXPIRED_MARKER) {
                return Ok(resp.body);
            }

            warn!(path, attempt, "router reported an expired session");
            self.discard(&token);
            force_login = true;
        }

        Err(Error::SessionUnavailable)
    }

    /// Clear the stored token, unless another caller already replaced it.
    fn discard(&self, stale: &str) {
        let mut guard = self.token.write().expect("session lock poisoned");
        if guard.as_deref() == Some(stale) {
            *guard = None;
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.transport.base_url().as_str())
            .field("username", &self.username)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// Extract the token from a `Set-Cookie` value: the first cookie pair,
/// everything after its first `=`.
fn parse_session_token(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?;
    let (_, value) = pair.split_once('=')?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}
