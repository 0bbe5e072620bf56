// Plain HTTP transport for the router's admin pages.
//
// Issues a single request and hands back the raw body and headers.
// Knows nothing about sessions: cookies are passed in by the caller
// and `Set-Cookie` headers are returned untouched.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{COOKIE, HeaderMap, SET_COOKIE};
use reqwest::redirect::Policy;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;

/// Shared transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout. The only guard against a hung router.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("zyxctl/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// Redirects are never followed: the login response carries the
    /// session cookie and the success marker itself.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .redirect(Policy::none())
            .build()
            .map_err(Error::Transport)
    }
}

/// A fully-read HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    /// The first `Set-Cookie` header value, if any.
    pub fn first_set_cookie(&self) -> Option<&str> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .next()
            .and_then(|v| v.to_str().ok())
    }

    /// Whether the body contains `marker` verbatim.
    pub fn contains(&self, marker: &str) -> bool {
        self.body.contains(marker)
    }
}

/// Raw HTTP client bound to one router.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for the router at `base_url` (e.g. `http://192.168.0.1`).
    pub fn new(base_url: Url, config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
            base_url,
        })
    }

    /// Create a transport around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The router base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    /// Send a GET, optionally attaching a raw `Cookie` header value.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Result<RawResponse, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let mut builder = self.http.get(url);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let resp = builder.send().await.map_err(Error::Transport)?;

        Self::read(resp).await
    }

    /// Send a form-encoded POST.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<RawResponse, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::read(resp).await
    }

    async fn read(resp: reqwest::Response) -> Result<RawResponse, Error> {
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(%status, bytes = body.len(), "response read");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
