// ── Router facade ──
//
// One object per router: the shared session, the page parser, the
// event channel and the client poller. One-shot reads and the background
// poll go through the same session, so a login done by either benefits both.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::debug;

use zyxctl_api::transport::TransportConfig;
use zyxctl_api::{HttpTransport, MarkupParser, PageKind, PageParser, Session, Snapshot, TrafficCounters};

use crate::config::RouterConfig;
use crate::error::CoreError;
use crate::event::RouterEvent;
use crate::poller::{CycleOutcome, SnapshotPoller, SnapshotSource};

const EVENT_CHANNEL_SIZE: usize = 256;

/// Fetches and parses the network map page through the shared session.
#[derive(Clone)]
pub struct ClientFetcher {
    session: Arc<Session>,
    parser: Arc<dyn PageParser>,
    timeout: Duration,
}

impl ClientFetcher {
    /// Fetch the connected-client list.
    pub async fn connected_clients(&self) -> Result<Snapshot, CoreError> {
        let body = self.fetch(PageKind::NetworkMap).await?;
        let snapshot = self
            .parser
            .parse_clients_page(&body)
            .map_err(zyxctl_api::Error::from)?;
        debug!(clients = snapshot.len(), "network map parsed");
        Ok(snapshot)
    }

    /// Fetch the WAN traffic counters.
    pub async fn traffic_status_wan(&self) -> Result<TrafficCounters, CoreError> {
        let body = self.fetch(PageKind::TrafficStatus).await?;
        Ok(self
            .parser
            .parse_traffic_page(&body)
            .map_err(zyxctl_api::Error::from)?)
    }

    async fn fetch(&self, page: PageKind) -> Result<String, CoreError> {
        self.session
            .authenticated_request(page.path())
            .await
            .map_err(|e| translate(e, self.timeout))
    }
}

impl SnapshotSource for ClientFetcher {
    async fn fetch_snapshot(&self) -> Result<Snapshot, CoreError> {
        self.connected_clients().await
    }
}

/// Fill in the configured timeout, which the api error does not carry.
fn translate(err: zyxctl_api::Error, timeout: Duration) -> CoreError {
    match err {
        zyxctl_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout {
            timeout_secs: timeout.as_secs(),
        },
        other => other.into(),
    }
}

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<RouterInner>`. The client poll stops when
/// the last clone is dropped.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

struct RouterInner {
    config: RouterConfig,
    fetcher: ClientFetcher,
    event_tx: broadcast::Sender<RouterEvent>,
    poller: SnapshotPoller<ClientFetcher>,
}

impl Router {
    /// Create a router client using the stock firmware page parser.
    /// Does not touch the network; the first request logs in.
    pub fn new(config: RouterConfig) -> Result<Self, CoreError> {
        Self::with_parser(config, Arc::new(MarkupParser))
    }

    /// Create a router client with a custom page parser.
    pub fn with_parser(config: RouterConfig, parser: Arc<dyn PageParser>) -> Result<Self, CoreError> {
        config.validate()?;

        let transport = HttpTransport::new(
            config.url.clone(),
            &TransportConfig {
                timeout: config.timeout,
                ..TransportConfig::default()
            },
        )?;
        let session = Arc::new(Session::new(
            transport,
            config.username.clone(),
            config.password.clone(),
        ));
        let fetcher = ClientFetcher {
            session,
            parser,
            timeout: config.timeout,
        };
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        let poller = SnapshotPoller::new(fetcher.clone(), event_tx.clone());

        Ok(Self {
            inner: Arc::new(RouterInner {
                config,
                fetcher,
                event_tx,
                poller,
            }),
        })
    }

    /// Access the router configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    // ── Session ──────────────────────────────────────────────────

    /// Drop any held token and log in again. Not required: requests log
    /// in on demand. A rejected login leaves the router unauthenticated.
    pub async fn login(&self) -> Result<(), CoreError> {
        let session = &self.inner.fetcher.session;
        session.invalidate();
        session
            .login()
            .await
            .map_err(|e| translate(e, self.inner.config.timeout))
    }

    /// Whether a session token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.inner.fetcher.session.is_authenticated()
    }

    // ── One-shot reads ───────────────────────────────────────────

    /// Current WAN receive/transmit byte counters. Not cached.
    pub async fn traffic_status_wan(&self) -> Result<TrafficCounters, CoreError> {
        self.inner.fetcher.traffic_status_wan().await
    }

    /// Currently connected clients. Does not touch the poll baseline.
    pub async fn connected_clients(&self) -> Result<Snapshot, CoreError> {
        self.inner.fetcher.connected_clients().await
    }

    // ── Client poll ──────────────────────────────────────────────

    /// Start (or restart) the client poll. `None` uses the configured interval.
    pub fn enable_client_poll(&self, interval: Option<Duration>) -> Result<(), CoreError> {
        self.inner
            .poller
            .enable(interval.unwrap_or(self.inner.config.poll_interval))
    }

    /// Stop the client poll.
    pub fn disable_client_poll(&self) {
        self.inner.poller.disable();
    }

    pub fn is_client_poll_enabled(&self) -> bool {
        self.inner.poller.is_enabled()
    }

    /// Run one poll cycle now.
    pub async fn poll_clients_once(&self) -> CycleOutcome {
        self.inner.poller.poll_once().await
    }

    /// The poller's current baseline snapshot.
    pub fn client_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.poller.baseline()
    }

    /// Subscribe to client connect/disconnect and poll error events.
    pub fn events(&self) -> broadcast::Receiver<RouterEvent> {
        self.inner.event_tx.subscribe()
    }
}
