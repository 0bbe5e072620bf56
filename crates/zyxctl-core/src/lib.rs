//! Stateful client layer between `zyxctl-api` and consumers (CLI, daemons).
//!
//! - **[`Router`]**: facade over one router: owns the [`Session`](zyxctl_api::Session),
//!   the page parser, and the client poller. One-shot reads
//!   ([`traffic_status_wan()`](Router::traffic_status_wan),
//!   [`connected_clients()`](Router::connected_clients)) share the session
//!   with the background poll.
//!
//! - **[`SnapshotPoller`]**: timer-driven poll of the connected-client list.
//!   Never runs two cycles at once; each successful cycle is diffed against
//!   the previous snapshot and turned into [`RouterEvent`]s.
//!
//! - **[`RouterEvent`]**: `client_connect` / `client_disconnect` /
//!   `poll_error`, delivered over a `tokio::sync::broadcast` channel.

pub mod config;
pub mod diff;
pub mod error;
pub mod event;
pub mod poller;
pub mod router;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::RouterConfig;
pub use diff::{SnapshotDiff, diff_snapshots};
pub use error::CoreError;
pub use event::RouterEvent;
pub use poller::{CycleOutcome, DEFAULT_POLL_INTERVAL, SnapshotPoller, SnapshotSource};
pub use router::{ClientFetcher, Router};

// Re-export page types at the crate root for ergonomics.
pub use zyxctl_api::{
    ClientRecord, Connection, MarkupParser, PageKind, PageParser, Snapshot, TrafficCounters,
};
