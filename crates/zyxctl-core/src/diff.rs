// ── Snapshot diffing ──
//
// Presence/absence only: a MAC in both snapshots produces nothing,
// even if its name, lease or IP changed.

use zyxctl_api::{ClientRecord, Snapshot};

use crate::event::RouterEvent;

/// Clients that appeared and disappeared between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Records from the new snapshot whose MAC was absent before, in new-snapshot order.
    pub connected: Vec<ClientRecord>,
    /// Records from the old snapshot whose MAC is now absent, in old-snapshot order.
    pub disconnected: Vec<ClientRecord>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.connected.is_empty() && self.disconnected.is_empty()
    }

    /// Connect events first, then disconnect events.
    pub fn into_events(self) -> impl Iterator<Item = RouterEvent> {
        self.connected
            .into_iter()
            .map(RouterEvent::ClientConnect)
            .chain(self.disconnected.into_iter().map(RouterEvent::ClientDisconnect))
    }
}

/// Compare two snapshots by MAC.
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> SnapshotDiff {
    SnapshotDiff {
        connected: new
            .iter()
            .filter(|c| !old.contains(&c.mac))
            .cloned()
            .collect(),
        disconnected: old
            .iter()
            .filter(|c| !new.contains(&c.mac))
            .cloned()
            .collect(),
    }
}
