// ── Router events ──
//
// What the client poller broadcasts to subscribers.

use serde::Serialize;
use strum::IntoStaticStr;

use zyxctl_api::ClientRecord;

/// A change observed by the client poller.
///
/// Serialized with an `event` tag (`client_connect`, `client_disconnect`,
/// `poll_error`) so consumers can stream them as JSON lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, IntoStaticStr)]
#[serde(tag = "event", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RouterEvent {
    /// A MAC appeared that was not in the previous snapshot.
    ClientConnect(ClientRecord),
    /// A MAC from the previous snapshot is gone. Carries the last known record.
    ClientDisconnect(ClientRecord),
    /// A poll cycle failed; the baseline was left untouched.
    PollError { message: String },
}

impl RouterEvent {
    /// Event name as emitted on the wire.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// The client this event is about, if any.
    pub fn client(&self) -> Option<&ClientRecord> {
        match self {
            Self::ClientConnect(c) | Self::ClientDisconnect(c) => Some(c),
            Self::PollError { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use zyxctl_api::Connection;

    use super::*;

    #[test]
    fn events_serialize_with_tag() {
        let event = RouterEvent::ClientConnect(ClientRecord {
            connection: Connection::Wireless,
            device_type: "Phone".into(),
            name: "pixel".into(),
            lease: "1h".into(),
            mac: "00:00:00:00:00:03".into(),
            ip: "192.168.0.4".into(),
        });

        assert_eq!(event.name(), "client_connect");
        assert_eq!(
            serde_json::to_value(&event).expect("serializable"),
            json!({
                "event": "client_connect",
                "connection": "wireless",
                "device_type": "Phone",
                "name": "pixel",
                "lease": "1h",
                "mac": "00:00:00:00:00:03",
                "ip": "192.168.0.4",
            })
        );
    }

    #[test]
    fn poll_error_name() {
        let event = RouterEvent::PollError {
            message: "boom".into(),
        };
        assert_eq!(event.name(), "poll_error");
        assert!(event.client().is_none());
    }
}
