// Page parsing
//
// The router only serves HTML meant for a browser; the data we want is
// embedded as JavaScript string assignments. Parsers turn a raw page body
// into typed records and never panic on unexpected markup.

mod clients;
mod traffic;

use indexmap::IndexMap;
use indexmap::map::Values;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ParseError;

/// Admin pages the client knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PageKind {
    #[strum(serialize = "traffic status")]
    TrafficStatus,
    #[strum(serialize = "network map")]
    NetworkMap,
}

impl PageKind {
    /// Path of the page relative to the router root.
    pub fn path(self) -> &'static str {
        match self {
            Self::TrafficStatus => "/pages/systemMonitoring/trafficStatus/wan.html",
            Self::NetworkMap => "/pages/connectionStatus/content/networkMap.html",
        }
    }
}

/// WAN byte counters from the traffic status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficCounters {
    pub received_total: u64,
    pub transmitted_total: u64,
}

/// How a client is attached to the router.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Connection {
    Wired,
    Wireless,
}

/// One connected device as listed on the network map page.
///
/// Identity is the MAC address; two records with the same MAC are the
/// same client even if other fields differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub connection: Connection,
    pub device_type: String,
    pub name: String,
    pub lease: String,
    pub mac: String,
    pub ip: String,
}

/// All clients connected at one instant, keyed by MAC in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    clients: IndexMap<String, ClientRecord>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn get(&self, mac: &str) -> Option<&ClientRecord> {
        self.clients.get(mac)
    }

    pub fn contains(&self, mac: &str) -> bool {
        self.clients.contains_key(mac)
    }

    /// Records in page order.
    pub fn iter(&self) -> Values<'_, String, ClientRecord> {
        self.clients.values()
    }

    /// MAC addresses in page order.
    pub fn macs(&self) -> impl Iterator<Item = &str> {
        self.clients.keys().map(String::as_str)
    }

    /// Insert keyed by the record's MAC. A repeated MAC replaces the
    /// earlier record but keeps its position.
    fn insert(&mut self, record: ClientRecord) {
        self.clients.insert(record.mac.clone(), record);
    }
}

impl FromIterator<ClientRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = ClientRecord>>(iter: I) -> Self {
        let mut snapshot = Self::default();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a ClientRecord;
    type IntoIter = Values<'a, String, ClientRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Turns raw page content into typed records.
///
/// Implementations must return [`ParseError`] for markup they do not
/// recognise rather than producing partial data.
pub trait PageParser: Send + Sync {
    fn parse_traffic_page(&self, body: &str) -> Result<TrafficCounters, ParseError>;

    fn parse_clients_page(&self, body: &str) -> Result<Snapshot, ParseError>;
}

/// Parser for the stock firmware's embedded `var name = '...';` markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupParser;

impl PageParser for MarkupParser {
    fn parse_traffic_page(&self, body: &str) -> Result<TrafficCounters, ParseError> {
        traffic::parse(body)
    }

    fn parse_clients_page(&self, body: &str) -> Result<Snapshot, ParseError> {
        clients::parse(body)
    }
}

/// Compile the pattern for `var <name> = '<value>';`.
///
/// The value runs to the first `';`, so a bare `'` inside it is kept.
fn var_pattern(name: &str) -> Regex {
    Regex::new(&format!(r"var\s+{name}\s*=\s*'(.*?)';")).expect("static pattern is valid")
}

/// Value of the first matching embedded assignment, or `MissingMarker`.
fn embedded_var<'a>(
    body: &'a str,
    pattern: &Regex,
    page: PageKind,
    marker: &'static str,
) -> Result<&'a str, ParseError> {
    pattern
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(ParseError::MissingMarker { page, marker })
}
