// zyxctl-api: Session-aware client for a router's HTML admin interface

pub mod error;
pub mod pages;
pub mod session;
pub mod transport;

pub use error::{Error, ParseError};
pub use pages::{
    ClientRecord, Connection, MarkupParser, PageKind, PageParser, Snapshot, TrafficCounters,
};
pub use session::Session;
pub use transport::{HttpTransport, RawResponse, TransportConfig};
