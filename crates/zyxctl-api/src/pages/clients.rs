// Network map page: `var wiredActiveUsers = '...';` and `var wlActiveUsers = '...';`.
//
// Each list is `|`-separated entries of `/`-separated fields:
// type / name / lease / MAC / (unused) / IP.

use std::sync::LazyLock;

use regex::Regex;

use super::{ClientRecord, Connection, PageKind, Snapshot, embedded_var, var_pattern};
use crate::error::ParseError;

const PAGE: PageKind = PageKind::NetworkMap;
const ENTRY_FIELDS: usize = 6;

static WIRED_USERS: LazyLock<Regex> = LazyLock::new(|| var_pattern("wiredActiveUsers"));
static WIRELESS_USERS: LazyLock<Regex> = LazyLock::new(|| var_pattern("wlActiveUsers"));

pub(super) fn parse(body: &str) -> Result<Snapshot, ParseError> {
    let wired = embedded_var(body, &WIRED_USERS, PAGE, "wiredActiveUsers")?;
    let wireless = embedded_var(body, &WIRELESS_USERS, PAGE, "wlActiveUsers")?;

    let mut records = Vec::new();
    for (connection, list) in [(Connection::Wired, wired), (Connection::Wireless, wireless)] {
        for entry in list.split('|').filter(|e| !e.trim().is_empty()) {
            records.push(parse_entry(connection, entry)?);
        }
    }

    Ok(records.into_iter().collect())
}

fn parse_entry(connection: Connection, entry: &str) -> Result<ClientRecord, ParseError> {
    let fields: Vec<&str> = entry.split('/').collect();
    let [device_type, name, lease, mac, _, ip, ..] = fields.as_slice() else {
        return Err(ParseError::MalformedEntry {
            page: PAGE,
            entry: entry.to_owned(),
            expected: ENTRY_FIELDS,
            got: fields.len(),
        });
    };

    Ok(ClientRecord {
        connection,
        device_type: (*device_type).to_owned(),
        name: (*name).to_owned(),
        lease: (*lease).to_owned(),
        mac: (*mac).to_owned(),
        ip: (*ip).to_owned(),
    })
}
