//! `zyxctl clients`: connected-client listing.

use tabled::Tabled;
use zyxctl_core::{ClientRecord, Connection, Router};

use crate::cli::{ClientsArgs, ConnectionFilter, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Link")]
    connection: String,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "Lease")]
    lease: String,
}

impl From<&ClientRecord> for ClientRow {
    fn from(c: &ClientRecord) -> Self {
        Self {
            name: c.name.clone(),
            ip: c.ip.clone(),
            mac: c.mac.clone(),
            connection: c.connection.to_string(),
            device_type: c.device_type.clone(),
            lease: c.lease.clone(),
        }
    }
}

fn passes_filter(filter: Option<ConnectionFilter>, c: &ClientRecord) -> bool {
    match filter {
        None => true,
        Some(ConnectionFilter::Wired) => c.connection == Connection::Wired,
        Some(ConnectionFilter::Wireless) => c.connection == Connection::Wireless,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(router: &Router, args: &ClientsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = router.connected_clients().await?;
    let clients: Vec<ClientRecord> = snapshot
        .iter()
        .filter(|c| passes_filter(args.connection, c))
        .cloned()
        .collect();

    let out = output::render_list(
        &global.output,
        &clients,
        |c| ClientRow::from(c),
        |c| c.mac.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
