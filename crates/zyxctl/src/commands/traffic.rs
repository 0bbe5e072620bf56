//! `zyxctl traffic`: WAN byte counters.

use zyxctl_core::{Router, TrafficCounters};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Human-readable binary size, e.g. `1.5 GiB`.
fn human_bytes(bytes: u64) -> String {
    let mut unit = 0;
    let mut whole = bytes;
    let mut rem = 0;
    while whole >= 1024 && unit < UNITS.len() - 1 {
        rem = whole % 1024;
        whole /= 1024;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        // one decimal, truncated
        format!("{whole}.{} {}", rem * 10 / 1024, UNITS[unit])
    }
}

fn detail(t: &TrafficCounters) -> String {
    [
        format!(
            "Received:     {} ({} bytes)",
            human_bytes(t.received_total),
            t.received_total
        ),
        format!(
            "Transmitted:  {} ({} bytes)",
            human_bytes(t.transmitted_total),
            t.transmitted_total
        ),
    ]
    .join("\n")
}

pub async fn handle(router: &Router, global: &GlobalOpts) -> Result<(), CliError> {
    let counters = router.traffic_status_wan().await?;
    let out = output::render_single(&global.output, &counters, detail, |t| {
        format!("{}\t{}", t.received_total, t.transmitted_total)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_bytes_picks_binary_units() {
        assert_eq!(human_bytes(0), "0 B");
        assert_eq!(human_bytes(1023), "1023 B");
        assert_eq!(human_bytes(1536), "1.5 KiB");
        assert_eq!(human_bytes(5 * 1024 * 1024 * 1024), "5.0 GiB");
    }
}
