//! `zyxctl watch`: stream client connect/disconnect events.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, info, warn};

use zyxctl_core::{ClientRecord, CycleOutcome, Router, RouterEvent};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

/// An event plus the moment the CLI received it.
#[derive(Serialize)]
struct Stamped<'a> {
    at: DateTime<Utc>,
    #[serde(flatten)]
    event: &'a RouterEvent,
}

fn render_event(event: &RouterEvent, global: &GlobalOpts) -> Result<String, CliError> {
    let stamped = Stamped {
        at: Utc::now(),
        event,
    };
    match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json(&stamped, true),
        OutputFormat::Yaml => Ok(format!("---\n{}", output::render_yaml(&stamped)?)),
        OutputFormat::Plain => Ok(match event.client() {
            Some(c) => format!("{}\t{}", event.name(), c.mac),
            None => event.name().to_owned(),
        }),
        OutputFormat::Table => Ok(human_line(&stamped, output::should_color(&global.color))),
    }
}

fn human_line(stamped: &Stamped<'_>, color: bool) -> String {
    let time = stamped.at.with_timezone(&Local).format("%H:%M:%S");
    let describe =
        |c: &ClientRecord| format!("{:<20} {}  {}  ({})", c.name, c.mac, c.ip, c.connection);
    let (sign, text) = match stamped.event {
        RouterEvent::ClientConnect(c) => ("+", describe(c)),
        RouterEvent::ClientDisconnect(c) => ("-", describe(c)),
        RouterEvent::PollError { message } => ("!", format!("poll failed: {message}")),
    };

    if !color {
        return format!("{time} {sign} {text}");
    }
    match sign {
        "+" => format!("{} {} {text}", time.dimmed(), sign.green()),
        "-" => format!("{} {} {text}", time.dimmed(), sign.red()),
        _ => format!("{} {} {}", time.dimmed(), sign.yellow(), text.yellow()),
    }
}

fn emit(event: &RouterEvent, global: &GlobalOpts) -> Result<(), CliError> {
    output::print_output(&render_event(event, global)?, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(router: &Router, args: &WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let interval = args
        .interval_ms
        .map_or(router.config().poll_interval, Duration::from_millis);
    if interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval-ms".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let events = router.events();
    match args.cycles {
        Some(cycles) => run_cycles(router, events, interval, cycles, global).await,
        None => run_until_interrupted(router, events, interval, global).await,
    }
}

/// Drive `cycles` poll cycles in the foreground, one per interval.
async fn run_cycles(
    router: &Router,
    mut events: broadcast::Receiver<RouterEvent>,
    interval: Duration,
    cycles: u32,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    for n in 0..cycles {
        if n > 0 {
            tokio::time::sleep(interval).await;
        }
        let outcome = router.poll_clients_once().await;
        debug!(cycle = n + 1, ?outcome, "poll cycle finished");
        if let CycleOutcome::Baseline { clients } = outcome {
            info!(clients, "baseline captured");
        }

        loop {
            match events.try_recv() {
                Ok(event) => emit(&event, global)?,
                Err(TryRecvError::Lagged(skipped)) => warn!(skipped, "event receiver lagged"),
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
    Ok(())
}

/// Run the background poller and print events until Ctrl-C.
async fn run_until_interrupted(
    router: &Router,
    events: broadcast::Receiver<RouterEvent>,
    interval: Duration,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    router.enable_client_poll(Some(interval))?;
    info!(
        interval = %humantime::format_duration(interval),
        "watching for client changes (Ctrl-C to stop)"
    );

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
        }
    };
    let result = stream_events(events, interrupted, global).await;

    router.disable_client_poll();
    result
}

/// Print events until `shutdown` resolves or the channel closes.
async fn stream_events(
    mut events: broadcast::Receiver<RouterEvent>,
    shutdown: impl Future<Output = ()>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => return Ok(()),
            recv = events.recv() => match recv {
                Ok(event) => emit(&event, global)?,
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event receiver lagged"),
                Err(RecvError::Closed) => return Ok(()),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zyxctl_core::Connection;

    use super::*;
    use crate::cli::Cli;

    fn quiet_global() -> GlobalOpts {
        use clap::Parser;
        Cli::try_parse_from(["zyxctl", "-q", "-o", "plain", "watch"])
            .unwrap()
            .global
    }

    fn laptop() -> RouterEvent {
        RouterEvent::ClientConnect(ClientRecord {
            connection: Connection::Wired,
            device_type: "PC".into(),
            name: "Laptop1".into(),
            lease: "24h".into(),
            mac: "AA:BB:CC:DD:EE:FF".into(),
            ip: "192.168.0.10".into(),
        })
    }

    #[test]
    fn human_line_without_color() {
        let event = laptop();
        let line = human_line(
            &Stamped {
                at: Utc::now(),
                event: &event,
            },
            false,
        );
        assert!(line.contains(" + Laptop1"), "{line}");
        assert!(line.ends_with("AA:BB:CC:DD:EE:FF  192.168.0.10  (wired)"), "{line}");
    }

    #[test]
    fn stamped_json_keeps_event_tag() {
        let event = laptop();
        let json = output::render_json(
            &Stamped {
                at: Utc::now(),
                event: &event,
            },
            true,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["event"], "client_connect");
        assert_eq!(value["mac"], "AA:BB:CC:DD:EE:FF");
        assert!(value["at"].is_string());
    }

    #[tokio::test]
    async fn shutdown_wins_while_events_keep_arriving() {
        let (tx, rx) = broadcast::channel(16);
        let producer = tokio::spawn(async move {
            loop {
                if tx.send(laptop()).is_err() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        });

        let global = quiet_global();
        let stopped = tokio::time::timeout(
            Duration::from_secs(5),
            stream_events(rx, tokio::time::sleep(Duration::from_millis(50)), &global),
        )
        .await;

        producer.abort();
        assert!(matches!(stopped, Ok(Ok(()))), "stream did not stop: {stopped:?}");
    }

    #[tokio::test]
    async fn closed_channel_ends_stream() {
        let (tx, rx) = broadcast::channel(4);
        tx.send(laptop()).unwrap();
        drop(tx);

        let global = quiet_global();
        let result = stream_events(rx, std::future::pending(), &global).await;
        assert!(result.is_ok());
    }
}
