// ── Connected-client poller ──
//
// One timer task per poller. Each tick spawns a cycle guarded by an
// in-flight flag, so a slow router makes later ticks skip instead of
// piling up concurrent fetches. The baseline snapshot is swapped
// atomically at the end of each successful cycle.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use zyxctl_api::Snapshot;

use crate::diff::diff_snapshots;
use crate::error::CoreError;
use crate::event::RouterEvent;

/// Poll interval used when the caller does not pick one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10_000);

/// Something that can produce a fresh client snapshot.
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, CoreError>> + Send;
}

/// What a single poll cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Another cycle was still in flight; nothing was fetched.
    Skipped,
    /// First successful cycle: stored as baseline, no events.
    Baseline { clients: usize },
    /// Diffed against the previous baseline and emitted events.
    Diffed { connected: usize, disconnected: usize },
    /// The poller was disabled or re-armed while fetching; result dropped.
    Discarded,
    /// Fetch or parse failed; baseline untouched.
    Failed { message: String },
}

/// Timer-driven poll of the connected-client list.
///
/// Owns the current baseline snapshot and the in-flight flag. Dropping the
/// poller stops its timer.
pub struct SnapshotPoller<S: SnapshotSource> {
    inner: Arc<PollerInner<S>>,
}

struct PollerInner<S> {
    source: S,
    events: broadcast::Sender<RouterEvent>,
    baseline: ArcSwapOption<Snapshot>,
    in_flight: AtomicBool,
    /// Bumped by every enable/disable; cycles that straddle a bump are discarded.
    generation: AtomicU64,
    timer: Mutex<Option<Timer>>,
}

struct Timer {
    cancel: CancellationToken,
    period: Duration,
}

impl<S: SnapshotSource> SnapshotPoller<S> {
    pub fn new(source: S, events: broadcast::Sender<RouterEvent>) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                source,
                events,
                baseline: ArcSwapOption::empty(),
                in_flight: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Start polling every `period`, replacing any running timer.
    ///
    /// The first cycle runs one full period after this call. Must be called
    /// from within a tokio runtime.
    pub fn enable(&self, period: Duration) -> Result<(), CoreError> {
        if period.is_zero() {
            return Err(CoreError::Config {
                message: "poll interval must be greater than zero".into(),
            });
        }

        let mut timer = self.inner.timer.lock().expect("poller timer lock poisoned");
        if let Some(old) = timer.take() {
            old.cancel.cancel();
        }
        self.inner.generation.fetch_add(1, Ordering::AcqRel);

        let cancel = CancellationToken::new();
        tokio::spawn(poll_task(Arc::clone(&self.inner), period, cancel.clone()));
        *timer = Some(Timer { cancel, period });

        info!(
            interval = %humantime::format_duration(period),
            "client poll enabled"
        );
        Ok(())
    }

    /// Stop the timer. A cycle already in flight finishes but its result is dropped.
    pub fn disable(&self) {
        let mut timer = self.inner.timer.lock().expect("poller timer lock poisoned");
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        if let Some(old) = timer.take() {
            old.cancel.cancel();
            info!("client poll disabled");
        }
    }

    /// Whether the timer is running.
    pub fn is_enabled(&self) -> bool {
        self.inner.timer.lock().expect("poller timer lock poisoned").is_some()
    }

    /// The active poll period, if enabled.
    pub fn interval(&self) -> Option<Duration> {
        self.inner
            .timer
            .lock()
            .expect("poller timer lock poisoned")
            .as_ref()
            .map(|t| t.period)
    }

    /// Whether a cycle is currently in flight.
    pub fn is_polling(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// The current baseline snapshot, if a cycle has succeeded.
    pub fn baseline(&self) -> Option<Arc<Snapshot>> {
        self.inner.baseline.load_full()
    }

    /// Forget the baseline; the next successful cycle starts over silently.
    pub fn reset(&self) {
        self.inner.baseline.store(None);
    }

    /// Run one cycle now, under the same no-overlap rule as the timer.
    pub async fn poll_once(&self) -> CycleOutcome {
        self.inner.run_cycle().await
    }
}

impl<S: SnapshotSource> Drop for SnapshotPoller<S> {
    fn drop(&mut self) {
        if let Ok(mut timer) = self.inner.timer.lock() {
            if let Some(t) = timer.take() {
                t.cancel.cancel();
            }
        }
    }
}

impl<S: SnapshotSource> PollerInner<S> {
    async fn run_cycle(&self) -> CycleOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("previous client poll still in flight, skipping tick");
            return CycleOutcome::Skipped;
        }
        let _guard = InFlight(&self.in_flight);

        let generation = self.generation.load(Ordering::Acquire);
        let result = self.source.fetch_snapshot().await;
        self.finish(generation, result)
    }

    /// Publish a cycle's result unless enable/disable ran since it started.
    ///
    /// Holds the timer lock through the check and the sends, so once
    /// `disable` returns no stale cycle can emit.
    fn finish(&self, generation: u64, result: Result<Snapshot, CoreError>) -> CycleOutcome {
        let _timer = self.timer.lock().expect("poller timer lock poisoned");
        if self.generation.load(Ordering::Acquire) != generation {
            debug!("client poll was disabled mid-cycle, dropping result");
            return CycleOutcome::Discarded;
        }

        match result {
            Ok(snapshot) => self.apply(snapshot),
            Err(e) => {
                warn!(error = %e, "client poll failed");
                let message = e.to_string();
                let _ = self.events.send(RouterEvent::PollError {
                    message: message.clone(),
                });
                CycleOutcome::Failed { message }
            }
        }
    }

    fn apply(&self, snapshot: Snapshot) -> CycleOutcome {
        let current = Arc::new(snapshot);
        let Some(previous) = self.baseline.swap(Some(Arc::clone(&current))) else {
            debug!(clients = current.len(), "client baseline stored");
            return CycleOutcome::Baseline {
                clients: current.len(),
            };
        };

        let diff = diff_snapshots(&previous, &current);
        let connected = diff.connected.len();
        let disconnected = diff.disconnected.len();
        if !diff.is_empty() {
            info!(connected, disconnected, "client list changed");
        }
        for event in diff.into_events() {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }

        CycleOutcome::Diffed {
            connected,
            disconnected,
        }
    }
}

/// Clears the in-flight flag when the cycle ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

async fn poll_task<S: SnapshotSource>(
    inner: Arc<PollerInner<S>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!("client_poll_task tick");
                let inner = Arc::clone(&inner);
                tokio::spawn(async move {
                    inner.run_cycle().await;
                });
            }
        }
    }
}
