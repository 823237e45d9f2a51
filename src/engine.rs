//! Tick-driven probe scheduling and published readings.
//!
//! [`PingEngine`] owns the schedule state and the published output pair. It
//! is driven by an external periodic tick (reference cadence: 1 second) and
//! runs at most one probe round per refresh interval, with at most one round
//! in flight at a time. Readers observe the latest [`Reading`] through a
//! watch channel, so the metric and its timestamp are always updated as one
//! atomic publish.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, HostAddress};
use crate::probe::{IcmpProber, Prober, probe_round};

/// The published output pair: rolling average and last-update timestamp.
///
/// Overwritten in place every completed round; no history is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reading {
    /// Mean round-trip time of the last completed round, in milliseconds.
    /// `0` until the first round completes, and the sentinel when every
    /// host in a round failed.
    pub average_ms: u64,
    /// Completion time of the last round, `None` before the first round.
    pub last_update: Option<DateTime<Utc>>,
}

impl Reading {
    /// Last-update timestamp as an ISO-8601 UTC string.
    pub fn last_update_rfc3339(&self) -> Option<String> {
        self.last_update
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Micros, true))
    }
}

/// What a tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The refresh interval has not elapsed; nothing ran.
    NotDue,
    /// A round is already in flight; the tick was a no-op.
    RoundInFlight,
    /// The round was abandoned by cancellation; nothing was published.
    Cancelled,
    /// A round completed and the reading was published.
    Published {
        /// Published mean round-trip time in milliseconds.
        average_ms: u64,
        /// Countable probe outcomes in the round.
        successes: usize,
    },
}

/// Schedule state, mutated only after a round completes.
#[derive(Debug, Default)]
struct ScheduleState {
    /// Trigger instant of the last completed round.
    last_round: Option<DateTime<Utc>>,
}

impl ScheduleState {
    /// Whether the elapsed time since the last round strictly exceeds the
    /// refresh interval. A clock stepping backwards reads as not due.
    fn is_due(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        match self.last_round {
            None => true,
            Some(last) => now
                .signed_duration_since(last)
                .to_std()
                .map(|elapsed| elapsed > interval)
                .unwrap_or(false),
        }
    }
}

/// Latency probing engine: scheduler, concurrent fan-out, published outputs.
///
/// Share behind an [`Arc`] between the tick driver and any readers. The
/// schedule mutex doubles as the single-flight gate: a tick that arrives
/// while a round is in flight is dropped, not queued.
pub struct PingEngine<P: Prober = IcmpProber> {
    hosts: Vec<HostAddress>,
    refresh_interval: Duration,
    probe_timeout: Duration,
    prober: Arc<P>,
    schedule: Mutex<ScheduleState>,
    readings: watch::Sender<Reading>,
    cancel: CancellationToken,
}

impl PingEngine<IcmpProber> {
    /// Build an ICMP engine from application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.hosts(),
            config.effective_refresh_interval(),
            config.timeout,
            IcmpProber::new(),
        )
    }
}

impl<P: Prober> PingEngine<P> {
    /// Create an engine with an explicit prober.
    ///
    /// Hosts and intervals are fixed for the engine's lifetime; build a new
    /// engine to pick up configuration edits.
    pub fn new(
        hosts: Vec<HostAddress>,
        refresh_interval: Duration,
        probe_timeout: Duration,
        prober: P,
    ) -> Self {
        if hosts.is_empty() {
            tracing::warn!("No probe targets configured, rounds will publish the zero sentinel");
        }
        let (readings, _) = watch::channel(Reading::default());

        Self {
            hosts,
            refresh_interval,
            probe_timeout,
            prober: Arc::new(prober),
            schedule: Mutex::new(ScheduleState::default()),
            readings,
            cancel: CancellationToken::new(),
        }
    }

    /// The configured probe targets, in order.
    pub fn hosts(&self) -> &[HostAddress] {
        &self.hosts
    }

    /// The configured refresh interval.
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Latest published reading.
    pub fn latest(&self) -> Reading {
        self.readings.borrow().clone()
    }

    /// Subscribe to published readings.
    pub fn subscribe(&self) -> watch::Receiver<Reading> {
        self.readings.subscribe()
    }

    /// Token for cooperative cancellation of in-flight work.
    ///
    /// Cancelling abandons the current round without publishing and stops
    /// future ticks from starting new rounds.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Process one driver tick.
    ///
    /// Runs a probe round only when the refresh interval has elapsed since
    /// the last round's trigger instant. Guarantees at most one round in
    /// flight: a tick arriving mid-round is a no-op.
    pub async fn on_tick(&self, now: DateTime<Utc>) -> TickOutcome {
        let Ok(mut schedule) = self.schedule.try_lock() else {
            tracing::debug!("Tick ignored, a round is already in flight");
            return TickOutcome::RoundInFlight;
        };

        if !schedule.is_due(now, self.refresh_interval) {
            return TickOutcome::NotDue;
        }

        let start = std::time::Instant::now();
        let Some(round) =
            probe_round(&self.prober, &self.hosts, self.probe_timeout, &self.cancel).await
        else {
            tracing::debug!("Round abandoned before completion, keeping previous reading");
            return TickOutcome::Cancelled;
        };

        // The gate reopens relative to the trigger instant, not completion time.
        schedule.last_round = Some(now);
        self.readings.send_replace(Reading {
            average_ms: round.average_ms,
            last_update: Some(Utc::now()),
        });

        tracing::debug!(
            average_ms = round.average_ms,
            successes = round.successes,
            hosts = self.hosts.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Round completed"
        );

        TickOutcome::Published {
            average_ms: round.average_ms,
            successes: round.successes,
        }
    }
}

impl<P: Prober> std::fmt::Debug for PingEngine<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PingEngine")
            .field("hosts", &self.hosts)
            .field("refresh_interval", &self.refresh_interval)
            .field("probe_timeout", &self.probe_timeout)
            .finish_non_exhaustive()
    }
}
