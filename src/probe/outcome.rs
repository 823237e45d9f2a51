//! Per-host probe outcome classification.

use std::time::Duration;

/// Outcome of one latency probe to one host.
///
/// Produced once per host per probing round; not retained beyond the round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Reply arrived within the timeout.
    Success {
        /// Measured round-trip time in milliseconds.
        round_trip_ms: u64,
    },

    /// Reply arrived, but the reported round-trip exceeds the timeout bound.
    ///
    /// Clock or measurement skew at the transport boundary. Neither a
    /// success nor a failure for averaging purposes; excluded from both the
    /// numerator and the denominator of the round mean.
    Skewed {
        /// Reported round-trip time in milliseconds.
        round_trip_ms: u64,
    },

    /// No reply within the timeout.
    TimedOut,

    /// Transport-level failure (unreachable, resolution error, permission
    /// denial, etc.).
    Failed {
        /// Human-readable failure description.
        reason: String,
    },
}

impl ProbeOutcome {
    /// Classify a reply that arrived within the probe deadline.
    ///
    /// A reported round-trip above the timeout bound is classified as
    /// [`ProbeOutcome::Skewed`].
    pub fn from_reply(round_trip: Duration, timeout: Duration) -> Self {
        let round_trip_ms = round_trip.as_millis().min(u64::MAX as u128) as u64;
        if round_trip > timeout {
            Self::Skewed { round_trip_ms }
        } else {
            Self::Success { round_trip_ms }
        }
    }

    /// Whether this outcome contributes to the round average.
    pub fn is_countable(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The countable round-trip time, if any.
    pub fn round_trip_ms(&self) -> Option<u64> {
        match self {
            Self::Success { round_trip_ms } => Some(*round_trip_ms),
            _ => None,
        }
    }
}
