//! Probe Layer
//!
//! Latency probing with per-host outcome classification and concurrent
//! round aggregation. Each round fans one probe per host out as an
//! independent Tokio task and reduces the countable outcomes to a single
//! truncated mean.
//!
//! - [`Prober`]: trait for issuing one latency probe to one host
//! - [`IcmpProber`]: ICMP echo implementation
//! - [`ProbeOutcome`]: per-host classification (success, skew, timeout, failure)
//! - [`probe_round`]: concurrent fan-out and reduction for one round

mod aggregate;
mod icmp;
mod outcome;

pub use aggregate::{RoundAverage, probe_round};
pub use icmp::{IcmpProber, Prober};
pub use outcome::ProbeOutcome;
