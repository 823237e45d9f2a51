//! Pingmon - Rolling-Average Ping Monitor
//!
//! This crate measures ICMP round-trip latency to a configurable set of
//! hosts and publishes a rolling average plus a last-update timestamp for a
//! display consumer. It can be used as a library, or run as a standalone
//! binary with the `pingmon` executable.
//!
//! # Architecture
//!
//! - **Config**: YAML configuration (host list, refresh interval, probe timeout)
//! - **Probe**: per-host ICMP echo probes with timeout and outcome classification
//! - **Engine**: tick-driven scheduler that fans probes out concurrently and
//!   publishes one averaged reading per refresh window
//!
//! # Example
//!
//! ```rust,ignore
//! use chrono::Utc;
//! use pingmon::{AppConfig, PingEngine};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::load_or_init("configs/config.yaml");
//!     let engine = PingEngine::from_config(&config);
//!
//!     // Drive the engine from a periodic tick; it decides when a round is due.
//!     let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
//!     loop {
//!         ticker.tick().await;
//!         engine.on_tick(Utc::now()).await;
//!         let reading = engine.latest();
//!         println!("{} ms", reading.average_ms);
//!     }
//! }
//! ```

pub mod config;
pub mod engine;
pub mod probe;

pub use config::{AppConfig, ConfigError, HostAddress, parse_host_list};
pub use engine::{PingEngine, Reading, TickOutcome};
pub use probe::{IcmpProber, ProbeOutcome, Prober, RoundAverage, probe_round};
