//! ICMP echo prober.
//!
//! Measures ICMP round-trip latency to a single target host.

use std::net::IpAddr;
use std::time::Duration;

use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence};
use tokio::time::timeout;

use crate::config::HostAddress;
use crate::probe::ProbeOutcome;

/// Issues one latency probe to one host.
///
/// Implementations classify every failure mode into a [`ProbeOutcome`];
/// probing never returns an error and never retries. A probe outcome is an
/// observation, not a fault.
#[async_trait::async_trait]
pub trait Prober: Send + Sync + 'static {
    /// Send exactly one probe to `host` with the given timeout.
    async fn probe(&self, host: &HostAddress, timeout: Duration) -> ProbeOutcome;
}

/// ICMP echo request prober.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcmpProber;

impl IcmpProber {
    /// Create a new ICMP prober.
    pub fn new() -> Self {
        Self
    }
}

/// Resolve hostname to IP address.
async fn resolve_host(host: &str) -> Result<IpAddr, std::io::Error> {
    // First, try to parse as an IP address directly
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    // Otherwise, resolve the hostname using tokio's DNS lookup
    let addrs = tokio::net::lookup_host(format!("{host}:0")).await?;
    addrs
        .into_iter()
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses found"))
}

#[async_trait::async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, host: &HostAddress, probe_timeout: Duration) -> ProbeOutcome {
        // Resolve hostname to IP address
        let ip_addr = match resolve_host(host.as_str()).await {
            Ok(ip) => ip,
            Err(e) => {
                tracing::warn!(host = %host, error = %e, "Failed to resolve hostname");
                return ProbeOutcome::Failed {
                    reason: format!("resolution failed: {e}"),
                };
            }
        };

        // Create ICMP client based on IP version
        let client = match ip_addr {
            IpAddr::V4(_) => Client::new(&Config::default()),
            IpAddr::V6(_) => Client::new(&Config::builder().kind(ICMP::V6).build()),
        };

        let client = match client {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(host = %host, error = %e, "Failed to create ICMP client");
                return ProbeOutcome::Failed {
                    reason: format!("client creation failed: {e}"),
                };
            }
        };

        // Exactly one echo request, no retries
        let mut pinger = client.pinger(ip_addr, PingIdentifier(rand::random())).await;
        pinger.timeout(probe_timeout);

        match timeout(probe_timeout, pinger.ping(PingSequence(0), &[])).await {
            Ok(Ok((_, rtt))) => {
                let outcome = ProbeOutcome::from_reply(rtt, probe_timeout);
                match &outcome {
                    ProbeOutcome::Skewed { round_trip_ms } => {
                        tracing::warn!(
                            host = %host,
                            round_trip_ms,
                            timeout_ms = probe_timeout.as_millis(),
                            "Reply round-trip exceeds timeout bound, excluding from average"
                        );
                    }
                    _ => {
                        tracing::debug!(host = %host, rtt_ms = rtt.as_millis(), "Ping probe successful");
                    }
                }
                outcome
            }
            Ok(Err(e)) => {
                tracing::warn!(host = %host, error = %e, "Ping probe failed");
                ProbeOutcome::Failed {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                tracing::warn!(
                    host = %host,
                    timeout_ms = probe_timeout.as_millis(),
                    "Ping probe timed out"
                );
                ProbeOutcome::TimedOut
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_host_ipv4() {
        let ip = resolve_host("127.0.0.1").await.unwrap();
        assert_eq!(ip, IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)));
    }

    #[tokio::test]
    async fn test_resolve_host_ipv6() {
        let ip = resolve_host("::1").await.unwrap();
        assert_eq!(ip, IpAddr::V6(std::net::Ipv6Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_resolve_host_invalid_name() {
        let result = resolve_host("definitely-not-a-real-host.invalid").await;
        assert!(result.is_err());
    }
}
