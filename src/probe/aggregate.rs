//! Concurrent round aggregation.
//!
//! Fans one probe per host out as independent tasks, joins them all, and
//! reduces the countable outcomes to a single truncated mean.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::HostAddress;
use crate::probe::Prober;

/// Result of one probing round.
///
/// Recomputed every round, never accumulated across rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundAverage {
    /// Mean round-trip time in milliseconds, truncated toward zero.
    /// `0` when no host succeeded.
    pub average_ms: u64,
    /// Number of countable probe outcomes in this round.
    pub successes: usize,
}

/// Probe every host concurrently and reduce to one round average.
///
/// Waits for all probes to complete before producing a result; a failing or
/// timed-out host never aborts the round, it simply contributes nothing to
/// the mean. Total round latency is bounded by the slowest probe, not the
/// sum of all probes.
///
/// Returns `None` if `cancel` fires before the round completes; remaining
/// probes are abandoned and nothing should be published for the round.
pub async fn probe_round<P>(
    prober: &Arc<P>,
    hosts: &[HostAddress],
    timeout: Duration,
    cancel: &CancellationToken,
) -> Option<RoundAverage>
where
    P: Prober + ?Sized,
{
    if cancel.is_cancelled() {
        return None;
    }

    let mut probes = JoinSet::new();
    for host in hosts {
        let prober = Arc::clone(prober);
        let host = host.clone();
        probes.spawn(async move { prober.probe(&host, timeout).await });
    }

    let mut total_ms: u64 = 0;
    let mut successes: usize = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                probes.abort_all();
                tracing::debug!("Probe round cancelled, abandoning remaining probes");
                return None;
            }
            joined = probes.join_next() => match joined {
                Some(Ok(outcome)) => {
                    if let Some(ms) = outcome.round_trip_ms() {
                        total_ms += ms;
                        successes += 1;
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Probe task failed to complete");
                }
                None => break,
            }
        }
    }

    let average_ms = if successes > 0 {
        total_ms / successes as u64
    } else {
        0
    };

    Some(RoundAverage {
        average_ms,
        successes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeOutcome;
    use std::collections::HashMap;

    /// A scripted prober returning a fixed outcome per host.
    struct MockProber {
        outcomes: HashMap<String, ProbeOutcome>,
    }

    impl MockProber {
        fn new(entries: &[(&str, ProbeOutcome)]) -> Arc<Self> {
            Arc::new(Self {
                outcomes: entries
                    .iter()
                    .map(|(host, outcome)| (host.to_string(), outcome.clone()))
                    .collect(),
            })
        }
    }

    #[async_trait::async_trait]
    impl Prober for MockProber {
        async fn probe(&self, host: &HostAddress, _timeout: Duration) -> ProbeOutcome {
            self.outcomes
                .get(host.as_str())
                .cloned()
                .unwrap_or(ProbeOutcome::TimedOut)
        }
    }

    fn hosts(addrs: &[&str]) -> Vec<HostAddress> {
        addrs.iter().map(|a| HostAddress::new(a).unwrap()).collect()
    }

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_round_mean_is_truncated() {
        let prober = MockProber::new(&[
            ("1.1.1.1", ProbeOutcome::Success { round_trip_ms: 20 }),
            ("4.2.2.2", ProbeOutcome::Success { round_trip_ms: 30 }),
        ]);
        let cancel = CancellationToken::new();

        let round = probe_round(&prober, &hosts(&["1.1.1.1", "4.2.2.2"]), TIMEOUT, &cancel)
            .await
            .unwrap();
        assert_eq!(round.average_ms, 25);
        assert_eq!(round.successes, 2);
    }

    #[tokio::test]
    async fn test_round_mean_truncates_toward_zero() {
        let prober = MockProber::new(&[
            ("a.example", ProbeOutcome::Success { round_trip_ms: 20 }),
            ("b.example", ProbeOutcome::Success { round_trip_ms: 31 }),
        ]);
        let cancel = CancellationToken::new();

        let round = probe_round(&prober, &hosts(&["a.example", "b.example"]), TIMEOUT, &cancel)
            .await
            .unwrap();
        // 51 / 2 = 25.5, truncated
        assert_eq!(round.average_ms, 25);
    }

    #[tokio::test]
    async fn test_all_failures_yield_zero_sentinel() {
        let prober = MockProber::new(&[
            ("10.255.255.1", ProbeOutcome::TimedOut),
            (
                "10.255.255.2",
                ProbeOutcome::Failed {
                    reason: "unreachable".to_string(),
                },
            ),
        ]);
        let cancel = CancellationToken::new();

        let round = probe_round(
            &prober,
            &hosts(&["10.255.255.1", "10.255.255.2"]),
            TIMEOUT,
            &cancel,
        )
        .await
        .unwrap();
        assert_eq!(round.average_ms, 0);
        assert_eq!(round.successes, 0);
    }

    #[tokio::test]
    async fn test_failures_excluded_from_mean() {
        let prober = MockProber::new(&[
            ("1.1.1.1", ProbeOutcome::Success { round_trip_ms: 40 }),
            ("10.255.255.1", ProbeOutcome::TimedOut),
            (
                "10.255.255.2",
                ProbeOutcome::Failed {
                    reason: "no route".to_string(),
                },
            ),
        ]);
        let cancel = CancellationToken::new();

        let round = probe_round(
            &prober,
            &hosts(&["1.1.1.1", "10.255.255.1", "10.255.255.2"]),
            TIMEOUT,
            &cancel,
        )
        .await
        .unwrap();
        assert_eq!(round.average_ms, 40);
        assert_eq!(round.successes, 1);
    }

    #[tokio::test]
    async fn test_skewed_replies_excluded_from_mean() {
        let prober = MockProber::new(&[
            ("1.1.1.1", ProbeOutcome::Success { round_trip_ms: 20 }),
            (
                "slow.example",
                ProbeOutcome::Skewed {
                    round_trip_ms: 1500,
                },
            ),
        ]);
        let cancel = CancellationToken::new();

        let round = probe_round(&prober, &hosts(&["1.1.1.1", "slow.example"]), TIMEOUT, &cancel)
            .await
            .unwrap();
        // Skew counts toward neither numerator nor denominator.
        assert_eq!(round.average_ms, 20);
        assert_eq!(round.successes, 1);
    }

    #[tokio::test]
    async fn test_empty_host_list() {
        let prober = MockProber::new(&[]);
        let cancel = CancellationToken::new();

        let round = probe_round(&prober, &[], TIMEOUT, &cancel).await.unwrap();
        assert_eq!(round.average_ms, 0);
        assert_eq!(round.successes, 0);
    }

    #[tokio::test]
    async fn test_cancelled_round_produces_nothing() {
        let prober = MockProber::new(&[(
            "1.1.1.1",
            ProbeOutcome::Success { round_trip_ms: 20 },
        )]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let round = probe_round(&prober, &hosts(&["1.1.1.1"]), TIMEOUT, &cancel).await;
        assert!(round.is_none());
    }
}
