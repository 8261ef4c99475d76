//! Connection stability probe
//!
//! Polls the display enumerator once per second for a caller-chosen
//! duration. A tick reporting zero connected displays fails the test; a
//! tick whose poll errors is recorded and sampling continues. The loop is
//! cancellable: a shutdown signal stops it early and the samples collected
//! so far are kept.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::display::DisplayEnumerator;
use crate::report::{StabilitySample, TestDetails, TestRecord};

/// Record name for this probe.
pub const TEST_NAME: &str = "Signal Stability Test";

/// Timed connection poller.
#[derive(Debug)]
pub struct StabilitySampler {
    tick: Duration,
}

impl Default for StabilitySampler {
    fn default() -> Self {
        Self::new()
    }
}

impl StabilitySampler {
    /// Sampler with the standard one-second tick.
    pub fn new() -> Self {
        Self {
            tick: Duration::from_secs(1),
        }
    }

    /// Poll once per tick, `duration_seconds` times.
    pub async fn run(
        &self,
        duration_seconds: u32,
        enumerator: &dyn DisplayEnumerator,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> TestRecord {
        let timestamp = Utc::now();
        let mut samples = Vec::with_capacity(duration_seconds as usize);
        let mut passed = true;

        info!(duration_seconds, "monitoring connection stability");

        for time_index in 1..=duration_seconds {
            match enumerator.list_connected_displays().await {
                Ok(displays) => {
                    let displays_connected = displays.len() as u32;
                    if displays_connected == 0 {
                        warn!(tick = time_index, "no displays connected");
                        passed = false;
                    }
                    samples.push(StabilitySample::Counted {
                        time_index,
                        displays_connected,
                        stable: displays_connected > 0,
                    });
                }
                Err(err) => {
                    // A failed poll is not a detected disconnection
                    warn!(tick = time_index, %err, "stability poll failed");
                    samples.push(StabilitySample::Failed {
                        time_index,
                        error: err.to_string(),
                    });
                }
            }

            if time_index < duration_seconds {
                tokio::select! {
                    () = tokio::time::sleep(self.tick) => {}
                    _ = shutdown.recv() => {
                        warn!(collected = samples.len(), "stability sampling interrupted, keeping partial samples");
                        break;
                    }
                }
            }
        }

        info!(collected = samples.len(), passed, "stability sampling finished");

        TestRecord {
            test_name: TEST_NAME.to_string(),
            timestamp,
            passed,
            details: TestDetails::Stability {
                duration_seconds,
                samples,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::display::{DisplayIdentity, DisplayMode, EnumerationError};

    /// Scripted enumerator: each poll pops the next display count, `None`
    /// simulating a poll failure.
    struct ScriptedEnumerator {
        counts: Vec<Option<u32>>,
        cursor: AtomicUsize,
    }

    impl ScriptedEnumerator {
        fn new(counts: Vec<Option<u32>>) -> Self {
            Self {
                counts,
                cursor: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DisplayEnumerator for ScriptedEnumerator {
        async fn list_connected_displays(&self) -> Result<Vec<DisplayIdentity>, EnumerationError> {
            let index = self.cursor.fetch_add(1, Ordering::SeqCst);
            match self.counts.get(index).copied().flatten() {
                Some(count) => Ok(vec![DisplayIdentity::default(); count as usize]),
                None => Err(EnumerationError::Unavailable("scripted failure".to_string())),
            }
        }

        async fn list_available_modes(&self) -> Result<Vec<DisplayMode>, EnumerationError> {
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn fast_sampler() -> StabilitySampler {
        StabilitySampler {
            tick: Duration::from_millis(1),
        }
    }

    fn samples(record: &TestRecord) -> &[StabilitySample] {
        match &record.details {
            TestDetails::Stability { samples, .. } => samples,
            other => panic!("unexpected details: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_count_fails_test() {
        let enumerator = ScriptedEnumerator::new(vec![Some(1), Some(1), Some(0)]);
        let (_tx, mut rx) = broadcast::channel(1);
        let record = fast_sampler().run(3, &enumerator, &mut rx).await;

        assert!(!record.passed);
        assert_eq!(
            samples(&record),
            &[
                StabilitySample::Counted { time_index: 1, displays_connected: 1, stable: true },
                StabilitySample::Counted { time_index: 2, displays_connected: 1, stable: true },
                StabilitySample::Counted { time_index: 3, displays_connected: 0, stable: false },
            ]
        );
    }

    #[tokio::test]
    async fn test_poll_failure_does_not_fail_test() {
        let enumerator = ScriptedEnumerator::new(vec![Some(1), None, Some(1)]);
        let (_tx, mut rx) = broadcast::channel(1);
        let record = fast_sampler().run(3, &enumerator, &mut rx).await;

        assert!(record.passed);
        assert!(matches!(
            samples(&record)[1],
            StabilitySample::Failed { time_index: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_shutdown_keeps_partial_samples() {
        let enumerator = ScriptedEnumerator::new(vec![Some(1); 100]);
        let (tx, mut rx) = broadcast::channel(1);
        // Signal already queued: the first inter-sample wait observes it
        tx.send(()).unwrap();

        let sampler = StabilitySampler {
            tick: Duration::from_secs(3600),
        };
        let record = sampler.run(100, &enumerator, &mut rx).await;

        assert_eq!(samples(&record).len(), 1);
        assert!(record.passed);
    }

    #[tokio::test]
    async fn test_full_duration_sample_count() {
        let enumerator = ScriptedEnumerator::new(vec![Some(2); 5]);
        let (_tx, mut rx) = broadcast::channel(1);
        let record = fast_sampler().run(5, &enumerator, &mut rx).await;

        assert_eq!(samples(&record).len(), 5);
        assert!(record.passed);
        assert!(samples(&record).iter().enumerate().all(|(i, sample)| {
            matches!(sample, StabilitySample::Counted { time_index, .. } if *time_index == i as u32 + 1)
        }));
    }
}
