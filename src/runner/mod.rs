//! Test-sequence orchestration
//!
//! Fetches display identities and the mode catalog once, runs every probe
//! in order, and threads the [`LinkReport`] value through each step. Each
//! probe degrades its own record on collaborator failure, so the run always
//! reaches the quality verdict.

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::config::Config;
use crate::display::DisplayEnumerator;
use crate::probes::{
    bandwidth, refresh, resolution, stability::StabilitySampler, STANDARD_REFRESH_RATES,
    STANDARD_RESOLUTIONS,
};
use crate::report::LinkReport;

/// Runs the full probe sequence.
pub struct LinkTester {
    config: Config,
}

impl LinkTester {
    /// Tester over a validated configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Execute the run and return the finalized report.
    pub async fn run(
        &self,
        enumerator: &dyn DisplayEnumerator,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> LinkReport {
        let mut report = LinkReport::new(platform(), os_version());

        info!(backend = enumerator.name(), "detecting connected displays");
        match enumerator.list_connected_displays().await {
            Ok(displays) => {
                info!(count = displays.len(), "displays detected");
                report.displays = displays;
            }
            Err(err) => {
                warn!(%err, "display detection failed");
                report.note(format!("display detection unavailable: {err}"));
            }
        }

        let modes = match enumerator.list_available_modes().await {
            Ok(modes) => {
                info!(count = modes.len(), "mode catalog fetched");
                modes
            }
            Err(err) => {
                warn!(%err, "mode enumeration failed");
                report.note(format!("mode enumeration unavailable: {err}"));
                Vec::new()
            }
        };
        if modes.is_empty() {
            report.note(
                "no display modes reported; resolution and refresh probes will show unsupported",
            );
        }

        report.record(resolution::evaluate(&modes, &STANDARD_RESOLUTIONS));
        report.record(refresh::evaluate(&modes, &STANDARD_REFRESH_RATES));
        report.record(bandwidth::evaluate());

        if self.config.stability.enabled {
            let sampler = StabilitySampler::new();
            report.record(
                sampler
                    .run(self.config.stability.duration_seconds, enumerator, shutdown)
                    .await,
            );
        } else {
            info!("stability sampling disabled");
        }

        report.finalize();
        info!(quality = %report.overall_quality, tests = report.tests.len(), "run complete");
        report
    }
}

/// OS family, e.g. `"Linux"`.
pub fn platform() -> String {
    let os = std::env::consts::OS;
    let mut chars = os.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => os.to_string(),
    }
}

/// OS release description: `/etc/os-release` pretty name, falling back to
/// the kernel version from `/proc/version`.
pub fn os_version() -> String {
    if let Ok(release) = std::fs::read_to_string("/etc/os-release") {
        for line in release.lines() {
            if let Some(value) = line.strip_prefix("PRETTY_NAME=") {
                return value.trim_matches('"').to_string();
            }
        }
    }

    std::fs::read_to_string("/proc/version")
        .ok()
        .and_then(|version| version.split_whitespace().nth(2).map(String::from))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::display::{DisplayIdentity, DisplayMode, EnumerationError};
    use crate::report::Quality;

    struct MockEnumerator {
        displays: Vec<DisplayIdentity>,
        modes: Vec<DisplayMode>,
        fail: bool,
    }

    impl MockEnumerator {
        fn healthy() -> Self {
            let mode = |width_px, height_px, refresh_hz| DisplayMode {
                width_px,
                height_px,
                refresh_hz,
                bits_per_pixel: None,
            };
            Self {
                displays: vec![DisplayIdentity {
                    friendly_name: "Mock Monitor".to_string(),
                    ..DisplayIdentity::default()
                }],
                modes: vec![mode(1920, 1080, 60), mode(1920, 1080, 144), mode(3840, 2160, 60)],
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                displays: Vec::new(),
                modes: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl DisplayEnumerator for MockEnumerator {
        async fn list_connected_displays(&self) -> Result<Vec<DisplayIdentity>, EnumerationError> {
            if self.fail {
                return Err(EnumerationError::Unavailable("mock failure".to_string()));
            }
            Ok(self.displays.clone())
        }

        async fn list_available_modes(&self) -> Result<Vec<DisplayMode>, EnumerationError> {
            if self.fail {
                return Err(EnumerationError::Unavailable("mock failure".to_string()));
            }
            Ok(self.modes.clone())
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    fn test_config(stability_enabled: bool) -> Config {
        let mut config = Config::default();
        config.stability.enabled = stability_enabled;
        config.stability.duration_seconds = 1;
        config
    }

    #[tokio::test]
    async fn test_full_run_is_excellent() {
        let (_tx, mut rx) = broadcast::channel(1);
        let tester = LinkTester::new(test_config(true));
        let report = tester.run(&MockEnumerator::healthy(), &mut rx).await;

        assert_eq!(report.tests.len(), 4);
        assert_eq!(report.overall_quality, Quality::Excellent);
        assert_eq!(report.displays.len(), 1);
        assert!(report.notes.is_empty());
    }

    #[tokio::test]
    async fn test_stability_disabled_skips_sampler() {
        let (_tx, mut rx) = broadcast::channel(1);
        let tester = LinkTester::new(test_config(false));
        let report = tester.run(&MockEnumerator::healthy(), &mut rx).await;

        assert_eq!(report.tests.len(), 3);
        assert_eq!(report.overall_quality, Quality::Excellent);
    }

    #[tokio::test]
    async fn test_collaborator_failure_degrades_not_aborts() {
        let (_tx, mut rx) = broadcast::channel(1);
        let tester = LinkTester::new(test_config(false));
        let report = tester.run(&MockEnumerator::failing(), &mut rx).await;

        // The run still reaches the verdict with degraded records and notes
        assert_eq!(report.tests.len(), 3);
        assert_eq!(report.overall_quality, Quality::Excellent);
        assert!(report
            .notes
            .iter()
            .any(|note| note.contains("display detection unavailable")));
        assert!(report
            .notes
            .iter()
            .any(|note| note.contains("mode enumeration unavailable")));
        assert!(report.displays.is_empty());
    }
}
