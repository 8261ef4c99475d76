//! sysfs DRM display backend
//!
//! Reads connector status and EDID blobs from `/sys/class/drm`. Works
//! without a display server, which makes it the fallback for headless or
//! console sessions. The kernel does not expose refresh rates through the
//! connector `modes` file, so this backend reports an empty mode catalog
//! and is mainly useful for identity snapshots and connection polling.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::{edid, DisplayEnumerator, DisplayIdentity, DisplayMode, EnumerationError};

/// Backend reading `/sys/class/drm` connector state.
#[derive(Debug)]
pub struct DrmEnumerator {
    root: PathBuf,
}

impl Default for DrmEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DrmEnumerator {
    /// Backend over the standard sysfs location.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/sys/class/drm"),
        }
    }

    #[cfg(test)]
    fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Connector directories, e.g. `card0-HDMI-A-1`.
    fn connectors(&self) -> Result<Vec<PathBuf>, EnumerationError> {
        let mut connectors = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with("card") && name.contains('-') {
                connectors.push(entry.path());
            }
        }
        connectors.sort();
        Ok(connectors)
    }
}

#[async_trait]
impl DisplayEnumerator for DrmEnumerator {
    async fn list_connected_displays(&self) -> Result<Vec<DisplayIdentity>, EnumerationError> {
        let mut displays = Vec::new();

        for connector in self.connectors()? {
            let status = fs::read_to_string(connector.join("status")).unwrap_or_default();
            if status.trim() != "connected" {
                continue;
            }

            let name = connector
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            // Strip the "cardN-" prefix for the user-facing name
            let port = name
                .split_once('-')
                .map_or(name.clone(), |(_, rest)| rest.to_string());

            let mut identity = match fs::read(connector.join("edid")) {
                Ok(bytes) if !bytes.is_empty() => {
                    edid::parse_identity(&bytes).unwrap_or_else(|err| {
                        debug!(connector = %name, %err, "EDID parse failed");
                        DisplayIdentity::default()
                    })
                }
                _ => DisplayIdentity::default(),
            };
            if identity.friendly_name.is_empty() {
                identity.friendly_name = port;
            }
            displays.push(identity);
        }

        Ok(displays)
    }

    async fn list_available_modes(&self) -> Result<Vec<DisplayMode>, EnumerationError> {
        // The sysfs `modes` file lists resolutions without refresh rates,
        // which is not enough to build a usable mode entry.
        debug!("sysfs DRM backend reports no refresh rates, returning empty mode catalog");
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "drm-sysfs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_sysfs(label: &str, connectors: &[(&str, &str, &[u8])]) -> tempdir::FakeRoot {
        tempdir::FakeRoot::new(label, connectors)
    }

    /// Minimal temp-dir helper; avoids a dev-dependency for three tests.
    mod tempdir {
        use std::fs;
        use std::path::PathBuf;

        pub struct FakeRoot {
            pub path: PathBuf,
        }

        impl FakeRoot {
            pub fn new(label: &str, connectors: &[(&str, &str, &[u8])]) -> Self {
                let path = std::env::temp_dir().join(format!(
                    "hdmi-linkcheck-drm-test-{}-{label}",
                    std::process::id()
                ));
                let _ = fs::remove_dir_all(&path);
                for (name, status, edid) in connectors {
                    let dir = path.join(name);
                    fs::create_dir_all(&dir).unwrap();
                    fs::write(dir.join("status"), status).unwrap();
                    if !edid.is_empty() {
                        fs::write(dir.join("edid"), edid).unwrap();
                    }
                }
                Self { path }
            }
        }

        impl Drop for FakeRoot {
            fn drop(&mut self) {
                let _ = fs::remove_dir_all(&self.path);
            }
        }
    }

    #[tokio::test]
    async fn test_connected_connectors_only() {
        let root = fake_sysfs(
            "connected-only",
            &[
                ("card0-HDMI-A-1", "connected\n", &[]),
                ("card0-DP-1", "disconnected\n", &[]),
            ],
        );
        let backend = DrmEnumerator::with_root(root.path.clone());
        let displays = backend.list_connected_displays().await.unwrap();
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].friendly_name, "HDMI-A-1");
    }

    #[tokio::test]
    async fn test_invalid_edid_degrades_to_port_name() {
        let root = fake_sysfs("bad-edid", &[("card1-HDMI-A-2", "connected\n", b"garbage".as_slice())]);
        let backend = DrmEnumerator::with_root(root.path.clone());
        let displays = backend.list_connected_displays().await.unwrap();
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].friendly_name, "HDMI-A-2");
        assert!(displays[0].manufacturer.is_empty());
    }

    #[tokio::test]
    async fn test_empty_mode_catalog() {
        let root = fake_sysfs("empty-modes", &[("card0-HDMI-A-1", "connected\n", &[])]);
        let backend = DrmEnumerator::with_root(root.path.clone());
        assert!(backend.list_available_modes().await.unwrap().is_empty());
    }
}
