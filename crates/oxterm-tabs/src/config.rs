//! Tab core tunables
//!
//! Timeouts and helper overrides for the native tab path. The host embeds
//! this as one section of its configuration; no file I/O happens here.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for desktop-environment bridging
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Deadline for the availability probe, in milliseconds.
    /// Kept short so a missing tool never causes a visible UI stall.
    pub probe_timeout_ms: u64,
    /// Deadline for the native tab request, in milliseconds.
    /// Real window creation is heavier than the no-op probe.
    pub bridge_timeout_ms: u64,
    /// Helper program for the GNOME path
    pub gnome_helper: String,
    /// Candidate helper programs for the KDE path, tried in order.
    /// Distributions ship the Qt D-Bus client under different names.
    pub kde_helpers: Vec<String>,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 200,
            bridge_timeout_ms: 2000,
            gnome_helper: "gdbus".to_string(),
            kde_helpers: vec![
                "qdbus".to_string(),
                "qdbus6".to_string(),
                "qdbus-qt5".to_string(),
            ],
        }
    }
}

impl TabsConfig {
    /// Probe deadline as a `Duration`
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Bridge deadline as a `Duration`
    pub fn bridge_timeout(&self) -> Duration {
        Duration::from_millis(self.bridge_timeout_ms)
    }
}
