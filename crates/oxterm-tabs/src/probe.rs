//! Bridge tool availability probing
//!
//! Before asking the desktop environment for a native tab we check that
//! the D-Bus helper actually exists and answers a no-op query. The result
//! is cached per classification for the process lifetime: a transient
//! failure is treated as authoritative for this run, trading restart-only
//! staleness for never probing twice on the input path.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::TabsConfig;
use crate::desktop::DesktopEnvironment;
use crate::exec::{HelperTransport, TransportError};

/// Why the native bridge cannot be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The desktop environment has no bridge path at all
    UnsupportedDesktop,
    /// No helper program was found on PATH
    ToolNotFound(String),
    /// A helper exists but did not answer the no-op query
    ProbeFailed(String),
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::UnsupportedDesktop => write!(f, "unsupported desktop"),
            UnavailableReason::ToolNotFound(tool) => write!(f, "tool not found: {}", tool),
            UnavailableReason::ProbeFailed(msg) => write!(f, "probe failed: {}", msg),
        }
    }
}

/// Whether the native bridge can be attempted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeAvailability {
    /// Bridge is usable through the named helper program
    Available { helper: String },
    Unavailable(UnavailableReason),
}

/// Probes for bridge helpers and memoizes the verdict per classification.
pub struct BridgeProber<T: HelperTransport> {
    transport: T,
    config: TabsConfig,
    cache: Mutex<HashMap<DesktopEnvironment, BridgeAvailability>>,
}

impl<T: HelperTransport> BridgeProber<T> {
    pub fn new(transport: T, config: TabsConfig) -> Self {
        Self {
            transport,
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Probe availability for a classification. Never raises; every
    /// failure path resolves to `Unavailable` with a reason.
    pub fn probe(&self, env: DesktopEnvironment) -> BridgeAvailability {
        if let Some(cached) = self.cache.lock().get(&env) {
            return cached.clone();
        }

        let availability = self.probe_uncached(env);
        match &availability {
            BridgeAvailability::Available { helper } => {
                log::info!("Native tab bridge available for {:?} via '{}'", env, helper);
            }
            BridgeAvailability::Unavailable(reason) => {
                log::info!("Native tab bridge unavailable for {:?}: {}", env, reason);
            }
        }
        self.cache.lock().insert(env, availability.clone());
        availability
    }

    fn probe_uncached(&self, env: DesktopEnvironment) -> BridgeAvailability {
        let candidates: Vec<&str> = match env {
            DesktopEnvironment::Gnome => vec![self.config.gnome_helper.as_str()],
            // The Qt D-Bus client ships under different names per distro
            DesktopEnvironment::Kde => {
                self.config.kde_helpers.iter().map(String::as_str).collect()
            }
            DesktopEnvironment::Unknown => {
                return BridgeAvailability::Unavailable(UnavailableReason::UnsupportedDesktop);
            }
        };

        let mut last_failure: Option<UnavailableReason> = None;
        for helper in &candidates {
            match self.check_helper(helper, self.config.probe_timeout()) {
                Ok(()) => {
                    return BridgeAvailability::Available {
                        helper: helper.to_string(),
                    };
                }
                Err(reason) => {
                    log::debug!("Probe of '{}' failed: {}", helper, reason);
                    last_failure = Some(reason);
                }
            }
        }

        BridgeAvailability::Unavailable(last_failure.unwrap_or_else(|| {
            UnavailableReason::ToolNotFound(candidates.join(", "))
        }))
    }

    fn check_helper(&self, helper: &str, timeout: Duration) -> Result<(), UnavailableReason> {
        let args = vec!["--help".to_string()];
        match self.transport.invoke(helper, &args, timeout) {
            Ok(output) if output.success => Ok(()),
            Ok(output) => Err(UnavailableReason::ProbeFailed(format!(
                "'{}' exited unsuccessfully: {}",
                helper,
                output.stderr.trim()
            ))),
            Err(TransportError::NotFound(tool)) => Err(UnavailableReason::ToolNotFound(tool)),
            Err(e) => Err(UnavailableReason::ProbeFailed(e.to_string())),
        }
    }
}
