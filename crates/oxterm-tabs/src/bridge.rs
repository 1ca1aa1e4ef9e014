//! Native tab bridge
//!
//! Asks the desktop environment, over its D-Bus command-line helper, to
//! materialize a new window grouped as a tab with the caller's window.
//! Every request is a single one-shot call bounded by the bridge timeout;
//! on any failure the coordinator falls back to an internal window and
//! must not retry the bridge within the same user action.

use thiserror::Error;

use oxterm_ui::WindowId;

use crate::config::TabsConfig;
use crate::desktop::DesktopEnvironment;
use crate::exec::{HelperTransport, TransportError};

/// Errors from a native tab request. All variants are non-fatal: the
/// caller absorbs them and falls back to an internal window.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("desktop environment did not respond within the deadline")]
    Timeout,

    #[error("bridge helper invocation failed: {0}")]
    ToolInvocationFailed(String),

    #[error("unexpected bridge response: {0}")]
    UnexpectedResponse(String),
}

/// Issues native tab requests through a helper transport.
pub struct NativeTabBridge<T: HelperTransport> {
    transport: T,
    config: TabsConfig,
}

impl<T: HelperTransport> NativeTabBridge<T> {
    pub fn new(transport: T, config: TabsConfig) -> Self {
        Self { transport, config }
    }

    /// Request a window grouped as a tab with `origin`. Returns the id of
    /// the window the desktop environment created.
    pub fn request_native_tab(
        &self,
        env: DesktopEnvironment,
        helper: &str,
        origin: WindowId,
    ) -> Result<WindowId, BridgeError> {
        let (program, args) = match env {
            DesktopEnvironment::Gnome => build_gnome_command(helper),
            DesktopEnvironment::Kde => build_kde_command(helper, origin),
            DesktopEnvironment::Unknown => {
                // Guarded by the availability probe; reaching here means
                // the caller skipped it.
                return Err(BridgeError::ToolInvocationFailed(
                    "no bridge for unknown desktop".to_string(),
                ));
            }
        };

        log::debug!("Requesting native tab via '{}' for window {}", program, origin);

        let output = self
            .transport
            .invoke(&program, &args, self.config.bridge_timeout())
            .map_err(|e| match e {
                TransportError::Timeout(_) => BridgeError::Timeout,
                other => BridgeError::ToolInvocationFailed(other.to_string()),
            })?;

        if !output.success {
            return Err(BridgeError::ToolInvocationFailed(
                output.stderr.trim().to_string(),
            ));
        }

        let parsed = match env {
            DesktopEnvironment::Gnome => parse_gnome_response(&output.stdout),
            _ => parse_kde_response(&output.stdout),
        };

        parsed.ok_or_else(|| BridgeError::UnexpectedResponse(output.stdout.trim().to_string()))
    }
}

/// Build the gdbus invocation for GNOME Shell. The shell groups the new
/// window with the focused one, so the origin window id is implicit.
pub fn build_gnome_command(helper: &str) -> (String, Vec<String>) {
    (
        helper.to_string(),
        vec![
            "call".to_string(),
            "--session".to_string(),
            "--dest".to_string(),
            "org.gnome.Shell".to_string(),
            "--object-path".to_string(),
            "/org/gnome/Shell".to_string(),
            "--method".to_string(),
            "org.gnome.Shell.Eval".to_string(),
            "global.display.focus_window && global.display.focus_window.new_tab()".to_string(),
        ],
    )
}

/// Build the qdbus invocation for KWin, passing the origin window id so
/// the new window joins its tab group.
pub fn build_kde_command(helper: &str, origin: WindowId) -> (String, Vec<String>) {
    (
        helper.to_string(),
        vec![
            "org.kde.KWin".to_string(),
            "/KWin".to_string(),
            "org.kde.KWin.newTabbedWindow".to_string(),
            origin.to_string(),
        ],
    )
}

/// Parse a GNOME Shell Eval response of the form `(true, '<id>')`.
/// An Eval that ran but produced no window id is still a failure.
fn parse_gnome_response(stdout: &str) -> Option<WindowId> {
    let trimmed = stdout.trim();
    if !trimmed.starts_with("(true,") {
        return None;
    }

    let start = trimmed.find('\'')?;
    let end = trimmed.rfind('\'')?;
    if end <= start {
        return None;
    }

    trimmed[start + 1..end].trim().parse().ok().map(WindowId)
}

/// Parse a KWin response: a bare decimal window id on stdout.
fn parse_kde_response(stdout: &str) -> Option<WindowId> {
    stdout.trim().parse().ok().map(WindowId)
}
