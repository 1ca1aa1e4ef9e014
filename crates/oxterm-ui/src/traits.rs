//! Windowing abstraction traits
//!
//! These traits define the narrow interface the tab core needs from a
//! windowing backend. The backend owns the actual window resources; the
//! core only ever holds `WindowId` references and must tolerate a window
//! disappearing underneath it.

use thiserror::Error;

/// Opaque identifier for an OS-level window, owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from the windowing backend
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("window creation failed: {0}")]
    CreationFailed(String),
}

/// Windowing backend trait - creates and inspects OS windows
pub trait WindowBackend {
    /// Create a new top-level window
    fn create_window(&mut self) -> Result<WindowId, WindowError>;

    /// Check whether a window still exists
    fn window_exists(&self, window: WindowId) -> bool;

    /// Hint to the window system that a window belongs to a group.
    /// Best-effort; backends without the concept may ignore it.
    fn set_window_group_hint(&mut self, window: WindowId, group: u64) {
        let _ = (window, group);
    }
}
