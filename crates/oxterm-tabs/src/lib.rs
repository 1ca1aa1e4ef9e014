//! oxterm-tabs: Linux tab-group management
//!
//! Linux has no in-process tab UI, so oxterm presents tabs in one of two
//! ways: by asking the desktop environment to group windows natively over
//! D-Bus (GNOME Shell, KWin), or by tracking a group of plain windows
//! itself when native grouping is unavailable or fails. The registry is
//! the single source of truth for navigation either way; the native path
//! only affects how a window gets created.

pub mod bridge;
pub mod config;
pub mod coordinator;
pub mod desktop;
pub mod exec;
pub mod probe;
pub mod registry;

pub use bridge::{BridgeError, NativeTabBridge};
pub use config::TabsConfig;
pub use coordinator::{TabCoordinator, TabOutcome, TabsError};
pub use desktop::DesktopEnvironment;
pub use exec::{HelperOutput, HelperTransport, ProcessTransport, TransportError};
pub use probe::{BridgeAvailability, BridgeProber, UnavailableReason};
pub use registry::{
    GroupId, Removal, RegistryError, SharedTabRegistry, TabHandle, TabOrigin, TabRegistry,
};
