//! oxterm-ui: UI abstraction layer
//!
//! This crate defines the traits and event types that sit between the
//! tab-management core and the windowing/input backends, allowing
//! different backends (X11, Wayland, test doubles) to plug in.

pub mod events;
pub mod traits;

pub use events::*;
pub use traits::*;
