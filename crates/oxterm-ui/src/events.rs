//! Tab action events
//!
//! Defines the discrete tab actions delivered by the input layer. Raw key
//! codes and binding tables live in the input backend; by the time an
//! event reaches the core it is already one of these.

/// A discrete tab action requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabAction {
    /// Open a new tab in the current group
    NewTab,
    /// Switch to the next tab, wrapping
    NextTab,
    /// Switch to the previous tab, wrapping
    PreviousTab,
    /// Switch to tab n (1-9; 9 means "last")
    SelectTab(u8),
    /// Switch to the last tab
    LastTab,
}

impl TabAction {
    /// Whether this action only moves the active tab (no window creation).
    pub fn is_navigation(&self) -> bool {
        !matches!(self, TabAction::NewTab)
    }
}
