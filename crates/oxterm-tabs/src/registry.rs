//! Internal tab registry
//!
//! The authoritative in-process record of tab groups. Every tab window is
//! registered here regardless of whether the desktop environment or the
//! internal fallback created it, so navigation behaves identically across
//! both paths. The registry only holds window identifiers; the windowing
//! backend owns the windows themselves, and a vanished window is removed
//! rather than dereferenced.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use oxterm_ui::{WindowBackend, WindowId};

/// Global group ID counter
static GROUP_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique group ID
fn next_group_id() -> GroupId {
    GroupId(GROUP_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Stable identifier for a tab group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub u64);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The group id does not resolve (never created, or destroyed).
    /// This is a caller bug, not a runtime condition to swallow.
    #[error("unknown tab group: {0}")]
    UnknownGroup(GroupId),
}

/// Which path created a tab's window. Diagnostics only; no behavior
/// branches on this after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabOrigin {
    /// Grouped natively by the desktop environment
    Native,
    /// Plain window tracked internally
    Internal,
}

/// One member window of a tab group
#[derive(Debug, Clone)]
pub struct TabHandle {
    /// Window identifier, owned by the windowing backend
    pub window: WindowId,
    /// Display title, last-write-wins
    pub title: String,
    /// Creation path
    pub origin: TabOrigin,
}

/// Outcome of removing a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Handle removed, group still has members
    Removed,
    /// The last handle was removed and the group no longer exists;
    /// upstream window-lifecycle cleanup can proceed.
    GroupDestroyed,
}

/// A tab group: an ordered set of handles plus the active index.
/// Invariant: `active` indexes into `tabs` whenever `tabs` is non-empty.
#[derive(Debug)]
struct TabGroup {
    tabs: Vec<TabHandle>,
    active: usize,
}

impl TabGroup {
    fn new(first: TabHandle) -> Self {
        Self {
            tabs: vec![first],
            active: 0,
        }
    }
}

/// Selection sentinel: index 9 means "last tab", not literal position 9.
const LAST_TAB_SENTINEL: usize = 9;

/// Registry behind one coarse mutex, for hosts that mutate tab state from
/// more than the single event-processing context. Tab actions are
/// human-paced, so contention is not a concern.
pub type SharedTabRegistry = std::sync::Arc<parking_lot::Mutex<TabRegistry>>;

/// In-process tab group collection
#[derive(Debug, Default)]
pub struct TabRegistry {
    groups: HashMap<GroupId, TabGroup>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group around its first window. Infallible; the new
    /// handle is active.
    pub fn create_group(&mut self, first_window: WindowId, title: &str, origin: TabOrigin) -> GroupId {
        let id = next_group_id();
        self.groups.insert(
            id,
            TabGroup::new(TabHandle {
                window: first_window,
                title: title.to_string(),
                origin,
            }),
        );
        log::debug!("Created tab group {} with window {}", id, first_window);
        id
    }

    /// Append a tab to a group. The new tab becomes active. Returns its
    /// position in the group.
    pub fn add_tab(
        &mut self,
        group: GroupId,
        window: WindowId,
        title: &str,
        origin: TabOrigin,
    ) -> Result<usize, RegistryError> {
        let g = self.group_mut(group)?;
        g.tabs.push(TabHandle {
            window,
            title: title.to_string(),
            origin,
        });
        g.active = g.tabs.len() - 1;
        Ok(g.active)
    }

    /// Select tab `n` (1-based). Only the first 8 positions are directly
    /// addressable; `n = 9` selects the last tab regardless of group size,
    /// and tabs past the ninth are reached via next/previous. An
    /// out-of-range index is a silent no-op: shortcut navigation must
    /// never surface an error.
    pub fn select_index(&mut self, group: GroupId, n: usize) -> Result<(), RegistryError> {
        let g = self.group_mut(group)?;
        if n == LAST_TAB_SENTINEL {
            g.active = g.tabs.len() - 1;
        } else if (1..LAST_TAB_SENTINEL).contains(&n) && n <= g.tabs.len() {
            g.active = n - 1;
        }
        Ok(())
    }

    /// Advance the active tab, wrapping
    pub fn select_next(&mut self, group: GroupId) -> Result<(), RegistryError> {
        let g = self.group_mut(group)?;
        g.active = (g.active + 1) % g.tabs.len();
        Ok(())
    }

    /// Retreat the active tab, wrapping
    pub fn select_previous(&mut self, group: GroupId) -> Result<(), RegistryError> {
        let g = self.group_mut(group)?;
        g.active = if g.active == 0 {
            g.tabs.len() - 1
        } else {
            g.active - 1
        };
        Ok(())
    }

    /// Activate the last tab
    pub fn select_last(&mut self, group: GroupId) -> Result<(), RegistryError> {
        let g = self.group_mut(group)?;
        g.active = g.tabs.len() - 1;
        Ok(())
    }

    /// Remove the handle referencing `window`. If it was active, the
    /// active index clamps to the new last valid position. Removing the
    /// last handle destroys the group.
    pub fn remove_tab(&mut self, group: GroupId, window: WindowId) -> Result<Removal, RegistryError> {
        let g = self.group_mut(group)?;
        let Some(index) = g.tabs.iter().position(|t| t.window == window) else {
            // Already gone; nothing to do
            return Ok(Removal::Removed);
        };

        g.tabs.remove(index);

        if g.tabs.is_empty() {
            self.groups.remove(&group);
            log::debug!("Tab group {} destroyed", group);
            return Ok(Removal::GroupDestroyed);
        }

        if g.active >= g.tabs.len() {
            g.active = g.tabs.len() - 1;
        } else if g.active > index {
            g.active -= 1;
        }

        Ok(Removal::Removed)
    }

    /// Update a tab's display title, last-write-wins
    pub fn set_title(
        &mut self,
        group: GroupId,
        window: WindowId,
        title: &str,
    ) -> Result<(), RegistryError> {
        let g = self.group_mut(group)?;
        if let Some(tab) = g.tabs.iter_mut().find(|t| t.window == window) {
            tab.title = title.to_string();
        }
        Ok(())
    }

    /// Drop handles whose window no longer exists on the backend.
    /// Returns the removed window ids; the group may be destroyed if
    /// every window vanished.
    pub fn prune_missing<W: WindowBackend>(
        &mut self,
        group: GroupId,
        backend: &W,
    ) -> Result<Vec<WindowId>, RegistryError> {
        let dead: Vec<WindowId> = self
            .group(group)?
            .tabs
            .iter()
            .map(|t| t.window)
            .filter(|w| !backend.window_exists(*w))
            .collect();

        for window in &dead {
            log::warn!("Window {} vanished, dropping its tab from group {}", window, group);
            self.remove_tab(group, *window)?;
            if !self.contains(group) {
                break;
            }
        }

        Ok(dead)
    }

    /// Title of the active tab
    pub fn active_title(&self, group: GroupId) -> Option<&str> {
        let g = self.groups.get(&group)?;
        g.tabs.get(g.active).map(|t| t.title.as_str())
    }

    /// Window of the active tab
    pub fn active_window(&self, group: GroupId) -> Option<WindowId> {
        let g = self.groups.get(&group)?;
        g.tabs.get(g.active).map(|t| t.window)
    }

    /// Active tab position within the group
    pub fn active_index(&self, group: GroupId) -> Option<usize> {
        self.groups.get(&group).map(|g| g.active)
    }

    /// Origin tag of the active tab (diagnostics)
    pub fn active_origin(&self, group: GroupId) -> Option<TabOrigin> {
        let g = self.groups.get(&group)?;
        g.tabs.get(g.active).map(|t| t.origin)
    }

    /// Number of tabs in a group (0 if the group does not resolve)
    pub fn size(&self, group: GroupId) -> usize {
        self.groups.get(&group).map(|g| g.tabs.len()).unwrap_or(0)
    }

    /// Whether a group id still resolves
    pub fn contains(&self, group: GroupId) -> bool {
        self.groups.contains_key(&group)
    }

    fn group(&self, group: GroupId) -> Result<&TabGroup, RegistryError> {
        self.groups
            .get(&group)
            .ok_or(RegistryError::UnknownGroup(group))
    }

    fn group_mut(&mut self, group: GroupId) -> Result<&mut TabGroup, RegistryError> {
        self.groups
            .get_mut(&group)
            .ok_or(RegistryError::UnknownGroup(group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_of(registry: &mut TabRegistry, titles: &[&str]) -> GroupId {
        let group = registry.create_group(WindowId(1), titles[0], TabOrigin::Internal);
        for (i, title) in titles.iter().enumerate().skip(1) {
            registry
                .add_tab(group, WindowId(i as u64 + 1), title, TabOrigin::Internal)
                .unwrap();
        }
        group
    }

    #[test]
    fn test_add_tracks_size_and_active_title() {
        let mut registry = TabRegistry::new();
        let group = registry.create_group(WindowId(1), "first", TabOrigin::Internal);

        for i in 2..=5u64 {
            let title = format!("tab-{}", i);
            registry
                .add_tab(group, WindowId(i), &title, TabOrigin::Internal)
                .unwrap();
            assert_eq!(registry.size(group), i as usize);
            assert_eq!(registry.active_title(group), Some(title.as_str()));
        }
    }

    #[test]
    fn test_select_index_out_of_range_is_noop() {
        let mut registry = TabRegistry::new();
        let group = group_of(&mut registry, &["a", "b", "c"]);

        registry.select_index(group, 2).unwrap();
        assert_eq!(registry.active_index(group), Some(1));

        registry.select_index(group, 5).unwrap();
        assert_eq!(registry.active_index(group), Some(1));

        registry.select_index(group, 0).unwrap();
        assert_eq!(registry.active_index(group), Some(1));
    }

    #[test]
    fn test_select_index_beyond_nine_is_not_addressable() {
        let mut registry = TabRegistry::new();
        let titles: Vec<String> = (1..=12).map(|i| format!("tab-{}", i)).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let group = group_of(&mut registry, &refs);

        registry.select_index(group, 1).unwrap();
        assert_eq!(registry.active_index(group), Some(0));

        // Positions past the ninth exist but are only reachable via
        // next/previous
        registry.select_index(group, 10).unwrap();
        assert_eq!(registry.active_index(group), Some(0));
        registry.select_index(group, 12).unwrap();
        assert_eq!(registry.active_index(group), Some(0));

        registry.select_index(group, 8).unwrap();
        assert_eq!(registry.active_index(group), Some(7));

        // 9 stays the "last" sentinel, not position 9
        registry.select_index(group, 9).unwrap();
        assert_eq!(registry.active_index(group), Some(11));
    }

    #[test]
    fn test_shared_registry_behind_mutex() {
        let shared: SharedTabRegistry =
            std::sync::Arc::new(parking_lot::Mutex::new(TabRegistry::new()));

        let group = shared
            .lock()
            .create_group(WindowId(1), "a", TabOrigin::Internal);

        let worker = std::sync::Arc::clone(&shared);
        std::thread::spawn(move || {
            worker
                .lock()
                .add_tab(group, WindowId(2), "b", TabOrigin::Internal)
                .unwrap();
        })
        .join()
        .unwrap();

        assert_eq!(shared.lock().size(group), 2);
        assert_eq!(shared.lock().active_title(group), Some("b"));
    }

    #[test]
    fn test_select_index_nine_means_last() {
        let mut registry = TabRegistry::new();
        let group = group_of(&mut registry, &["a", "b", "c"]);

        registry.select_index(group, 9).unwrap();
        assert_eq!(registry.active_index(group), Some(2));
    }

    #[test]
    fn test_next_previous_round_trip() {
        let mut registry = TabRegistry::new();
        for titles in [vec!["a"], vec!["a", "b"], vec!["a", "b", "c", "d"]] {
            let group = group_of(&mut registry, &titles);
            for start in 1..=titles.len() {
                registry.select_index(group, start).unwrap();
                let before = registry.active_index(group);
                registry.select_next(group).unwrap();
                registry.select_previous(group).unwrap();
                assert_eq!(registry.active_index(group), before);
            }
        }
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let mut registry = TabRegistry::new();
        let group = group_of(&mut registry, &["a", "b", "c"]);

        registry.select_last(group).unwrap();
        registry.select_next(group).unwrap();
        assert_eq!(registry.active_index(group), Some(0));

        registry.select_previous(group).unwrap();
        assert_eq!(registry.active_index(group), Some(2));
    }

    #[test]
    fn test_single_tab_navigation_is_noop() {
        let mut registry = TabRegistry::new();
        let group = group_of(&mut registry, &["only"]);

        registry.select_next(group).unwrap();
        assert_eq!(registry.active_index(group), Some(0));
        registry.select_previous(group).unwrap();
        assert_eq!(registry.active_index(group), Some(0));
    }

    #[test]
    fn test_select_last() {
        let mut registry = TabRegistry::new();
        let group = group_of(&mut registry, &["a", "b", "c", "d"]);
        registry.select_index(group, 1).unwrap();
        registry.select_last(group).unwrap();
        assert_eq!(registry.active_index(group), Some(3));
    }

    #[test]
    fn test_remove_active_clamps_index() {
        let mut registry = TabRegistry::new();
        let group = group_of(&mut registry, &["a", "b", "c"]);

        // Active is the last tab (window 3); removing it clamps to 1
        assert_eq!(
            registry.remove_tab(group, WindowId(3)).unwrap(),
            Removal::Removed
        );
        assert_eq!(registry.active_index(group), Some(1));
        assert_eq!(registry.active_title(group), Some("b"));
    }

    #[test]
    fn test_remove_before_active_shifts_index() {
        let mut registry = TabRegistry::new();
        let group = group_of(&mut registry, &["a", "b", "c"]);

        registry.select_last(group).unwrap();
        registry.remove_tab(group, WindowId(1)).unwrap();
        assert_eq!(registry.active_index(group), Some(1));
        assert_eq!(registry.active_title(group), Some("c"));
    }

    #[test]
    fn test_remove_last_handle_destroys_group() {
        let mut registry = TabRegistry::new();
        let group = registry.create_group(WindowId(7), "solo", TabOrigin::Internal);

        assert_eq!(
            registry.remove_tab(group, WindowId(7)).unwrap(),
            Removal::GroupDestroyed
        );
        assert!(!registry.contains(group));
        assert_eq!(
            registry.select_next(group),
            Err(RegistryError::UnknownGroup(group))
        );
        assert_eq!(
            registry.add_tab(group, WindowId(8), "late", TabOrigin::Internal),
            Err(RegistryError::UnknownGroup(group))
        );
    }

    #[test]
    fn test_set_title_last_write_wins() {
        let mut registry = TabRegistry::new();
        let group = registry.create_group(WindowId(1), "shell", TabOrigin::Internal);

        registry.set_title(group, WindowId(1), "vim").unwrap();
        registry.set_title(group, WindowId(1), "htop").unwrap();
        assert_eq!(registry.active_title(group), Some("htop"));
    }

    #[test]
    fn test_scenario_two_tabs() {
        let mut registry = TabRegistry::new();
        let group = registry.create_group(WindowId(1), "A", TabOrigin::Internal);
        registry
            .add_tab(group, WindowId(2), "B", TabOrigin::Internal)
            .unwrap();

        assert_eq!(registry.active_title(group), Some("B"));
        assert_eq!(registry.size(group), 2);

        registry.select_previous(group).unwrap();
        assert_eq!(registry.active_title(group), Some("A"));

        registry.select_index(group, 9).unwrap();
        assert_eq!(registry.active_title(group), Some("B"));
    }

    #[test]
    fn test_prune_missing_drops_dead_windows() {
        struct OnlyOdd;
        impl WindowBackend for OnlyOdd {
            fn create_window(&mut self) -> Result<WindowId, oxterm_ui::WindowError> {
                unreachable!("prune never creates windows")
            }
            fn window_exists(&self, window: WindowId) -> bool {
                window.0 % 2 == 1
            }
        }

        let mut registry = TabRegistry::new();
        let group = group_of(&mut registry, &["a", "b", "c"]);

        let dead = registry.prune_missing(group, &OnlyOdd).unwrap();
        assert_eq!(dead, vec![WindowId(2)]);
        assert_eq!(registry.size(group), 2);
        assert!(registry.contains(group));
    }
}
