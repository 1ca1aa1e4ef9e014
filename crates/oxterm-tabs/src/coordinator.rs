//! Fallback coordinator
//!
//! Decides, per tab action, whether the desktop environment or the
//! internal registry services a request. The decision is a straight-line
//! one-shot: classify, probe, attempt the bridge at most once, then fall
//! back to a plain window. A user asking for a new tab always ends up
//! with a usable terminal session; the only failure that surfaces is the
//! windowing backend itself refusing to create a window.

use thiserror::Error;

use oxterm_ui::{TabAction, WindowBackend, WindowError, WindowId};

use crate::bridge::NativeTabBridge;
use crate::config::TabsConfig;
use crate::desktop::DesktopEnvironment;
use crate::exec::HelperTransport;
use crate::probe::{BridgeAvailability, BridgeProber};
use crate::registry::{GroupId, RegistryError, TabOrigin, TabRegistry};

/// Errors the coordinator surfaces to its caller. Bridge failures are
/// deliberately absent: they are absorbed and logged, never raised.
#[derive(Debug, Error)]
pub enum TabsError {
    /// The windowing backend could not create a window. Fatal to this
    /// action only; not retried.
    #[error("could not open a new terminal window: {0}")]
    WindowCreationFailed(#[from] WindowError),

    /// Caller passed a group id that no longer resolves
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result of a tab action, for the host to focus/present windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabOutcome {
    pub group: GroupId,
    pub window: WindowId,
    pub index: usize,
    pub origin: TabOrigin,
}

/// Orchestrates tab actions across the native and internal backends.
pub struct TabCoordinator<W, T>
where
    W: WindowBackend,
    T: HelperTransport + Clone,
{
    backend: W,
    registry: TabRegistry,
    prober: BridgeProber<T>,
    bridge: NativeTabBridge<T>,
    env: Option<DesktopEnvironment>,
}

impl<W, T> TabCoordinator<W, T>
where
    W: WindowBackend,
    T: HelperTransport + Clone,
{
    pub fn new(backend: W, transport: T, config: TabsConfig) -> Self {
        Self {
            backend,
            registry: TabRegistry::new(),
            prober: BridgeProber::new(transport.clone(), config.clone()),
            bridge: NativeTabBridge::new(transport, config),
            env: None,
        }
    }

    /// Coordinator that pins the classification instead of reading the
    /// process environment. The session kind cannot change mid-run.
    pub fn with_environment(
        backend: W,
        transport: T,
        config: TabsConfig,
        env: DesktopEnvironment,
    ) -> Self {
        let mut coordinator = Self::new(backend, transport, config);
        coordinator.env = Some(env);
        coordinator
    }

    fn environment(&self) -> DesktopEnvironment {
        self.env.unwrap_or_else(DesktopEnvironment::detect)
    }

    /// Open a new tab. With an origin group the new window joins it,
    /// natively when the desktop environment cooperates; without one a
    /// fresh group is created around an internal window.
    pub fn new_tab(&mut self, origin: Option<GroupId>, title: &str) -> Result<TabOutcome, TabsError> {
        let Some(group) = origin else {
            let window = self.backend.create_window()?;
            let group = self.registry.create_group(window, title, TabOrigin::Internal);
            return Ok(TabOutcome {
                group,
                window,
                index: 0,
                origin: TabOrigin::Internal,
            });
        };

        // Validate the group before creating anything
        if !self.registry.contains(group) {
            return Err(RegistryError::UnknownGroup(group).into());
        }

        if let Some(window) = self.try_native_tab(group) {
            let index = self.registry.add_tab(group, window, title, TabOrigin::Native)?;
            log::info!("Opened native tab {} in group {}", window, group);
            return Ok(TabOutcome {
                group,
                window,
                index,
                origin: TabOrigin::Native,
            });
        }

        // Fallback path: plain window tracked internally
        let window = self.backend.create_window()?;
        self.backend.set_window_group_hint(window, group.0);
        let index = self.registry.add_tab(group, window, title, TabOrigin::Internal)?;
        log::info!("Opened internal tab {} in group {}", window, group);
        Ok(TabOutcome {
            group,
            window,
            index,
            origin: TabOrigin::Internal,
        })
    }

    /// One-shot native attempt. Returns the new window on success; every
    /// failure is absorbed here and only manifests as the fallback.
    fn try_native_tab(&mut self, group: GroupId) -> Option<WindowId> {
        let env = self.environment();
        let helper = match self.prober.probe(env) {
            BridgeAvailability::Available { helper } => helper,
            BridgeAvailability::Unavailable(_) => return None,
        };

        let origin_window = self.registry.active_window(group)?;
        match self.bridge.request_native_tab(env, &helper, origin_window) {
            Ok(window) => Some(window),
            Err(e) => {
                log::warn!("Native tab request failed ({}), falling back", e);
                None
            }
        }
    }

    /// Apply a navigation action. Dead windows are pruned first so a
    /// vanished window is dropped rather than selected.
    pub fn navigate(&mut self, group: GroupId, action: TabAction) -> Result<TabOutcome, TabsError> {
        self.registry.prune_missing(group, &self.backend)?;
        if !self.registry.contains(group) {
            return Err(RegistryError::UnknownGroup(group).into());
        }

        match action {
            TabAction::NextTab => self.registry.select_next(group)?,
            TabAction::PreviousTab => self.registry.select_previous(group)?,
            TabAction::SelectTab(n) => self.registry.select_index(group, n as usize)?,
            TabAction::LastTab => self.registry.select_last(group)?,
            TabAction::NewTab => {
                return self.new_tab(Some(group), "Terminal");
            }
        }

        // Non-empty group: the accessors below cannot miss
        let window = self
            .registry
            .active_window(group)
            .ok_or(RegistryError::UnknownGroup(group))?;
        let index = self
            .registry
            .active_index(group)
            .ok_or(RegistryError::UnknownGroup(group))?;
        let origin = self
            .registry
            .active_origin(group)
            .ok_or(RegistryError::UnknownGroup(group))?;

        Ok(TabOutcome {
            group,
            window,
            index,
            origin,
        })
    }

    /// Remove the tab for a closed window, reporting group destruction
    pub fn window_closed(&mut self, group: GroupId, window: WindowId) -> Result<bool, TabsError> {
        let removal = self.registry.remove_tab(group, window)?;
        Ok(removal == crate::registry::Removal::GroupDestroyed)
    }

    /// Title of the active tab in a group
    pub fn active_title(&self, group: GroupId) -> Option<&str> {
        self.registry.active_title(group)
    }

    /// Number of tabs in a group
    pub fn size(&self, group: GroupId) -> usize {
        self.registry.size(group)
    }

    /// Update a tab's title from the terminal
    pub fn set_title(&mut self, group: GroupId, window: WindowId, title: &str) -> Result<(), TabsError> {
        self.registry.set_title(group, window, title)?;
        Ok(())
    }
}
