use log::{info, warn};

use super::{Controller, DeviceId, DeviceOpener};
use crate::mapping::ControllerConfigStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    NoController,
    Active,
}

/// Owns the single active controller and the button store sized for it.
///
/// The first attached controller wins: further attach notifications are
/// ignored until it is detached.
#[derive(Default)]
pub struct ControllerLifecycleManager {
    active: Option<Box<dyn Controller>>,
    store: ControllerConfigStore,
}

impl ControllerLifecycleManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ControllerState {
        match self.active {
            Some(_) => ControllerState::Active,
            None => ControllerState::NoController,
        }
    }

    pub fn active_device(&self) -> Option<DeviceId> {
        self.active.as_ref().map(|active| active.device_id())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.name())
    }

    pub fn store(&self) -> &ControllerConfigStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ControllerConfigStore {
        &mut self.store
    }

    /// Install `device_id` as the active controller.
    ///
    /// Returns false, leaving the store untouched, when a controller is
    /// already active or the device fails to open.
    pub fn on_attach<O>(&mut self, opener: &mut O, device_id: DeviceId, button_count: usize) -> bool
    where
        O: DeviceOpener + ?Sized,
    {
        if let Some(active) = &self.active {
            info!(
                "Ignoring controller {}: {} is already active",
                device_id,
                active.device_id()
            );
            return false;
        }

        let handle = match opener.open(device_id) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Failed to open controller {}: {}", device_id, e);
                return false;
            }
        };

        info!(
            "Controller {} attached: \"{}\" ({} buttons)",
            device_id,
            handle.name(),
            button_count
        );
        // The notification's count sizes the store
        if handle.button_count() != button_count {
            warn!(
                "Controller {} reports {} buttons, configuring {}",
                device_id,
                handle.button_count(),
                button_count
            );
        }
        self.store.reset(button_count);
        self.active = Some(handle);
        true
    }

    /// Release the active controller if `device_id` is the one we hold.
    ///
    /// Returns whether anything changed.
    pub fn on_detach(&mut self, device_id: DeviceId) -> bool {
        if self.active_device() != Some(device_id) {
            return false;
        }

        // Dropping the handle closes the device
        if let Some(active) = self.active.take() {
            info!("Controller {} (\"{}\") detached", device_id, active.name());
        }
        self.store.clear();
        true
    }
}
