pub mod gamepad;
pub mod lifecycle;
pub mod types;

pub use lifecycle::{ControllerLifecycleManager, ControllerState};
pub use types::{ControllerEvent, DeviceId, Transition};

use crate::error::MapperError;

/// An opened controller. Dropping the handle releases the device.
pub trait Controller: Send {
    fn device_id(&self) -> DeviceId;

    /// Human-readable device name, for display only
    fn name(&self) -> &str;

    fn button_count(&self) -> usize;
}

/// Opens devices announced by the input layer.
pub trait DeviceOpener {
    fn open(&mut self, device_id: DeviceId) -> Result<Box<dyn Controller>, MapperError>;
}

/// Source of raw controller notifications.
pub trait InputLayer: DeviceOpener {
    /// Drain every notification received since the last poll, oldest first
    fn poll_events(&mut self) -> Result<Vec<ControllerEvent>, MapperError>;
}
