use std::fmt;

/// Stable identifier the input layer assigns to an attached device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub usize);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Direction of a button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Press,
    Release,
}

/// Raw notifications delivered by the input layer, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    Attached { device_id: DeviceId, button_count: usize },
    Detached { device_id: DeviceId },
    ButtonPressed { device_id: DeviceId, button: usize },
    ButtonReleased { device_id: DeviceId, button: usize },
}
