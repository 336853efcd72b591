use thiserror::Error;

use crate::controller::DeviceId;
use crate::midi::TransportError;

/// Errors surfaced by the mapping engine.
///
/// None of these are fatal to the engine: they are reported to the
/// immediate caller or logged, and the next notification is still processed.
#[derive(Debug, Error)]
pub enum MapperError {
    /// A controller or MIDI port could not be opened.
    #[error("device {device} unavailable: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    /// A press or release referenced a button the store was not sized for.
    #[error("button {index} out of range ({len} buttons configured)")]
    OutOfBoundsButton { index: usize, len: usize },

    /// A press or release came from a controller that is not active.
    #[error("controller {0} is not the active controller")]
    InactiveController(DeviceId),

    /// The MIDI transport rejected an encoded message.
    #[error("MIDI send failed: {0}")]
    TransportSendFailure(#[source] TransportError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The input layer itself could not be initialised or polled.
    #[error("input layer unavailable: {0}")]
    InputUnavailable(String),
}

impl MapperError {
    pub fn controller_unavailable(device_id: DeviceId, reason: impl Into<String>) -> Self {
        MapperError::DeviceUnavailable {
            device: format!("controller {}", device_id),
            reason: reason.into(),
        }
    }

    pub fn port_unavailable(index: usize, reason: impl Into<String>) -> Self {
        MapperError::DeviceUnavailable {
            device: format!("MIDI port {}", index),
            reason: reason.into(),
        }
    }
}
