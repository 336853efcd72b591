use std::collections::VecDeque;

use gilrs::{Button as GilrsButton, Event, EventType, GamepadId, Gilrs};
use log::{debug, trace};

use super::{Controller, ControllerEvent, DeviceId, DeviceOpener, InputLayer};
use crate::error::MapperError;

/// Physical button order; a button's position here is its store index.
pub const BUTTON_ORDER: [GilrsButton; 19] = [
    GilrsButton::South,
    GilrsButton::East,
    GilrsButton::North,
    GilrsButton::West,
    GilrsButton::C,
    GilrsButton::Z,
    GilrsButton::LeftTrigger,
    GilrsButton::LeftTrigger2,
    GilrsButton::RightTrigger,
    GilrsButton::RightTrigger2,
    GilrsButton::Select,
    GilrsButton::Start,
    GilrsButton::Mode,
    GilrsButton::LeftThumb,
    GilrsButton::RightThumb,
    GilrsButton::DPadUp,
    GilrsButton::DPadDown,
    GilrsButton::DPadLeft,
    GilrsButton::DPadRight,
];

pub const BUTTON_COUNT: usize = BUTTON_ORDER.len();

/// Store index of a gilrs button, `None` for buttons gilrs can't name
pub fn button_index(button: GilrsButton) -> Option<usize> {
    BUTTON_ORDER.iter().position(|b| *b == button)
}

fn device_id(id: GamepadId) -> DeviceId {
    DeviceId(usize::from(id))
}

/// A gamepad opened through gilrs.
pub struct GamepadController {
    device_id: DeviceId,
    name: String,
}

impl Controller for GamepadController {
    fn device_id(&self) -> DeviceId {
        self.device_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn button_count(&self) -> usize {
        BUTTON_COUNT
    }
}

/// gilrs-backed input layer.
///
/// Gamepads that are already plugged in when the layer starts are reported
/// as attached on the first poll.
pub struct GamepadInput {
    gilrs: Gilrs,
    pending: VecDeque<ControllerEvent>,
}

impl GamepadInput {
    pub fn new() -> Result<Self, MapperError> {
        let gilrs = Gilrs::new().map_err(|e| MapperError::InputUnavailable(e.to_string()))?;

        let pending = gilrs
            .gamepads()
            .map(|(id, gamepad)| {
                debug!("Found gamepad {:?}: {}", id, gamepad.name());
                ControllerEvent::Attached {
                    device_id: device_id(id),
                    button_count: BUTTON_COUNT,
                }
            })
            .collect();

        Ok(Self { gilrs, pending })
    }

    /// Display name of a connected gamepad
    pub fn device_name(&self, device: DeviceId) -> Option<String> {
        self.gilrs
            .gamepads()
            .find(|(id, _)| device_id(*id) == device)
            .map(|(_, gamepad)| gamepad.name().to_string())
    }

    /// Names of every connected gamepad with their ids
    pub fn connected(&self) -> Vec<(DeviceId, String)> {
        self.gilrs
            .gamepads()
            .map(|(id, gamepad)| (device_id(id), gamepad.name().to_string()))
            .collect()
    }

    fn translate(event: EventType, id: GamepadId) -> Option<ControllerEvent> {
        match event {
            EventType::Connected => Some(ControllerEvent::Attached {
                device_id: device_id(id),
                button_count: BUTTON_COUNT,
            }),
            EventType::Disconnected => Some(ControllerEvent::Detached {
                device_id: device_id(id),
            }),
            EventType::ButtonPressed(button, _) => {
                button_index(button).map(|button| ControllerEvent::ButtonPressed {
                    device_id: device_id(id),
                    button,
                })
            }
            EventType::ButtonReleased(button, _) => {
                button_index(button).map(|button| ControllerEvent::ButtonReleased {
                    device_id: device_id(id),
                    button,
                })
            }
            _ => None,
        }
    }
}

impl DeviceOpener for GamepadInput {
    fn open(&mut self, device: DeviceId) -> Result<Box<dyn Controller>, MapperError> {
        let name = self
            .device_name(device)
            .ok_or_else(|| MapperError::controller_unavailable(device, "not connected"))?;

        Ok(Box::new(GamepadController {
            device_id: device,
            name,
        }))
    }
}

impl InputLayer for GamepadInput {
    fn poll_events(&mut self) -> Result<Vec<ControllerEvent>, MapperError> {
        let mut events: Vec<ControllerEvent> = self.pending.drain(..).collect();

        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            trace!("gilrs {:?}: {:?}", id, event);
            if let Some(translated) = Self::translate(event, id) {
                events.push(translated);
            }
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_indices_follow_table_order() {
        assert_eq!(button_index(GilrsButton::South), Some(0));
        assert_eq!(button_index(GilrsButton::West), Some(3));
        assert_eq!(button_index(GilrsButton::DPadRight), Some(BUTTON_COUNT - 1));
        assert_eq!(button_index(GilrsButton::Unknown), None);
    }

    #[test]
    fn table_has_no_duplicates() {
        for (i, button) in BUTTON_ORDER.iter().enumerate() {
            assert_eq!(button_index(*button), Some(i));
        }
    }
}
