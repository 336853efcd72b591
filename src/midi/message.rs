use std::fmt;

use crate::controller::Transition;
use crate::mapping::{ButtonConfig, ButtonFunction};

pub const NOTE_ON: u8 = 0x90;
pub const NOTE_OFF: u8 = 0x80;
pub const CONTROL_CHANGE: u8 = 0xB0;

/// Velocity sent with every note on, and the value of a pressed CC button.
pub const PRESS_VELOCITY: u8 = 90;
/// Value sent when a CC button is released.
pub const CONTROL_RELEASE_VALUE: u8 = 0;

/// A 2 or 3 byte channel message: `[status, data1, (data2)]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MidiMessage {
    bytes: [u8; 3],
    len: usize,
}

impl MidiMessage {
    fn two(status: u8, data1: u8) -> Self {
        Self {
            bytes: [status, data1, 0],
            len: 2,
        }
    }

    fn three(status: u8, data1: u8, data2: u8) -> Self {
        Self {
            bytes: [status, data1, data2],
            len: 3,
        }
    }

    pub fn status(&self) -> u8 {
        self.bytes[0]
    }

    /// Zero-based channel carried in the status low nibble
    pub fn channel(&self) -> u8 {
        self.bytes[0] & 0x0F
    }

    pub fn data1(&self) -> u8 {
        self.bytes[1]
    }

    pub fn data2(&self) -> Option<u8> {
        (self.len == 3).then_some(self.bytes[2])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl fmt::Debug for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MidiMessage({:02X?})", self.as_bytes())
    }
}

/// Encode a button transition into its MIDI message.
///
/// Total over every `ButtonConfig`: the channel is added onto the base
/// status nibble, and `ButtonConfig` keeps it within 0-15.
///
/// | function        | press              | release            |
/// |-----------------|--------------------|--------------------|
/// | `Note`          | `[9n, note, 90]`   | `[8n, note]`       |
/// | `ControlChange` | `[Bn, cc, 90]`     | `[Bn, cc, 0]`      |
pub fn encode(config: &ButtonConfig, transition: Transition) -> MidiMessage {
    let channel = config.channel();
    let value = config.value();

    match (config.function(), transition) {
        (ButtonFunction::Note, Transition::Press) => {
            MidiMessage::three(NOTE_ON + channel, value, PRESS_VELOCITY)
        }
        // Note off carries no release velocity
        (ButtonFunction::Note, Transition::Release) => MidiMessage::two(NOTE_OFF + channel, value),
        (ButtonFunction::ControlChange, Transition::Press) => {
            MidiMessage::three(CONTROL_CHANGE + channel, value, PRESS_VELOCITY)
        }
        (ButtonFunction::ControlChange, Transition::Release) => {
            MidiMessage::three(CONTROL_CHANGE + channel, value, CONTROL_RELEASE_VALUE)
        }
    }
}
