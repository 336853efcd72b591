//! Game controller to MIDI mapping.
//!
//! [`MidiMapper`] owns the single active controller, its per-button
//! [`ButtonConfig`](mapping::ButtonConfig) store and the MIDI output.
//! Input notifications go through [`MidiMapper::dispatch`], which turns
//! attach/detach into controller lifecycle changes and button presses
//! into encoded MIDI messages.

pub mod config;
pub mod controller;
pub mod error;
pub mod mapper;
pub mod mapping;
pub mod midi;

pub use controller::{ControllerEvent, DeviceId, Transition};
pub use error::MapperError;
pub use mapper::{Dispatch, MidiMapper};
pub use mapping::{ButtonConfig, ButtonFunction, ControllerConfigStore};
pub use midi::{encode, MidiMessage, MidiSender, MidiTransport};
