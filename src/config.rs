use std::time::Duration;

use clap::Parser;
use log::warn;

use crate::mapping::{ButtonConfig, ButtonFunction, ControllerConfigStore};

pub const DEFAULT_CLIENT_NAME: &str = "zMIDI Controller";
pub const DEFAULT_BASE_NOTE: u8 = 36;

/// Button `button` plays controller number `controller` instead of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CcBinding {
    pub button: usize,
    pub controller: u8,
}

fn parse_cc_binding(arg: &str) -> Result<CcBinding, String> {
    let (button, controller) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected BUTTON=CONTROLLER, got '{}'", arg))?;
    let button = button
        .trim()
        .parse()
        .map_err(|e| format!("invalid button index '{}': {}", button, e))?;
    let controller = controller
        .trim()
        .parse()
        .map_err(|e| format!("invalid controller number '{}': {}", controller, e))?;
    Ok(CcBinding { button, controller })
}

/// Startup settings for the mapper binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "zmidi-controller")]
#[command(about = "Play MIDI notes and controllers from a game controller")]
pub struct Settings {
    /// Name the MIDI client registers under
    #[arg(long, env = "ZMIDI_CLIENT_NAME", default_value = DEFAULT_CLIENT_NAME)]
    pub client_name: String,

    /// Output port index (see --list-ports)
    #[arg(long, env = "ZMIDI_PORT", default_value_t = 0)]
    pub port: usize,

    /// Use the first output port whose name contains this text
    #[arg(long, env = "ZMIDI_PORT_NAME", conflicts_with = "port")]
    pub port_name: Option<String>,

    /// Publish a virtual output port instead of connecting to one
    #[arg(long = "virtual", env = "ZMIDI_VIRTUAL")]
    pub virtual_port: bool,

    /// List MIDI output ports and exit
    #[arg(long)]
    pub list_ports: bool,

    /// Note played by the first button; the others follow chromatically
    #[arg(long, default_value_t = DEFAULT_BASE_NOTE)]
    pub base_note: u8,

    /// Zero-based MIDI channel for every button
    #[arg(long, default_value_t = 0)]
    pub channel: u8,

    /// Map a button to a control change, as BUTTON=CONTROLLER (repeatable)
    #[arg(long = "cc", value_name = "BUTTON=CONTROLLER", value_parser = parse_cc_binding)]
    pub cc: Vec<CcBinding>,

    /// Delay between input polls, in milliseconds
    #[arg(long, env = "ZMIDI_POLL_MS", default_value_t = 1)]
    pub poll_interval_ms: u64,

    /// Default log filter; RUST_LOG takes precedence
    #[arg(long, env = "ZMIDI_LOG", default_value = "info")]
    pub log_level: String,
}

impl Settings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn layout(&self) -> Layout {
        Layout {
            base_note: self.base_note,
            channel: self.channel,
            cc: self.cc.clone(),
        }
    }
}

/// Initial mappings written into a freshly attached controller's store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub base_note: u8,
    pub channel: u8,
    pub cc: Vec<CcBinding>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            base_note: DEFAULT_BASE_NOTE,
            channel: 0,
            cc: Vec::new(),
        }
    }
}

impl Layout {
    /// Button `i` plays note `base_note + i`, then CC bindings override.
    ///
    /// Values past 127 clamp; bindings for buttons the store doesn't have
    /// are skipped.
    pub fn apply(&self, store: &mut ControllerConfigStore) {
        for (i, config) in store.iter_mut().enumerate() {
            let note = usize::from(self.base_note).saturating_add(i);
            *config = ButtonConfig::note(self.channel, u8::try_from(note).unwrap_or(u8::MAX));
        }

        for binding in &self.cc {
            match store.get_mut(binding.button) {
                Some(config) => {
                    config.set_function(ButtonFunction::ControlChange);
                    config.set_value(binding.controller);
                }
                None => warn!(
                    "CC binding for button {} ignored: controller has {} buttons",
                    binding.button,
                    store.len()
                ),
            }
        }
    }
}
