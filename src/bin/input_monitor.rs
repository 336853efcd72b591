//! Prints controller notifications and the MIDI bytes they would produce,
//! without opening a MIDI port. Port options are ignored.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;

use zmidi_controller::config::Settings;
use zmidi_controller::controller::gamepad::{GamepadInput, BUTTON_ORDER};
use zmidi_controller::controller::InputLayer;
use zmidi_controller::midi::TransportError;
use zmidi_controller::{Dispatch, MidiMapper, MidiTransport};

// Constants for display
const RESET: &str = "\x1B[0m";
const YELLOW: &str = "\x1B[33m";
const GREEN: &str = "\x1B[32m";
const CYAN: &str = "\x1B[36m";

/// Accepts every message; the monitor prints them itself.
struct Discard;

impl MidiTransport for Discard {
    fn list_ports(&self) -> Result<Vec<String>, TransportError> {
        Ok(Vec::new())
    }

    fn open_port(&mut self, index: usize) -> Result<(), TransportError> {
        Err(TransportError::NoSuchPort(index))
    }

    fn close_port(&mut self) {}

    fn is_open(&self) -> bool {
        true
    }

    fn send(&mut self, _bytes: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }
}

fn main() -> Result<()> {
    let settings = Settings::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&settings.log_level),
    )
    .init();

    println!("\n{}===== Controller Input Monitor ====={}", GREEN, RESET);
    println!("Button indices:");
    for (i, button) in BUTTON_ORDER.iter().enumerate() {
        println!("  {:>2}: {:?}", i, button);
    }

    let mut input = GamepadInput::new().context("Failed to initialise controller input")?;
    let mut mapper = MidiMapper::new(Discard);
    let layout = settings.layout();

    println!("\nWaiting for input. Press Ctrl+C to exit.");
    loop {
        let events = input.poll_events()?;
        for event in events {
            let outcome = mapper.dispatch(&mut input, event.clone());
            if outcome == Dispatch::Attached {
                layout.apply(mapper.buttons_mut());
            }

            match outcome {
                Dispatch::Sent(message) => println!(
                    "{}{:?}{} -> {}{:02X?}{}",
                    YELLOW,
                    event,
                    RESET,
                    CYAN,
                    message.as_bytes(),
                    RESET
                ),
                other => println!("{}{:?}{} -> {:?}", YELLOW, event, RESET, other),
            }
        }
        io::stdout().flush()?;
        std::thread::sleep(settings.poll_interval());
    }
}
