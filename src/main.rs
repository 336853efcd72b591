use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use zmidi_controller::config::Settings;
use zmidi_controller::controller::gamepad::GamepadInput;
use zmidi_controller::{MidiMapper, MidiSender, MidiTransport};

fn main() -> Result<()> {
    let settings = Settings::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&settings.log_level),
    )
    .init();

    let sender = MidiSender::new(&settings.client_name).context("Failed to create MIDI client")?;
    let ports = sender.list_ports().context("Failed to list MIDI ports")?;

    if settings.list_ports {
        if ports.is_empty() {
            println!("No MIDI output ports found.");
        }
        for (i, port) in ports.iter().enumerate() {
            println!("{}: {}", i, port);
        }
        return Ok(());
    }

    let mut mapper = MidiMapper::new(sender);
    open_output(&mut mapper, &settings, &ports)?;

    let mut input = GamepadInput::new().context("Failed to initialise controller input")?;
    for (id, name) in input.connected() {
        info!("Controller {} present: {}", id, name);
    }

    let layout = settings.layout();
    info!("MIDI mapping started. Press Ctrl+C to exit.");
    mapper.run(&mut input, settings.poll_interval(), |store| layout.apply(store));

    Ok(())
}

fn open_output(mapper: &mut MidiMapper<MidiSender>, settings: &Settings, ports: &[String]) -> Result<()> {
    if settings.virtual_port {
        return open_virtual(mapper.transport_mut(), &settings.client_name);
    }

    info!("Available MIDI ports:");
    for (i, port) in ports.iter().enumerate() {
        info!("  {}: {}", i, port);
    }
    if ports.is_empty() {
        bail!("No MIDI output ports available");
    }

    let index = match &settings.port_name {
        Some(fragment) => mapper
            .transport()
            .find_port(fragment)?
            .with_context(|| format!("No MIDI output port containing '{}'", fragment))?,
        None => settings.port,
    };
    mapper.select_port(index)?;
    if let Some(name) = mapper.transport().port_name() {
        info!("Sending MIDI to {}", name);
    }
    Ok(())
}

#[cfg(unix)]
fn open_virtual(sender: &mut MidiSender, port_name: &str) -> Result<()> {
    sender
        .open_virtual(port_name)
        .context("Failed to create virtual MIDI port")
}

#[cfg(not(unix))]
fn open_virtual(_sender: &mut MidiSender, _port_name: &str) -> Result<()> {
    bail!("Virtual MIDI ports are not supported on this platform")
}
