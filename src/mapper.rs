use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::controller::{
    ControllerEvent, ControllerLifecycleManager, DeviceId, DeviceOpener, InputLayer, Transition,
};
use crate::error::MapperError;
use crate::mapping::ControllerConfigStore;
use crate::midi::{encode, MidiMessage, MidiTransport};

// Minimum gap between two logged poll errors
const POLL_ERROR_REPORT_INTERVAL: Duration = Duration::from_millis(250);

/// What a single notification turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Attached,
    AttachIgnored,
    Detached,
    DetachIgnored,
    Sent(MidiMessage),
    /// The button index was outside the configured store, or the event
    /// came from a controller other than the active one
    Dropped,
    /// The transport rejected the message
    SendFailed(MidiMessage),
}

/// The mapping engine: the active controller with its button store, plus
/// the MIDI output those buttons play into.
pub struct MidiMapper<T: MidiTransport> {
    controllers: ControllerLifecycleManager,
    transport: T,
    last_poll_error: Option<Instant>,
}

impl<T: MidiTransport> MidiMapper<T> {
    pub fn new(transport: T) -> Self {
        Self {
            controllers: ControllerLifecycleManager::new(),
            transport,
            last_poll_error: None,
        }
    }

    pub fn controllers(&self) -> &ControllerLifecycleManager {
        &self.controllers
    }

    /// Id and display name of the active controller
    pub fn active_controller(&self) -> Option<(DeviceId, &str)> {
        self.controllers
            .active_device()
            .zip(self.controllers.active_name())
    }

    pub fn buttons(&self) -> &ControllerConfigStore {
        self.controllers.store()
    }

    /// Edit button mappings between notifications
    pub fn buttons_mut(&mut self) -> &mut ControllerConfigStore {
        self.controllers.store_mut()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn list_ports(&self) -> Result<Vec<String>, MapperError> {
        Ok(self.transport.list_ports()?)
    }

    /// Switch output to the port at `index`, closing the current one first.
    pub fn select_port(&mut self, index: usize) -> Result<(), MapperError> {
        self.transport.close_port();
        self.transport
            .open_port(index)
            .map_err(|e| MapperError::port_unavailable(index, e.to_string()))
    }

    /// Route one input notification.
    pub fn dispatch<O>(&mut self, opener: &mut O, event: ControllerEvent) -> Dispatch
    where
        O: DeviceOpener + ?Sized,
    {
        match event {
            ControllerEvent::Attached {
                device_id,
                button_count,
            } => {
                if self.controllers.on_attach(opener, device_id, button_count) {
                    Dispatch::Attached
                } else {
                    Dispatch::AttachIgnored
                }
            }
            ControllerEvent::Detached { device_id } => {
                if self.controllers.on_detach(device_id) {
                    Dispatch::Detached
                } else {
                    Dispatch::DetachIgnored
                }
            }
            ControllerEvent::ButtonPressed { device_id, button } => {
                self.play(device_id, button, Transition::Press)
            }
            ControllerEvent::ButtonReleased { device_id, button } => {
                self.play(device_id, button, Transition::Release)
            }
        }
    }

    fn play(&mut self, device_id: DeviceId, button: usize, transition: Transition) -> Dispatch {
        // Only the active controller plays
        if self.controllers.active_device() != Some(device_id) {
            debug!(
                "Dropping {:?}: {}",
                transition,
                MapperError::InactiveController(device_id)
            );
            return Dispatch::Dropped;
        }

        let store = self.controllers.store();
        let Some(config) = store.get(button) else {
            let err = MapperError::OutOfBoundsButton {
                index: button,
                len: store.len(),
            };
            warn!("Dropping {:?}: {}", transition, err);
            return Dispatch::Dropped;
        };

        let message = encode(config, transition);
        match self.transport.send(message.as_bytes()) {
            Ok(()) => {
                debug!("Button {} {:?} -> {:?}", button, transition, message);
                Dispatch::Sent(message)
            }
            Err(e) => {
                warn!("{}", MapperError::TransportSendFailure(e));
                Dispatch::SendFailed(message)
            }
        }
    }

    /// Poll the input layer once and dispatch everything it delivered, in order.
    ///
    /// `on_attached` runs right after a controller becomes active, with its
    /// fresh store. Returns the number of notifications dispatched.
    pub fn pump<I, F>(&mut self, input: &mut I, mut on_attached: F) -> usize
    where
        I: InputLayer + ?Sized,
        F: FnMut(&mut ControllerConfigStore),
    {
        let events = match input.poll_events() {
            Ok(events) => events,
            Err(e) => {
                // Only report errors every so often to avoid spamming the log
                let now = Instant::now();
                let due = self
                    .last_poll_error
                    .map_or(true, |last| now.duration_since(last) >= POLL_ERROR_REPORT_INTERVAL);
                if due {
                    warn!("Controller error: {}", e);
                    self.last_poll_error = Some(now);
                }
                return 0;
            }
        };

        let count = events.len();
        for event in events {
            if self.dispatch(input, event) == Dispatch::Attached {
                on_attached(self.controllers.store_mut());
            }
        }
        count
    }

    /// Main processing loop; never returns.
    pub fn run<I, F>(&mut self, input: &mut I, poll_interval: Duration, mut on_attached: F)
    where
        I: InputLayer + ?Sized,
        F: FnMut(&mut ControllerConfigStore),
    {
        loop {
            self.pump(input, &mut on_attached);
            // Keep latency low without spinning
            thread::sleep(poll_interval);
        }
    }
}
