use std::collections::VecDeque;

use zmidi_controller::config::{CcBinding, Layout};
use zmidi_controller::controller::{Controller, DeviceOpener, InputLayer};
use zmidi_controller::midi::TransportError;
use zmidi_controller::{
    ButtonConfig, ControllerEvent, DeviceId, Dispatch, MapperError, MidiMapper, MidiTransport,
};

#[derive(Default)]
struct RecordingTransport {
    sent: Vec<Vec<u8>>,
}

impl MidiTransport for RecordingTransport {
    fn list_ports(&self) -> Result<Vec<String>, TransportError> {
        Ok(vec!["Recorder".to_string()])
    }

    fn open_port(&mut self, _index: usize) -> Result<(), TransportError> {
        Ok(())
    }

    fn close_port(&mut self) {}

    fn is_open(&self) -> bool {
        true
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.sent.push(bytes.to_vec());
        Ok(())
    }
}

struct ScriptedPad(DeviceId);

impl Controller for ScriptedPad {
    fn device_id(&self) -> DeviceId {
        self.0
    }

    fn name(&self) -> &str {
        "Scripted Pad"
    }

    fn button_count(&self) -> usize {
        4
    }
}

/// Replays a fixed list of notifications, one batch per poll.
#[derive(Default)]
struct ScriptedInput {
    batches: VecDeque<Vec<ControllerEvent>>,
    unplugged: Vec<DeviceId>,
}

impl ScriptedInput {
    fn new(batches: Vec<Vec<ControllerEvent>>) -> Self {
        Self {
            batches: batches.into(),
            unplugged: Vec::new(),
        }
    }
}

impl DeviceOpener for ScriptedInput {
    fn open(&mut self, device_id: DeviceId) -> Result<Box<dyn Controller>, MapperError> {
        if self.unplugged.contains(&device_id) {
            return Err(MapperError::controller_unavailable(device_id, "gone"));
        }
        Ok(Box::new(ScriptedPad(device_id)))
    }
}

impl InputLayer for ScriptedInput {
    fn poll_events(&mut self) -> Result<Vec<ControllerEvent>, MapperError> {
        self.batches
            .pop_front()
            .ok_or_else(|| MapperError::InputUnavailable("script exhausted".into()))
    }
}

fn attach(device: usize, buttons: usize) -> ControllerEvent {
    ControllerEvent::Attached {
        device_id: DeviceId(device),
        button_count: buttons,
    }
}

fn detach(device: usize) -> ControllerEvent {
    ControllerEvent::Detached {
        device_id: DeviceId(device),
    }
}

fn press(device: usize, button: usize) -> ControllerEvent {
    ControllerEvent::ButtonPressed {
        device_id: DeviceId(device),
        button,
    }
}

fn release(device: usize, button: usize) -> ControllerEvent {
    ControllerEvent::ButtonReleased {
        device_id: DeviceId(device),
        button,
    }
}

#[test]
fn control_change_button_end_to_end() {
    let mut input = ScriptedInput::default();
    let mut mapper = MidiMapper::new(RecordingTransport::default());

    assert_eq!(mapper.dispatch(&mut input, attach(7, 4)), Dispatch::Attached);
    *mapper.buttons_mut().get_mut(2).unwrap() = ButtonConfig::control_change(3, 20);

    mapper.dispatch(&mut input, press(7, 2));
    mapper.dispatch(&mut input, release(7, 2));

    assert_eq!(mapper.transport().sent, vec![vec![0xB3, 20, 90], vec![0xB3, 20, 0]]);
}

#[test]
fn detach_empties_store_and_drops_later_presses() {
    let mut input = ScriptedInput::default();
    let mut mapper = MidiMapper::new(RecordingTransport::default());

    mapper.dispatch(&mut input, attach(1, 4));
    assert_eq!(mapper.dispatch(&mut input, detach(1)), Dispatch::Detached);
    assert!(mapper.buttons().is_empty());

    for button in 0..4 {
        assert_eq!(mapper.dispatch(&mut input, press(1, button)), Dispatch::Dropped);
    }
    assert!(mapper.transport().sent.is_empty());
}

#[test]
fn only_first_controller_is_used() {
    let mut input = ScriptedInput::default();
    let mut mapper = MidiMapper::new(RecordingTransport::default());

    mapper.dispatch(&mut input, attach(1, 4));
    assert_eq!(mapper.dispatch(&mut input, attach(2, 12)), Dispatch::AttachIgnored);
    assert_eq!(mapper.dispatch(&mut input, detach(2)), Dispatch::DetachIgnored);
    assert_eq!(mapper.buttons().len(), 4);
    assert_eq!(mapper.active_controller(), Some((DeviceId(1), "Scripted Pad")));
}

#[test]
fn ignored_controller_cannot_play() {
    let mut input = ScriptedInput::default();
    let mut mapper = MidiMapper::new(RecordingTransport::default());

    assert_eq!(mapper.dispatch(&mut input, attach(1, 4)), Dispatch::Attached);
    assert_eq!(mapper.dispatch(&mut input, attach(2, 4)), Dispatch::AttachIgnored);

    assert_eq!(mapper.dispatch(&mut input, press(2, 0)), Dispatch::Dropped);
    assert_eq!(mapper.dispatch(&mut input, release(2, 0)), Dispatch::Dropped);
    assert!(mapper.transport().sent.is_empty());

    // The active pad still plays afterwards
    assert!(matches!(
        mapper.dispatch(&mut input, press(1, 0)),
        Dispatch::Sent(_)
    ));
}

#[test]
fn failed_open_lets_next_controller_attach() {
    let mut input = ScriptedInput::default();
    input.unplugged.push(DeviceId(1));
    let mut mapper = MidiMapper::new(RecordingTransport::default());

    assert_eq!(mapper.dispatch(&mut input, attach(1, 4)), Dispatch::AttachIgnored);
    assert!(mapper.buttons().is_empty());
    assert_eq!(mapper.dispatch(&mut input, attach(2, 6)), Dispatch::Attached);
    assert_eq!(mapper.buttons().len(), 6);
}

#[test]
fn pump_preserves_arrival_order_and_applies_layout() {
    let mut input = ScriptedInput::new(vec![
        vec![attach(0, 4), press(0, 0), press(0, 2), release(0, 0), press(0, 9)],
        vec![release(0, 2), detach(0), release(0, 0)],
    ]);
    let mut mapper = MidiMapper::new(RecordingTransport::default());
    let layout = Layout {
        base_note: 60,
        channel: 1,
        cc: vec![CcBinding {
            button: 2,
            controller: 74,
        }],
    };

    assert_eq!(mapper.pump(&mut input, |store| layout.apply(store)), 5);
    assert_eq!(mapper.pump(&mut input, |store| layout.apply(store)), 3);

    assert_eq!(
        mapper.transport().sent,
        vec![
            vec![0x91, 60, 90],
            vec![0xB1, 74, 90],
            vec![0x81, 60],
            vec![0xB1, 74, 0],
        ]
    );
    assert!(mapper.buttons().is_empty());
}

#[test]
fn poll_errors_are_not_fatal() {
    let mut input = ScriptedInput::new(Vec::new());
    let mut mapper = MidiMapper::new(RecordingTransport::default());

    assert_eq!(mapper.pump(&mut input, |_| {}), 0);
    assert_eq!(mapper.pump(&mut input, |_| {}), 0);

    input.batches.push_back(vec![attach(3, 2), press(3, 1)]);
    assert_eq!(mapper.pump(&mut input, |_| {}), 2);
    assert_eq!(mapper.transport().sent, vec![vec![0x90, 0, 90]]);
}
