use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to create MIDI client: {0}")]
    Init(String),
    #[error("no MIDI output port at index {0}")]
    NoSuchPort(usize),
    #[error("failed to read MIDI port name: {0}")]
    PortInfo(String),
    #[error("failed to connect to MIDI port: {0}")]
    Connect(String),
    #[error("MIDI output is not connected")]
    NotConnected,
    #[error("failed to send MIDI message: {0}")]
    Send(String),
}

/// Output side of a MIDI connection.
///
/// Transport calls are synchronous and expected not to block.
pub trait MidiTransport {
    /// Names of the available output ports, in index order
    fn list_ports(&self) -> Result<Vec<String>, TransportError>;

    /// Connect to the output port at `index`
    fn open_port(&mut self, index: usize) -> Result<(), TransportError>;

    /// Disconnect the current port, if any
    fn close_port(&mut self);

    fn is_open(&self) -> bool;

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}
