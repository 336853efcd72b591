pub mod message;
pub mod sender;
pub mod transport;

pub use message::{encode, MidiMessage};
pub use sender::MidiSender;
pub use transport::{MidiTransport, TransportError};
