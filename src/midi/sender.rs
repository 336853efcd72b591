use log::{debug, info};
use midir::{MidiOutput, MidiOutputConnection};

use super::transport::{MidiTransport, TransportError};

enum Output {
    Idle(MidiOutput),
    Connected {
        connection: MidiOutputConnection,
        port_name: String,
    },
}

/// midir-backed MIDI output.
///
/// The client is created up front and re-used across port changes:
/// closing a connection hands the client back for the next `open_port`.
pub struct MidiSender {
    client_name: String,
    // Only `None` transiently while a port is being opened or closed
    output: Option<Output>,
}

impl MidiSender {
    /// Create a MIDI client without connecting to any port.
    pub fn new(client_name: &str) -> Result<Self, TransportError> {
        let midi_out =
            MidiOutput::new(client_name).map_err(|e| TransportError::Init(e.to_string()))?;

        Ok(Self {
            client_name: client_name.to_string(),
            output: Some(Output::Idle(midi_out)),
        })
    }

    /// Index of the first port whose name contains `fragment`.
    ///
    /// An empty fragment picks the first available port.
    pub fn find_port(&self, fragment: &str) -> Result<Option<usize>, TransportError> {
        let ports = self.list_ports()?;
        Ok(ports.iter().position(|name| name.contains(fragment)))
    }

    /// Name of the connected port, if any
    pub fn port_name(&self) -> Option<&str> {
        match &self.output {
            Some(Output::Connected { port_name, .. }) => Some(port_name.as_str()),
            _ => None,
        }
    }

    /// Publish a virtual output port other applications can connect to.
    #[cfg(unix)]
    pub fn open_virtual(&mut self, port_name: &str) -> Result<(), TransportError> {
        use midir::os::unix::VirtualOutput;

        self.close_port();
        let midi_out = self.take_idle()?;

        match midi_out.create_virtual(port_name) {
            Ok(connection) => {
                info!("Created virtual MIDI port {}", port_name);
                self.output = Some(Output::Connected {
                    connection,
                    port_name: port_name.to_string(),
                });
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                self.output = Some(Output::Idle(e.into_inner()));
                Err(TransportError::Connect(reason))
            }
        }
    }

    fn take_idle(&mut self) -> Result<MidiOutput, TransportError> {
        match self.output.take() {
            Some(Output::Idle(midi_out)) => Ok(midi_out),
            Some(Output::Connected { connection, .. }) => Ok(connection.close()),
            None => MidiOutput::new(&self.client_name).map_err(|e| TransportError::Init(e.to_string())),
        }
    }
}

impl MidiTransport for MidiSender {
    fn list_ports(&self) -> Result<Vec<String>, TransportError> {
        let probe;
        let midi_out = match &self.output {
            Some(Output::Idle(midi_out)) => midi_out,
            // A connected client can't enumerate, so ask a fresh one
            _ => {
                probe = MidiOutput::new(&self.client_name)
                    .map_err(|e| TransportError::Init(e.to_string()))?;
                &probe
            }
        };

        let ports = midi_out.ports();
        ports
            .iter()
            .map(|port| {
                midi_out
                    .port_name(port)
                    .map_err(|e| TransportError::PortInfo(e.to_string()))
            })
            .collect()
    }

    fn open_port(&mut self, index: usize) -> Result<(), TransportError> {
        self.close_port();
        let midi_out = self.take_idle()?;

        let ports = midi_out.ports();
        let Some(port) = ports.get(index) else {
            self.output = Some(Output::Idle(midi_out));
            return Err(TransportError::NoSuchPort(index));
        };
        let port_name = midi_out
            .port_name(port)
            .unwrap_or_else(|_| format!("port {}", index));

        match midi_out.connect(port, &self.client_name) {
            Ok(connection) => {
                info!("Opened MIDI port {}: {}", index, port_name);
                self.output = Some(Output::Connected {
                    connection,
                    port_name,
                });
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                self.output = Some(Output::Idle(e.into_inner()));
                Err(TransportError::Connect(reason))
            }
        }
    }

    fn close_port(&mut self) {
        if !self.is_open() {
            return;
        }
        if let Some(Output::Connected {
            connection,
            port_name,
        }) = self.output.take()
        {
            debug!("Closing MIDI port {}", port_name);
            self.output = Some(Output::Idle(connection.close()));
        }
    }

    fn is_open(&self) -> bool {
        matches!(self.output, Some(Output::Connected { .. }))
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        match &mut self.output {
            Some(Output::Connected { connection, .. }) => connection
                .send(bytes)
                .map_err(|e| TransportError::Send(e.to_string())),
            _ => Err(TransportError::NotConnected),
        }
    }
}
