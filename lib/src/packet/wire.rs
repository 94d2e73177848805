//! Implements a default Wire using pnet

use pnet::datalink;
use std::{
    io,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    error::{Result, ScanError},
    network::NetworkInterface,
    packet::{Reader, Sender},
};

/// Default time a blocked read waits before giving the reader loop a chance
/// to check for cancellation
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Represents the capture session as a packet Sender and packet Reader tuple
///
/// The session is released once the last clone of the Wire is dropped.
#[derive(Clone)]
pub struct Wire(pub Arc<Mutex<dyn Sender>>, pub Arc<Mutex<dyn Reader>>);

/// A PNetReader implementation of packet Reader
pub struct PNetReader {
    receiver: Box<dyn datalink::DataLinkReceiver>,
}

// Implements the Reader trait for our PNet implementation
impl Reader for PNetReader {
    fn next_packet(&mut self) -> Result<Option<&[u8]>> {
        match self.receiver.next() {
            Ok(pkt) => Ok(Some(pkt)),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(ScanError::Read(e.to_string())),
        }
    }
}

/// A PNetSender implementation of packet Sender
pub struct PNetSender {
    sender: Box<dyn datalink::DataLinkSender>,
}

// Implements the Sender trait for our PNet implementation
impl Sender for PNetSender {
    fn send(&mut self, packet: &[u8]) -> Result<()> {
        match self.sender.send_to(packet, None) {
            Some(res) => res.map_err(|e| ScanError::Write(e.to_string())),
            None => Err(ScanError::Write("failed to send packet".into())),
        }
    }
}

/// Opens a capture session on the provided interface
///
/// Reads give up after `read_timeout` so the reader loop can observe
/// cancellation on a quiet network.
///
/// # Errors
///
/// Returns [`ScanError::CaptureOpen`] if the device cannot be opened, i.e.
/// permission denied or device not found
///
/// Example
/// ```no_run
/// # use r_arplib::network;
/// # use r_arplib::packet::wire;
/// let interface = network::get_default_interface().unwrap();
/// let packet_wire =
///     wire::open(&interface, wire::DEFAULT_READ_TIMEOUT).unwrap();
/// ```
pub fn open(
    interface: &NetworkInterface,
    read_timeout: Duration,
) -> Result<Wire> {
    let cfg = datalink::Config {
        read_timeout: Some(read_timeout),
        ..Default::default()
    };

    let open_error = |error: String| ScanError::CaptureOpen {
        interface: interface.name.clone(),
        error,
    };

    let (tx, rx) = match datalink::channel(&interface.into(), cfg) {
        Ok(datalink::Channel::Ethernet(tx, rx)) => Ok((tx, rx)),
        Ok(_) => Err(open_error("unsupported channel type".into())),
        Err(e) => Err(open_error(e.to_string())),
    }?;

    log::debug!("opened capture session on {}", interface.name);

    Ok(Wire(
        Arc::new(Mutex::new(PNetSender { sender: tx })),
        Arc::new(Mutex::new(PNetReader { receiver: rx })),
    ))
}
