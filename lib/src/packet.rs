//! Provides helpers for creating, parsing and sending packets

pub mod arp_packet;
pub mod wire;

use crate::error::Result;

/// Trait describing a packet reader
pub trait Reader: Send {
    /// Should return the next packet off of the wire, or `None` if no packet
    /// arrived before the reader's read timeout elapsed
    fn next_packet(&mut self) -> Result<Option<&[u8]>>;
}

/// Trait describing a packet sender
pub trait Sender: Send {
    /// Should send a packet over the wire
    fn send(&mut self, packet: &[u8]) -> Result<()>;
}

#[cfg(test)]
#[path = "./packet_tests.rs"]
#[doc(hidden)]
pub mod mocks;
