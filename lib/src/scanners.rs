//! Provides data structures and implementations for discovering hosts on
//! the network

#[cfg(test)]
use mockall::automock;

use pnet::util::MacAddr;
use std::{net::Ipv4Addr, thread::JoinHandle, time::Duration};

use crate::error::Result;

/// The default time to wait for replies after the last request is sent
pub const DEFAULT_OBSERVATION_WINDOW: Duration = Duration::from_secs(3);

/// The default number of workers handling replies
pub const DEFAULT_REPORTING_THREADS: usize = 8;

/// Data structure representing a device that answered an ARP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// IPv4 of the device
    pub ip: Ipv4Addr,
    /// MAC address of the device
    pub mac: MacAddr,
    /// Vendor of the device or "unknown"
    pub vendor: String,
}

/// Messages sent by scanners over the mpsc channel
#[derive(Debug)]
pub enum ScanMessage {
    /// Sent whenever an ARP reply is accepted from a device
    ARPScanDevice(Device),
    /// Indicates that scanning has completed. No messages follow it.
    Done,
}

#[cfg_attr(test, automock)]
/// Trait used by all scanners
pub trait Scanner: Send {
    /// Performs network scanning in the background. The scanner is consumed
    /// and the resources it holds are released by the time the returned
    /// handle completes.
    fn scan(self) -> Result<JoinHandle<Result<()>>>;
}

pub mod arp_scanner;
