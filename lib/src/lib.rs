//! Library package for discovering live hosts on a local IPv4 subnet
//!
//! An ARP request is broadcast for every usable address in the subnet of the
//! chosen interface while a listener correlates the replies back to the
//! sender's IPv4 address, hardware address and (when known) vendor.
//!
//! # Examples
//!
//! ## ARP Scanning
//!
//! <https://github.com/robgonnella/r-arpscan/blob/main/lib/examples/arp-scanner.rs>
//!
//! ```bash
//! sudo -E cargo run --example arp-scanner -p r-arplib
//! ```

#![deny(missing_docs)]
pub mod error;
pub mod network;
pub mod packet;
pub mod scanners;
pub mod targets;
pub mod vendor;
