//! Provides helpers for resolving the network interface to scan

use ipnet::Ipv4Net;
use pnet::{
    datalink::NetworkInterface as PNetNetworkInterface, ipnetwork::IpNetwork,
    util::MacAddr,
};
use std::net::Ipv4Addr;

use crate::error::{Result, ScanError};

/// Represents a network interface on current host that is up and has an
/// IPv4 address bound to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    /// The name of the interface
    pub name: String,
    /// The description of the interface
    pub description: String,
    /// The IPv4 address bound to the interface
    pub ipv4: Ipv4Addr,
    /// The subnet mask of the bound IPv4 address
    pub netmask: Ipv4Addr,
    /// The prefix length derived from the subnet mask
    pub prefix: u8,
    /// The network address and prefix, i.e. "192.168.1.0/24"
    pub cidr: String,
    /// The hardware address of the interface
    pub mac: MacAddr,
    /// All addresses assigned to the interface
    pub ips: Vec<IpNetwork>,
    /// Interface flags as reported by the OS
    pub flags: u32,
    /// Interface index
    pub index: u32,
}

impl TryFrom<PNetNetworkInterface> for NetworkInterface {
    type Error = ScanError;

    fn try_from(value: PNetNetworkInterface) -> Result<Self> {
        let mac = value.mac.ok_or_else(|| {
            ScanError::Precondition(format!(
                "interface {} has no hardware address",
                value.name
            ))
        })?;

        let Some(IpNetwork::V4(ipv4_net)) =
            value.ips.iter().find(|i| i.is_ipv4()).copied()
        else {
            return Err(ScanError::Precondition(format!(
                "interface {} has no IPv4 address",
                value.name
            )));
        };

        let net = Ipv4Net::with_netmask(ipv4_net.ip(), ipv4_net.mask())
            .map_err(|e| ScanError::Precondition(e.to_string()))?;

        Ok(Self {
            name: value.name,
            description: value.description,
            ipv4: net.addr(),
            netmask: net.netmask(),
            prefix: net.prefix_len(),
            cidr: net.trunc().to_string(),
            mac,
            ips: value.ips,
            flags: value.flags,
            index: value.index,
        })
    }
}

impl From<&NetworkInterface> for PNetNetworkInterface {
    fn from(value: &NetworkInterface) -> Self {
        Self {
            name: value.name.clone(),
            description: value.description.clone(),
            index: value.index,
            mac: Some(value.mac),
            ips: value.ips.clone(),
            flags: value.flags,
        }
    }
}

fn validate(iface: PNetNetworkInterface) -> Result<NetworkInterface> {
    if !iface.is_up() {
        return Err(ScanError::Precondition(format!(
            "interface is down: {}",
            iface.name
        )));
    }

    NetworkInterface::try_from(iface)
}

/// Finds a network interface by name (case insensitive)
///
/// # Errors
///
/// Returns [`ScanError::Precondition`] if the interface does not exist, is
/// down, or is missing a hardware or IPv4 address
pub fn get_interface(name: &str) -> Result<NetworkInterface> {
    let iface = pnet::datalink::interfaces()
        .into_iter()
        .find(|i| i.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            ScanError::Precondition(format!("interface not found: {}", name))
        })?;

    validate(iface)
}

// Interfaces without a hardware address (tun, wg) can't carry ARP
fn is_scannable(iface: &PNetNetworkInterface) -> bool {
    iface.is_up()
        && !iface.is_loopback()
        && iface.mac.is_some()
        && iface.ips.iter().any(|i| i.is_ipv4())
}

fn select_default(
    interfaces: Vec<PNetNetworkInterface>,
) -> Result<NetworkInterface> {
    let iface = interfaces
        .into_iter()
        .find(is_scannable)
        .ok_or_else(|| {
            ScanError::Precondition(
                "could not detect a default network interface".into(),
            )
        })?;

    validate(iface)
}

/// Returns the first interface that is up, is not a loopback and has both a
/// hardware and an IPv4 address
pub fn get_default_interface() -> Result<NetworkInterface> {
    select_default(pnet::datalink::interfaces())
}

#[cfg(test)]
#[path = "./network_tests.rs"]
mod tests;
