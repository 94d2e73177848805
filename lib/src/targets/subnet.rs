//! Provides lazy enumeration of the usable host addresses in an IPv4 subnet

use ipnet::Ipv4Net;
use std::{iter::FusedIterator, net::Ipv4Addr};

/// Iterator over every host address in a subnet, excluding the network and
/// broadcast addresses, in ascending order
///
/// Addresses are computed on the fly so even a /0 never materializes the
/// whole address space.
///
/// # Examples
///
/// ```
/// # use std::net::Ipv4Addr;
/// # use r_arplib::targets::subnet;
/// let hosts: Vec<Ipv4Addr> = subnet::enumerate(
///     Ipv4Addr::new(192, 168, 1, 0),
///     Ipv4Addr::new(255, 255, 255, 252),
/// )
/// .collect();
/// assert_eq!(
///     hosts,
///     vec![Ipv4Addr::new(192, 168, 1, 1), Ipv4Addr::new(192, 168, 1, 2)]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetHosts {
    // half open range [next, end); end is the broadcast address
    next: u32,
    end: u32,
}

/// Returns the host addresses of the subnet `ip` belongs to under `mask`
pub fn enumerate(ip: Ipv4Addr, mask: Ipv4Addr) -> SubnetHosts {
    let mask = u32::from(mask);
    let network = u32::from(ip) & mask;
    let broadcast = network | !mask;

    // /31 and /32 have nothing strictly between network and broadcast
    if broadcast - network < 2 {
        return SubnetHosts { next: 0, end: 0 };
    }

    SubnetHosts {
        next: network + 1,
        end: broadcast,
    }
}

/// Returns the host addresses of the provided network
pub fn hosts_of(net: &Ipv4Net) -> SubnetHosts {
    enumerate(net.addr(), net.netmask())
}

impl Iterator for SubnetHosts {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }

        let ip = Ipv4Addr::from(self.next);
        self.next += 1;
        Some(ip)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SubnetHosts {}

impl FusedIterator for SubnetHosts {}

#[cfg(test)]
#[path = "./subnet_tests.rs"]
mod tests;
