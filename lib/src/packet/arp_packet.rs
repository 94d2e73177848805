//! Provides helpers for creating and parsing ARP packets

use derive_builder::Builder;
use pnet::{
    packet::{
        MutablePacket, Packet,
        arp::{self, ArpHardwareTypes, ArpOperation, ArpOperations},
        ethernet::{self, EtherTypes},
    },
    util::MacAddr,
};
use std::net::Ipv4Addr;

use crate::error::{Result, ScanError};

// Constants used to help locate our nested packets
const PKT_ETH_SIZE: usize = ethernet::EthernetPacket::minimum_packet_size();
const PKT_ARP_SIZE: usize = arp::ArpPacket::minimum_packet_size();

/// Size of a serialized ARP request frame (ethernet header + ARP payload)
pub const ARP_FRAME_SIZE: usize = PKT_ETH_SIZE + PKT_ARP_SIZE;

const HW_ADDR_LEN: u8 = 6;
const PROTO_ADDR_LEN: u8 = 4;

/// Represents a broadcast ARP request asking who has `dest_ip`
///
/// This is what the internals of the arp_scanner send when scanning for
/// devices on the network
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct ArpPacket {
    /// IPv4 of the interface sending the request
    source_ip: Ipv4Addr,
    /// MAC of the interface sending the request
    source_mac: MacAddr,
    /// IPv4 being asked about
    dest_ip: Ipv4Addr,
}

impl ArpPacket {
    /// Returns builder for ArpPacket
    pub fn builder() -> ArpPacketBuilder {
        ArpPacketBuilder::default()
    }

    /// Builds a request from untyped address octets
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Serialization`] unless the hardware address is
    /// exactly 6 bytes and both protocol addresses are exactly 4 bytes
    pub fn from_octets(
        source_mac: &[u8],
        source_ip: &[u8],
        dest_ip: &[u8],
    ) -> Result<Self> {
        let mac: [u8; 6] = source_mac.try_into().map_err(|_| {
            ScanError::Serialization(format!(
                "sender hardware address must be {} bytes, got {}",
                HW_ADDR_LEN,
                source_mac.len()
            ))
        })?;

        Ok(Self {
            source_ip: ipv4_from_octets("sender", source_ip)?,
            source_mac: MacAddr::new(
                mac[0], mac[1], mac[2], mac[3], mac[4], mac[5],
            ),
            dest_ip: ipv4_from_octets("target", dest_ip)?,
        })
    }

    /// Serializes the request into a broadcast ethernet frame
    pub fn to_raw(&self) -> Result<[u8; ARP_FRAME_SIZE]> {
        let mut pkt_buf = [0u8; ARP_FRAME_SIZE];

        write_frame(
            &mut pkt_buf,
            &ArpRecord {
                operation: ArpOperations::Request,
                sender_mac: self.source_mac,
                sender_ip: self.source_ip,
                target_mac: MacAddr::zero(),
                target_ip: self.dest_ip,
            },
            MacAddr::broadcast(),
        )?;

        Ok(pkt_buf)
    }
}

fn ipv4_from_octets(role: &str, octets: &[u8]) -> Result<Ipv4Addr> {
    let ip: [u8; 4] = octets.try_into().map_err(|_| {
        ScanError::Serialization(format!(
            "{} protocol address must be {} bytes, got {}",
            role,
            PROTO_ADDR_LEN,
            octets.len()
        ))
    })?;
    Ok(Ipv4Addr::from(ip))
}

/// The ARP fields of a frame read off the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpRecord {
    /// Request or reply
    pub operation: ArpOperation,
    /// Hardware address of the sender
    pub sender_mac: MacAddr,
    /// IPv4 address of the sender
    pub sender_ip: Ipv4Addr,
    /// Hardware address of the target (all zero in requests)
    pub target_mac: MacAddr,
    /// IPv4 address of the target
    pub target_ip: Ipv4Addr,
}

impl ArpRecord {
    /// Returns true if this record is an ARP reply
    pub fn is_reply(&self) -> bool {
        self.operation == ArpOperations::Reply
    }
}

/// Extracts the ARP payload from a raw ethernet frame
///
/// Returns `None` for anything that is not an ethernet/IPv4 ARP packet,
/// which is the common case for most traffic seen on an interface.
pub fn parse(frame: &[u8]) -> Option<ArpRecord> {
    let eth = ethernet::EthernetPacket::new(frame)?;

    if eth.get_ethertype() != EtherTypes::Arp {
        return None;
    }

    let header = arp::ArpPacket::new(eth.payload())?;

    if header.get_hardware_type() != ArpHardwareTypes::Ethernet
        || header.get_protocol_type() != EtherTypes::Ipv4
        || header.get_hw_addr_len() != HW_ADDR_LEN
        || header.get_proto_addr_len() != PROTO_ADDR_LEN
    {
        return None;
    }

    Some(ArpRecord {
        operation: header.get_operation(),
        sender_mac: header.get_sender_hw_addr(),
        sender_ip: header.get_sender_proto_addr(),
        target_mac: header.get_target_hw_addr(),
        target_ip: header.get_target_proto_addr(),
    })
}

fn write_frame(
    buf: &mut [u8],
    record: &ArpRecord,
    destination: MacAddr,
) -> Result<()> {
    let mut pkt_eth =
        ethernet::MutableEthernetPacket::new(buf).ok_or_else(|| {
            ScanError::Serialization(
                "buffer too small for ethernet header".into(),
            )
        })?;

    pkt_eth.set_destination(destination);
    pkt_eth.set_source(record.sender_mac);
    pkt_eth.set_ethertype(EtherTypes::Arp);

    let mut pkt_arp = arp::MutableArpPacket::new(pkt_eth.payload_mut())
        .ok_or_else(|| {
            ScanError::Serialization("buffer too small for ARP payload".into())
        })?;

    pkt_arp.set_hardware_type(ArpHardwareTypes::Ethernet);
    pkt_arp.set_protocol_type(EtherTypes::Ipv4);
    pkt_arp.set_hw_addr_len(HW_ADDR_LEN);
    pkt_arp.set_proto_addr_len(PROTO_ADDR_LEN);
    pkt_arp.set_operation(record.operation);
    pkt_arp.set_sender_hw_addr(record.sender_mac);
    pkt_arp.set_sender_proto_addr(record.sender_ip);
    pkt_arp.set_target_hw_addr(record.target_mac);
    pkt_arp.set_target_proto_addr(record.target_ip);

    Ok(())
}

#[cfg(test)]
#[doc(hidden)]
pub fn create_arp_frame(record: ArpRecord, destination: MacAddr) -> Vec<u8> {
    let mut pkt_buf = vec![0u8; ARP_FRAME_SIZE];
    write_frame(&mut pkt_buf, &record, destination).unwrap();
    pkt_buf
}

#[cfg(test)]
#[doc(hidden)]
pub fn create_arp_reply(
    from_mac: MacAddr,
    from_ip: Ipv4Addr,
    to_mac: MacAddr,
    to_ip: Ipv4Addr,
) -> Vec<u8> {
    create_arp_frame(
        ArpRecord {
            operation: ArpOperations::Reply,
            sender_mac: from_mac,
            sender_ip: from_ip,
            target_mac: to_mac,
            target_ip: to_ip,
        },
        to_mac,
    )
}

#[cfg(test)]
#[path = "./arp_packet_tests.rs"]
mod tests;
