//! Provides Scanner implementation for ARP scanning
//!
//! A scan moves through the following stages:
//!
//! 1. the listener starts reading frames off the capture session
//! 2. a request is sent for every host in the interface's subnet
//! 3. the scan waits out the observation window
//! 4. the listener is told to stop and joined
//! 5. the capture session is released
//! 6. [`ScanMessage::Done`] is sent

use derive_builder::Builder;
use std::{
    net::Ipv4Addr,
    sync::{
        Arc,
        mpsc::{self, TryRecvError},
    },
    thread::{self, JoinHandle},
    time::Duration,
};
use threadpool::ThreadPool;

use crate::{
    error::{Result, ScanError},
    network::NetworkInterface,
    packet::{
        Sender,
        arp_packet::{self, ArpPacket},
        wire::Wire,
    },
    scanners::{
        DEFAULT_OBSERVATION_WINDOW, DEFAULT_REPORTING_THREADS, Device,
        ScanMessage, Scanner,
    },
    targets::subnet,
    vendor::VendorTable,
};

/// Data structure representing an ARP scanner
#[derive(Clone, Builder)]
#[builder(setter(into))]
pub struct ARPScanner {
    /// Network interface to use for scanning
    interface: Arc<NetworkInterface>,
    /// Wire for reading and sending packets on the wire
    wire: Wire,
    /// Vendor table used to label discovered devices
    #[builder(default)]
    vendors: Arc<VendorTable>,
    /// Duration to wait for replies after all requests have been sent
    #[builder(default = "DEFAULT_OBSERVATION_WINDOW")]
    observation_window: Duration,
    /// Number of workers performing vendor lookups and notifications
    #[builder(default = "DEFAULT_REPORTING_THREADS")]
    reporting_threads: usize,
    /// Channel for sending scan results and status messages
    notifier: mpsc::Sender<ScanMessage>,
}

impl ARPScanner {
    /// Returns builder for ARPScanner
    pub fn builder() -> ARPScannerBuilder {
        ARPScannerBuilder::default()
    }

    fn process_target(
        &self,
        pkt_sender: &mut dyn Sender,
        target: Ipv4Addr,
    ) -> Result<()> {
        log::debug!("scanning ARP target: {}", target);

        let pkt_buf = ArpPacket::builder()
            .source_ip(self.interface.ipv4)
            .source_mac(self.interface.mac)
            .dest_ip(target)
            .build()?
            .to_raw()?;

        pkt_sender.send(&pkt_buf)
    }

    // Sends one request per host in the subnet. The first failure aborts the
    // remaining sends as the session is presumed broken.
    fn send_requests(&self) -> Result<()> {
        let targets =
            subnet::enumerate(self.interface.ipv4, self.interface.netmask);

        log::debug!("sending {} ARP requests", targets.len());

        let mut pkt_sender = self.wire.0.lock()?;

        for target in targets {
            self.process_target(&mut *pkt_sender, target)?;
        }

        Ok(())
    }

    fn process_incoming_packet(&self, pkt: &[u8], pool: &ThreadPool) {
        let Some(record) = arp_packet::parse(pkt) else {
            return;
        };

        if !record.is_reply() {
            return;
        }

        // our own requests echoed back, or anything else we authored
        if record.sender_mac == self.interface.mac {
            log::trace!("ignoring ARP reply from own hardware address");
            return;
        }

        let notifier = self.notifier.clone();
        let vendors = Arc::clone(&self.vendors);

        // hand off so vendor lookups never slow down packet reading
        pool.execute(move || {
            let device = Device {
                ip: record.sender_ip,
                mac: record.sender_mac,
                vendor: vendors.lookup(record.sender_mac).to_owned(),
            };

            log::debug!("found device: {:?}", device);

            if notifier.send(ScanMessage::ARPScanDevice(device)).is_err() {
                log::debug!("scan message receiver dropped");
            }
        });
    }

    // Implements packet reading in a separate thread so we can send and
    // receive packets simultaneously
    fn read_packets(
        &self,
        done: mpsc::Receiver<()>,
    ) -> Result<JoinHandle<Result<()>>> {
        let self_clone = self.clone();

        Ok(thread::spawn(move || -> Result<()> {
            let mut reader = self_clone.wire.1.lock()?;
            let pool = ThreadPool::new(self_clone.reporting_threads.max(1));

            let read_result = loop {
                // a dropped sender counts as a stop signal too
                if !matches!(done.try_recv(), Err(TryRecvError::Empty)) {
                    log::debug!("exiting arp packet reader");
                    break Ok(());
                }

                match reader.next_packet() {
                    Ok(Some(pkt)) => {
                        self_clone.process_incoming_packet(pkt, &pool)
                    }
                    Ok(None) => {}
                    Err(e) => break Err(e),
                }
            };

            // replies already handed off are reported before the stop is
            // acknowledged
            pool.join();

            read_result
        }))
    }
}

// Implements the Scanner trait for ARPScanner
impl Scanner for ARPScanner {
    fn scan(self) -> Result<JoinHandle<Result<()>>> {
        log::debug!(
            "performing ARP scan on {} via {}",
            self.interface.cidr,
            self.interface.name
        );
        log::debug!("observation window: {:?}", self.observation_window);
        log::debug!("starting arp packet reader");

        let (done_tx, done_rx) = mpsc::channel::<()>();

        let read_handle = self.read_packets(done_rx)?;

        let scanner = self;

        // prevent blocking thread so messages can be freely sent to consumer
        let scan_handle = thread::spawn(move || -> Result<()> {
            let send_result = scanner.send_requests();

            match &send_result {
                Ok(()) => {
                    log::debug!(
                        "all requests sent, waiting {:?} for replies",
                        scanner.observation_window
                    );
                    thread::sleep(scanner.observation_window);
                }
                Err(e) => log::error!("aborting ARP scan: {}", e),
            }

            // ignore errors here as the thread may already be dead due to
            // error; we'll catch any errors from that thread below
            let _ = done_tx.send(());

            let read_result = read_handle.join()?;

            // the listener's handles went with its thread, these are the last
            drop(scanner.wire);
            log::debug!("capture session released");

            let notify_result = scanner
                .notifier
                .send(ScanMessage::Done)
                .map_err(ScanError::from);

            send_result?;
            read_result?;
            notify_result
        });

        Ok(scan_handle)
    }
}

#[cfg(test)]
#[path = "./arp_scanner_tests.rs"]
mod tests;
