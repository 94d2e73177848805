use std::{env, path::Path, sync::mpsc, time::Duration};

use r_arplib::{
    network,
    packet::wire,
    scanners::{Device, ScanMessage, Scanner, arp_scanner::ARPScanner},
    vendor::VendorTable,
};

fn is_root() -> bool {
    match env::var("USER") {
        Ok(val) => val == "root",
        Err(_e) => false,
    }
}

fn main() {
    if !is_root() {
        panic!("permission denied: must run with root privileges");
    }

    let interface =
        network::get_default_interface().expect("cannot find interface");
    let vendors = VendorTable::load_or_empty(Some(Path::new("mac-fab.txt")));
    let wire = wire::open(&interface, wire::DEFAULT_READ_TIMEOUT)
        .expect("failed to open capture session");
    let (tx, rx) = mpsc::channel::<ScanMessage>();

    let scanner = ARPScanner::builder()
        .interface(interface)
        .wire(wire)
        .vendors(vendors)
        .observation_window(Duration::from_secs(3))
        .notifier(tx)
        .build()
        .expect("failed to build scanner");

    let mut results: Vec<Device> = Vec::new();

    let handle = scanner.scan().expect("failed to start scan");

    loop {
        let msg = rx.recv().expect("failed to poll for messages");

        match msg {
            ScanMessage::Done => {
                println!("scanning complete");
                break;
            }
            ScanMessage::ARPScanDevice(device) => results.push(device),
        }
    }

    if let Err(e) = handle.join() {
        panic!("error: {:?}", e);
    }

    println!("results: {:?}", results);
}
