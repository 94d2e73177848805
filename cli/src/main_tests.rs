use mockall::mock;
use pnet::util::MacAddr;
use r_arplib::packet::wire::DEFAULT_READ_TIMEOUT;
use std::{
    net::Ipv4Addr,
    thread::{self, JoinHandle},
};

use super::*;

mock! {
    ArpScanner {}
    impl Scanner for ArpScanner {
        fn scan(
            self,
        ) -> r_arplib::error::Result<
            JoinHandle<r_arplib::error::Result<()>>,
        >;
    }
}

fn default_args() -> Args {
    Args {
        interface: Some("interface_name".to_string()),
        vendor_file: None,
        observation_window: Duration::from_secs(3),
        read_timeout: DEFAULT_READ_TIMEOUT,
        reporting_threads: DEFAULT_REPORTING_THREADS,
        quiet: false,
        debug: false,
    }
}

fn device(ip: Ipv4Addr, mac: MacAddr, vendor: &str) -> Device {
    Device {
        ip,
        mac,
        vendor: vendor.to_string(),
    }
}

fn test_interface() -> NetworkInterface {
    NetworkInterface {
        name: "test0".to_string(),
        description: String::new(),
        ipv4: Ipv4Addr::new(192, 168, 1, 10),
        netmask: Ipv4Addr::new(255, 255, 255, 0),
        prefix: 24,
        cidr: "192.168.1.0/24".to_string(),
        mac: MacAddr::new(0x02, 0, 0, 0, 0, 0x01),
        ips: vec![],
        flags: 0,
        index: 1,
    }
}

// Scanner whose scan thread replays `messages` and then returns `result`
fn replaying_scanner(
    messages: Vec<ScanMessage>,
    result: r_arplib::error::Result<()>,
) -> (MockArpScanner, Receiver<ScanMessage>) {
    let (tx, rx) = mpsc::channel();
    let mut scanner = MockArpScanner::new();
    let mut replay = Some((messages, result));

    scanner.expect_scan().times(1).returning(move || {
        let (messages, result) = replay.take().unwrap();
        let tx = tx.clone();
        Ok(thread::spawn(move || {
            for msg in messages {
                tx.send(msg).unwrap();
            }
            result
        }))
    });

    (scanner, rx)
}

#[test]
fn builds_config_from_args() {
    let mut args = default_args();
    args.vendor_file = Some(PathBuf::from("/tmp/vendors.txt"));
    args.observation_window = Duration::from_millis(500);

    let config = Config::from(&args);

    assert_eq!(config.interface.as_deref(), Some("interface_name"));
    assert_eq!(config.observation_window, Duration::from_millis(500));
    assert_eq!(config.read_timeout, DEFAULT_READ_TIMEOUT);
    assert_eq!(config.reporting_threads, DEFAULT_REPORTING_THREADS);
    assert_eq!(config.vendor_file, Some(PathBuf::from("/tmp/vendors.txt")));
}

#[test]
fn parses_humantime_flags() {
    let args = Args::try_parse_from([
        "r-arpscan",
        "-i",
        "eth0",
        "-w",
        "1m 30s",
        "--read-timeout",
        "100ms",
    ])
    .unwrap();

    assert_eq!(args.interface.as_deref(), Some("eth0"));
    assert_eq!(args.observation_window, Duration::from_secs(90));
    assert_eq!(args.read_timeout, Duration::from_millis(100));
}

#[test]
fn defaults_observation_window_to_three_seconds() {
    let args = Args::try_parse_from(["r-arpscan"]).unwrap();
    assert_eq!(args.observation_window, Duration::from_secs(3));
    assert_eq!(args.interface, None);
}

#[test]
fn prints_config() {
    let config = Config::from(&default_args());
    print_config(&config, &test_interface());
}

#[test]
fn initializes_logger() {
    initialize_logger(&default_args()).unwrap();
}

#[test]
fn prints_fixed_width_header() {
    let mut out = Vec::new();
    print_header(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 2);
    let header = "IPv4                 MAC                  Hardware";
    assert!(lines[0].starts_with(header));
    assert!(lines[1].chars().all(|c| c == '='));
}

#[test]
fn formats_device_with_vendor() {
    let line = format_device(&device(
        Ipv4Addr::new(192, 168, 1, 2),
        MacAddr::new(0xaa, 0xbb, 0xcc, 0x11, 0x22, 0x33),
        "ExampleCorp",
    ));

    assert_eq!(
        line,
        "192.168.1.2          aa:bb:cc:11:22:33    ExampleCorp"
    );
}

#[test]
fn streams_discovered_devices() {
    let (scanner, rx) = replaying_scanner(
        vec![
            ScanMessage::ARPScanDevice(device(
                Ipv4Addr::new(192, 168, 1, 2),
                MacAddr::new(0xaa, 0xbb, 0xcc, 0x11, 0x22, 0x33),
                "ExampleCorp",
            )),
            ScanMessage::ARPScanDevice(device(
                Ipv4Addr::new(192, 168, 1, 3),
                MacAddr::new(0x00, 0x11, 0x22, 0x33, 0x44, 0x55),
                "unknown",
            )),
            // same host answering twice
            ScanMessage::ARPScanDevice(device(
                Ipv4Addr::new(192, 168, 1, 2),
                MacAddr::new(0xaa, 0xbb, 0xcc, 0x11, 0x22, 0x33),
                "ExampleCorp",
            )),
            ScanMessage::Done,
        ],
        Ok(()),
    );

    let mut out = Vec::new();
    let found = process_arp(scanner, rx, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(found, 2);
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("aa:bb:cc:11:22:33    ExampleCorp"));
    assert!(text.contains("00:11:22:33:44:55    unknown"));
}

#[test]
fn reports_scan_errors() {
    let (scanner, rx) = replaying_scanner(
        vec![ScanMessage::Done],
        Err(ScanError::Write("oh no a send error".into())),
    );

    let mut out = Vec::new();
    let res = process_arp(scanner, rx, &mut out);

    assert!(res.is_err());
    assert!(out.is_empty());
}

#[test]
fn reports_scan_start_errors() {
    let (_tx, rx) = mpsc::channel();
    let mut scanner = MockArpScanner::new();
    scanner.expect_scan().returning(|| {
        Err(ScanError::CaptureOpen {
            interface: "test0".into(),
            error: "permission denied".into(),
        })
    });

    let mut out = Vec::new();
    let res = process_arp(scanner, rx, &mut out);

    assert!(res.is_err());
}
