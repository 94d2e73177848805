//! CLI for discovering live hosts on the local IPv4 subnet with ARP
//!
//! # Examples
//!
//! ```bash
//! # help menu
//! sudo r-arpscan --help
//!
//! # scan the subnet of the default interface
//! sudo r-arpscan
//!
//! # scan on a specific interface with a longer observation window
//! sudo r-arpscan -i eth0 -w 10s --vendor-file ./mac-fab.txt
//! ```
use clap::Parser;
use color_eyre::eyre::Result;
use log::*;
use r_arplib::{
    error::ScanError,
    network::{self, NetworkInterface},
    packet::wire,
    scanners::{
        DEFAULT_REPORTING_THREADS, Device, ScanMessage, Scanner,
        arp_scanner::ARPScanner,
    },
    vendor::VendorTable,
};
use std::{
    collections::HashSet,
    io::{self, Write},
    path::PathBuf,
    sync::mpsc::{self, Receiver},
    time::Duration,
};

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// CLI for discovering live hosts on the local IPv4 subnet with ARP
struct Args {
    /// Choose a specific network interface for the scan
    #[arg(short, long)]
    interface: Option<String>,

    /// Vendor data file with one "<hex prefix> <vendor name>" per line
    #[arg(long)]
    vendor_file: Option<PathBuf>,

    /// How long to wait for replies after all requests are sent, i.e. 3s
    #[arg(
        short = 'w',
        long,
        default_value = "3s",
        value_parser = humantime::parse_duration
    )]
    observation_window: Duration,

    /// How long a blocked read waits before checking whether to stop
    #[arg(
        long,
        default_value = "250ms",
        value_parser = humantime::parse_duration
    )]
    read_timeout: Duration,

    /// Number of workers performing vendor lookups for replies
    #[arg(long, default_value_t = DEFAULT_REPORTING_THREADS)]
    reporting_threads: usize,

    /// Only print discovered hosts and errors
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// Prints debug logs including those from r-arplib
    #[arg(long, default_value_t = false)]
    debug: bool,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            interface: args.interface.clone(),
            observation_window: args.observation_window,
            read_timeout: args.read_timeout,
            reporting_threads: args.reporting_threads,
            vendor_file: config::resolve_vendor_path(
                args.vendor_file.as_deref(),
                &config::default_vendor_paths(),
            ),
        }
    }
}

#[doc(hidden)]
fn initialize_logger(args: &Args) -> Result<()> {
    let filter = if args.quiet {
        simplelog::LevelFilter::Error
    } else if args.debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    simplelog::TermLogger::init(
        filter,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[doc(hidden)]
fn print_config(config: &Config, interface: &NetworkInterface) {
    info!("configuration:");
    info!("interface:          {}", interface.name);
    info!("cidr:               {}", interface.cidr);
    info!("user_ip:            {}", interface.ipv4);
    info!("user_mac:           {}", interface.mac);
    info!("observation_window: {:?}", config.observation_window);
    info!("read_timeout:       {:?}", config.read_timeout);
    info!("reporting_threads:  {}", config.reporting_threads);
    info!(
        "vendor_file:        {}",
        config
            .vendor_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    );
}

#[doc(hidden)]
fn format_row(ip: &str, mac: &str, vendor: &str) -> String {
    format!("{:<20} {:<20} {}", ip, mac, vendor)
}

#[doc(hidden)]
fn format_device(device: &Device) -> String {
    format_row(
        &device.ip.to_string(),
        &device.mac.to_string(),
        &device.vendor,
    )
}

#[doc(hidden)]
fn print_header(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", format_row("IPv4", "MAC", "Hardware"))?;
    writeln!(out, "{}", "=".repeat(67))?;
    out.flush()
}

#[doc(hidden)]
fn process_arp(
    scanner: impl Scanner,
    rx: Receiver<ScanMessage>,
    out: &mut impl Write,
) -> Result<usize> {
    let mut seen = HashSet::new();

    let handle = scanner.scan()?;

    while let Ok(msg) = rx.recv() {
        match msg {
            ScanMessage::ARPScanDevice(device) => {
                debug!("received scanning message: {:?}", device);
                // hosts may answer more than once
                if seen.insert((device.ip, device.mac)) {
                    writeln!(out, "{}", format_device(&device))?;
                    out.flush()?;
                }
            }
            ScanMessage::Done => {
                debug!("scanning complete");
                break;
            }
        }
    }

    handle.join().map_err(ScanError::from)??;

    Ok(seen.len())
}

#[doc(hidden)]
#[cfg(unix)]
fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[doc(hidden)]
#[cfg(windows)]
fn is_root() -> bool {
    // On Windows, check if running as Administrator
    // raw socket operations require admin privileges
    use std::process::Command;
    Command::new("net")
        .args(["session"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[doc(hidden)]
fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    initialize_logger(&args)?;

    let config = Config::from(&args);

    if !is_root() {
        warn!("not running with root privileges: capture may be denied");
    }

    let interface = match &config.interface {
        Some(name) => network::get_interface(name)?,
        None => network::get_default_interface()?,
    };

    print_config(&config, &interface);

    let vendors = VendorTable::load_or_empty(config.vendor_file.as_deref());

    let wire = wire::open(&interface, config.read_timeout)?;

    info!(
        "scanning on {}: {} [{}]",
        interface.name, interface.ipv4, interface.cidr
    );

    // not locked: log lines from the scan threads share stdout
    let mut out = io::stdout();

    print_header(&mut out)?;

    let (tx, rx) = mpsc::channel::<ScanMessage>();

    let scanner = ARPScanner::builder()
        .interface(interface)
        .wire(wire)
        .vendors(vendors)
        .observation_window(config.observation_window)
        .reporting_threads(config.reporting_threads)
        .notifier(tx)
        .build()
        .map_err(ScanError::from)?;

    let found = process_arp(scanner, rx, &mut out)?;

    info!("found {} hosts", found);

    Ok(())
}

#[cfg(test)]
#[path = "./main_tests.rs"]
mod tests;
