//! Custom Error and Result types for this library

use std::{
    any::Any,
    sync::{MutexGuard, PoisonError, mpsc::SendError},
};
use thiserror::Error;

use crate::{
    packet::{Reader, Sender, arp_packet::ArpPacketBuilderError},
    scanners::{ScanMessage, arp_scanner::ARPScannerBuilderError},
};

/// Custom Error type for this library
#[derive(Error, Debug)]
pub enum ScanError {
    /// The interface to scan is missing, down or has no usable IPv4 address
    #[error("interface precondition failed: {_0}")]
    Precondition(String),

    /// The capture session could not be opened on the interface
    #[error("failed to open capture session on {interface}: {error}")]
    CaptureOpen {
        /// Name of the interface the session was opened on
        interface: String,
        /// The underlying failure
        error: String,
    },

    /// A request frame could not be put on the wire
    #[error("failed to write frame: {_0}")]
    Write(String),

    /// Reading off the wire failed for a reason other than a read timeout
    #[error("failed to read frame: {_0}")]
    Read(String),

    /// The vendor data source could not be read
    #[error("failed to load vendor data from {path}: {error}")]
    VendorLoad {
        /// Path of the vendor data source
        path: String,
        /// The underlying failure
        error: String,
    },

    /// A request frame could not be assembled from the provided fields
    #[error("failed to serialize frame: {_0}")]
    Serialization(String),

    /// Error resulting from failure to build ARP scanner
    #[error("failed to build arp scanner: {_0}")]
    ArpScannerBuild(#[from] ARPScannerBuilderError),

    /// The consumer of scan messages went away
    #[error("failed to send notification message: {_0}")]
    Notifier(#[from] SendError<ScanMessage>),

    /// Error obtaining lock on packet reader
    #[error("failed to get lock on packet reader: {_0}")]
    ReaderLock(String),

    /// Error obtaining lock on packet sender
    #[error("failed to get lock on packet sender: {_0}")]
    SenderLock(String),

    /// Generic thread error
    #[error("thread error: {_0}")]
    Thread(String),
}

impl From<Box<dyn Any + Send>> for ScanError {
    fn from(value: Box<dyn Any + Send>) -> Self {
        if let Some(s) = value.downcast_ref::<&'static str>() {
            Self::Thread(format!("Thread panicked with: {}", s))
        } else if let Some(s) = value.downcast_ref::<String>() {
            Self::Thread(format!("Thread panicked with: {}", s))
        } else {
            Self::Thread("Thread panicked with an unknown type".into())
        }
    }
}

impl<'a> From<PoisonError<MutexGuard<'a, dyn Reader + 'static>>> for ScanError {
    fn from(value: PoisonError<MutexGuard<'a, dyn Reader + 'static>>) -> Self {
        Self::ReaderLock(value.to_string())
    }
}

impl<'a> From<PoisonError<MutexGuard<'a, dyn Sender + 'static>>> for ScanError {
    fn from(value: PoisonError<MutexGuard<'a, dyn Sender + 'static>>) -> Self {
        Self::SenderLock(value.to_string())
    }
}

impl From<ArpPacketBuilderError> for ScanError {
    fn from(value: ArpPacketBuilderError) -> Self {
        Self::Serialization(value.to_string())
    }
}

/// Custom Result type for this library. All Errors exposed by this library
/// will be returned as [`ScanError`]
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;
