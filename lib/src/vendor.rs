//! Provides hardware vendor lookups keyed by the OUI of a MAC address
//!
//! The vendor data source is line oriented. Each line holds a 6 character hex
//! prefix followed by the vendor name:
//!
//! ```text
//! 000C29 VMware, Inc.
//! B827EB Raspberry Pi Foundation
//! ```

use itertools::Itertools;
use pnet::util::MacAddr;
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::error::{Result, ScanError};

/// Vendor reported for hardware addresses with no matching prefix
pub const UNKNOWN_VENDOR: &str = "unknown";

/// Read only mapping of 3 byte hardware address prefixes to vendor names
#[derive(Debug, Clone, Default)]
pub struct VendorTable {
    entries: HashMap<[u8; 3], String>,
}

impl VendorTable {
    /// Returns an empty table where every lookup is [`UNKNOWN_VENDOR`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a table from a line oriented source
    ///
    /// Malformed lines are skipped with a warning. When a prefix appears more
    /// than once the last entry wins.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut entries = HashMap::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let mut tokens = line.split_whitespace();

            let Some(prefix) = tokens.next() else {
                continue;
            };

            if prefix.starts_with('#') {
                continue;
            }

            let name = tokens.join(" ");

            match parse_prefix(prefix) {
                Some(key) if !name.is_empty() => {
                    if let Some(previous) = entries.insert(key, name) {
                        log::debug!(
                            "vendor prefix {} redefined on line {}, \
                             replacing {}",
                            prefix,
                            idx + 1,
                            previous
                        );
                    }
                }
                _ => {
                    log::warn!(
                        "skipping malformed vendor line {}: {}",
                        idx + 1,
                        line
                    );
                }
            }
        }

        Ok(Self { entries })
    }

    /// Loads a table from a file on disk
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::VendorLoad`] if the file cannot be opened or read
    pub fn from_path(path: &Path) -> Result<Self> {
        let load_error = |e: std::io::Error| ScanError::VendorLoad {
            path: path.display().to_string(),
            error: e.to_string(),
        };

        let file = File::open(path).map_err(load_error)?;
        Self::from_reader(BufReader::new(file)).map_err(load_error)
    }

    /// Loads a table from `path`, falling back to an empty table if there is
    /// no path or the file cannot be loaded
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::warn!(
                "no vendor data source found: all vendors will be reported \
                 as {}",
                UNKNOWN_VENDOR
            );
            return Self::new();
        };

        match Self::from_path(path) {
            Ok(table) => {
                log::debug!(
                    "loaded {} vendor prefixes from {}",
                    table.len(),
                    path.display()
                );
                table
            }
            Err(e) => {
                log::warn!(
                    "{}: all vendors will be reported as {}",
                    e,
                    UNKNOWN_VENDOR
                );
                Self::new()
            }
        }
    }

    /// Returns the vendor name for the OUI of `mac` or [`UNKNOWN_VENDOR`]
    pub fn lookup(&self, mac: MacAddr) -> &str {
        let MacAddr(a, b, c, ..) = mac;
        self.entries
            .get(&[a, b, c])
            .map(String::as_str)
            .unwrap_or(UNKNOWN_VENDOR)
    }

    /// Returns the number of prefixes in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no prefixes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_prefix(token: &str) -> Option<[u8; 3]> {
    if token.len() != 6 || !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let mut prefix = [0u8; 3];
    for (i, byte) in prefix.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&token[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(prefix)
}

#[cfg(test)]
#[path = "./vendor_tests.rs"]
mod tests;
