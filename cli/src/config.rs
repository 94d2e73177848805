//! Scan configuration built once from command line flags

use directories::ProjectDirs;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// File name looked up in the default vendor data locations
pub const VENDOR_FILE_NAME: &str = "mac-fab.txt";

/// Everything the scan needs to know that isn't resolved at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to scan on, or the default interface when `None`
    pub interface: Option<String>,
    /// Time to wait for replies after the last request
    pub observation_window: Duration,
    /// Time a blocked read waits before checking for cancellation
    pub read_timeout: Duration,
    /// Number of workers handling replies
    pub reporting_threads: usize,
    /// Vendor data source, if one could be found
    pub vendor_file: Option<PathBuf>,
}

/// Returns the locations searched for vendor data when none is given, in
/// order of preference
pub fn default_vendor_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(dirs) = ProjectDirs::from("", "", "r-arpscan") {
        paths.push(dirs.data_dir().join(VENDOR_FILE_NAME));
    }

    paths.push(PathBuf::from(VENDOR_FILE_NAME));

    paths
}

/// An explicit path always wins, even if it doesn't exist, so the user hears
/// about it when loading fails. Otherwise the first existing candidate is
/// used.
pub fn resolve_vendor_path(
    explicit: Option<&Path>,
    candidates: &[PathBuf],
) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| candidates.iter().find(|p| p.is_file()).cloned())
}

#[cfg(test)]
#[path = "./config_tests.rs"]
mod tests;
