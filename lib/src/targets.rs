//! Provides helpers for generating the list of hosts to scan

pub mod subnet;
