//! Probe target addresses.

use std::fmt;

use thiserror::Error;

/// Delimiter separating entries in the configured host list.
pub const HOST_LIST_DELIMITER: char = ',';

/// Errors from constructing a [`HostAddress`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostAddressError {
    /// Address is empty after trimming.
    #[error("host address is empty")]
    Empty,

    /// Address contains the list delimiter.
    #[error("host address '{0}' contains the list delimiter")]
    ContainsDelimiter(String),
}

/// A single probe target: an IP literal or DNS name.
///
/// Always trimmed, never empty, never containing the list delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAddress(String);

impl HostAddress {
    /// Create a host address, trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns `HostAddressError` if the trimmed value is empty or contains
    /// the list delimiter.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, HostAddressError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(HostAddressError::Empty);
        }
        if trimmed.contains(HOST_LIST_DELIMITER) {
            return Err(HostAddressError::ContainsDelimiter(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<HostAddress> for String {
    fn from(host: HostAddress) -> Self {
        host.0
    }
}

/// Parse a comma-separated host list into an ordered address sequence.
///
/// Entries are trimmed; empty entries are discarded. Order is preserved.
pub fn parse_host_list(input: &str) -> Vec<HostAddress> {
    input
        .split(HOST_LIST_DELIMITER)
        .filter_map(|entry| HostAddress::new(entry).ok())
        .collect()
}
