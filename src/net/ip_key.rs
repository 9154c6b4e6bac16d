//! `IpKey`: one IPv4 node of the connection graph.
//!
//! An `IpKey` carries the canonical dotted text, the big-endian numeric
//! value, the dense node id assigned at load time and the two degree
//! counters. Equality and ordering look at the numeric value only.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;
use std::net::Ipv4Addr;

use serde::Serialize;
use thiserror::Error;

/// Error returned when text is not a dotted-quad IPv4 literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IpParseError {
    /// The text did not split into exactly four dot-separated parts.
    #[error("invalid IPv4 address `{text}`: expected 4 octets, found {found}")]
    OctetCount {
        /// Offending input.
        text: String,
        /// Number of dot-separated parts found.
        found: usize,
    },
    /// One part was not a decimal number in `0..=255`.
    #[error("invalid IPv4 address `{text}`: octet `{octet}` is not in 0..=255")]
    InvalidOctet {
        /// Offending input.
        text: String,
        /// The part that failed to parse.
        octet: String,
    },
}

/// Parses a dotted-quad literal into its big-endian `u32` value.
///
/// Surrounding whitespace is ignored. Each octet must be plain decimal
/// digits (no sign) with a value in `0..=255`.
///
/// ```
/// assert_eq!(ipgraph::net::parse_ipv4_value("192.168.1.1"), Ok(3_232_235_777));
/// ```
pub fn parse_ipv4_value(text: &str) -> Result<u32, IpParseError> {
    let trimmed = text.trim();
    let mut octets = [0u8; 4];
    let mut found = 0usize;
    for part in trimmed.split('.') {
        if found < 4 {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(IpParseError::InvalidOctet {
                    text: trimmed.to_owned(),
                    octet: part.to_owned(),
                });
            }
            octets[found] = part.parse::<u8>().map_err(|_| IpParseError::InvalidOctet {
                text: trimmed.to_owned(),
                octet: part.to_owned(),
            })?;
        }
        found += 1;
    }
    if found != 4 {
        return Err(IpParseError::OctetCount {
            text: trimmed.to_owned(),
            found,
        });
    }
    Ok(u32::from_be_bytes(octets))
}

/// A graph node keyed by its IPv4 address.
///
/// Only serializable: keys are created by parsing text, so the stored
/// value always matches the text.
#[derive(Debug, Clone, Serialize)]
pub struct IpKey {
    text: String,
    value: u32,
    node_id: usize,
    degree_in: usize,
    degree_out: usize,
}

impl IpKey {
    /// Parses `text` and tags it with `node_id`. Both degrees start at zero.
    pub fn new(text: &str, node_id: usize) -> Result<Self, IpParseError> {
        let value = parse_ipv4_value(text)?;
        Ok(Self::from_value(value, node_id))
    }

    /// Builds a key straight from a numeric value.
    pub fn from_value(value: u32, node_id: usize) -> Self {
        Self {
            text: Ipv4Addr::from(value).to_string(),
            value,
            node_id,
            degree_in: 0,
            degree_out: 0,
        }
    }

    /// Canonical dotted text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Big-endian numeric value, `a·256³ + b·256² + c·256 + d`.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// The four octets, most significant first.
    pub fn octets(&self) -> [u8; 4] {
        self.value.to_be_bytes()
    }

    /// Dense node id assigned when the node line was read.
    pub fn node_id(&self) -> usize {
        self.node_id
    }

    /// Number of edges terminating at this node.
    pub fn degree_in(&self) -> usize {
        self.degree_in
    }

    /// Number of edges originating from this node.
    pub fn degree_out(&self) -> usize {
        self.degree_out
    }

    pub(crate) fn increment_degree_in(&mut self) {
        self.degree_in += 1;
    }

    pub(crate) fn increment_degree_out(&mut self) {
        self.degree_out += 1;
    }
}

impl FromStr for IpKey {
    type Err = IpParseError;

    /// Parses with node id 0; useful for lookup probes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s, 0)
    }
}

impl From<&IpKey> for Ipv4Addr {
    fn from(key: &IpKey) -> Self {
        Ipv4Addr::from(key.value)
    }
}

impl PartialEq for IpKey {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for IpKey {}

impl PartialOrd for IpKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IpKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for IpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
