//! Line-level extraction for connection logs.
//!
//! A log is laid out as:
//!
//! ```text
//! <node_count> <edge_count>
//! <ip>                                   (node_count lines)
//! [timestamp] <src_ip>:<port> <dst_ip>:<port> <weight> [reason...]   (edge_count lines)
//! ```
//!
//! This module only slices text. It does not validate IP literals; that
//! is [`IpKey`](super::IpKey)'s job once the graph resolves an endpoint.

use thiserror::Error;

/// Error returned when a header or edge line is not in the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogFormatError {
    /// The header did not hold exactly two non-negative integers.
    #[error("malformed header `{line}`: expected `<node_count> <edge_count>`")]
    Header {
        /// The offending line.
        line: String,
    },
    /// No `ip:port ip:port weight` window was found on an edge line.
    #[error("malformed edge line `{line}`: expected `<ip>:<port> <ip>:<port> <weight>`")]
    Edge {
        /// The offending line.
        line: String,
    },
}

/// Counts declared by the first line of a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Number of node lines that follow.
    pub node_count: usize,
    /// Number of edge lines that follow the node lines.
    pub edge_count: usize,
}

/// The three fields of an edge line the graph consumes, plus ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord<'a> {
    /// Source IP text, not yet validated.
    pub source: &'a str,
    /// Source port.
    pub source_port: u16,
    /// Destination IP text, not yet validated.
    pub target: &'a str,
    /// Destination port.
    pub target_port: u16,
    /// Connection weight.
    pub weight: i64,
}

/// Parses `<node_count> <edge_count>`.
pub fn parse_header(line: &str) -> Result<Header, LogFormatError> {
    let err = || LogFormatError::Header {
        line: line.to_owned(),
    };
    let mut fields = line.split_whitespace();
    let node_count = fields.next().and_then(|f| f.parse().ok()).ok_or_else(err)?;
    let edge_count = fields.next().and_then(|f| f.parse().ok()).ok_or_else(err)?;
    if fields.next().is_some() {
        return Err(err());
    }
    Ok(Header {
        node_count,
        edge_count,
    })
}

/// Splits `host:port` at the last colon. The host must look like a
/// dotted quad (four dot-separated parts); octet ranges are not checked.
fn split_endpoint(token: &str) -> Option<(&str, u16)> {
    let (host, port) = token.rsplit_once(':')?;
    if host.split('.').count() != 4 {
        return None;
    }
    Some((host, port.parse().ok()?))
}

/// Extracts source, destination and weight from an edge line.
///
/// The fields are located as the first window of three whitespace
/// separated tokens shaped `ip:port ip:port weight`, so an optional
/// timestamp prefix (`Oct 9 10:32:24`) and trailing free text are skipped.
pub fn parse_edge_line(line: &str) -> Result<EdgeRecord<'_>, LogFormatError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    tokens
        .windows(3)
        .find_map(|window| {
            let (source, source_port) = split_endpoint(window[0])?;
            let (target, target_port) = split_endpoint(window[1])?;
            let weight = window[2].parse().ok()?;
            Some(EdgeRecord {
                source,
                source_port,
                target,
                target_port,
                weight,
            })
        })
        .ok_or_else(|| LogFormatError::Edge {
            line: line.to_owned(),
        })
}
