//! IPv4 node keys and connection-log line extraction.

pub mod ip_key;
pub mod log_format;

pub use ip_key::{parse_ipv4_value, IpKey, IpParseError};
pub use log_format::{parse_edge_line, parse_header, EdgeRecord, Header, LogFormatError};
