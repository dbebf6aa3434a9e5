//! Parsing utilities
//!
//! Small argument-parsing helpers shared by the CLI and the logging setup.

use byte_unit::Byte;
use std::str::FromStr;

/// Parses a human-readable size string into a byte count.
///
/// Accepts both decimal and binary units ("500MB", "1GiB", "1024KB").
/// Used as a clap value parser for the log rotation size flag.
pub fn parse_string_to_bytes_size(s: &str) -> Result<u64, String> {
	Byte::from_str(s)
		.map(|byte| byte.as_u64())
		.map_err(|e| format!("Invalid size format: '{}'. Error: {}", s, e))
}
