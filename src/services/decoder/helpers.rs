//! Helper functions for EVM-specific operations.
//!
//! This module provides utility functions for working with EVM-specific data types
//! and formatting, including hash validation, address normalization, and token
//! value formatting.

use alloy::core::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
	static ref ADDRESS_RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
	static ref HASH_RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{64}$").unwrap();
}

/// Checks whether a string is a well-formed 20-byte hex address.
pub fn is_address(value: &str) -> bool {
	ADDRESS_RE.is_match(value)
}

/// Checks whether a string is a well-formed 32-byte hex hash
/// (transaction or block hash).
pub fn is_hash(value: &str) -> bool {
	HASH_RE.is_match(value)
}

/// Checks whether a code blob represents deployed bytecode.
///
/// A missing blob, `0x`, or an all-zero blob all mean no code.
pub fn has_code(code: &str) -> bool {
	let hex = code.strip_prefix("0x").unwrap_or(code);
	!hex.is_empty() && hex.chars().any(|c| c != '0')
}

/// Converts a B256 hash to its hexadecimal string representation.
pub fn b256_to_string(hash: B256) -> String {
	format!("0x{}", hex::encode(hash.as_slice()))
}

/// Converts a hexadecimal string to a B256 hash.
///
/// # Errors
/// Returns an error if the input string is not valid 32-byte hexadecimal
pub fn string_to_b256(hash_string: &str) -> Result<B256, Box<dyn std::error::Error>> {
	let hash_without_prefix = hash_string.strip_prefix("0x").unwrap_or(hash_string);
	let hash_bytes = hex::decode(hash_without_prefix)?;
	if hash_bytes.len() != 32 {
		return Err(format!("Invalid hash length: {}", hash_bytes.len()).into());
	}
	Ok(B256::from_slice(&hash_bytes))
}

/// Converts an H160 address to its hexadecimal string representation.
pub fn h160_to_string(address: Address) -> String {
	format!("0x{}", hex::encode(address.as_slice()))
}

/// Compares two addresses for equality, ignoring case and "0x" prefixes.
pub fn are_same_address(address1: &str, address2: &str) -> bool {
	normalize_address(address1) == normalize_address(address2)
}

/// Normalizes an address string by trimming spaces and converting to
/// lowercase, keeping the "0x" prefix.
pub fn normalize_address(address: &str) -> String {
	let trimmed = address.replace(' ', "").to_lowercase();
	if trimmed.starts_with("0x") {
		trimmed
	} else {
		format!("0x{}", trimmed)
	}
}

/// Formats a DynSolValue into a consistent string representation.
///
/// # Arguments
/// * `token` - The DynSolValue to format
///
/// # Returns
/// A string representation of the token value, with appropriate formatting
/// based on the token type
pub fn format_token_value(token: &DynSolValue) -> String {
	match token {
		DynSolValue::Address(addr) => format!("0x{:x}", addr),
		DynSolValue::FixedBytes(bytes, _) => format!("0x{}", hex::encode(bytes)),
		DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
		DynSolValue::Int(num, _) => num.to_string(),
		DynSolValue::Uint(num, _) => num.to_string(),
		DynSolValue::Bool(b) => b.to_string(),
		DynSolValue::String(s) => s.clone(),
		DynSolValue::Array(arr) | DynSolValue::FixedArray(arr) => {
			format!(
				"[{}]",
				arr.iter()
					.map(format_token_value)
					.collect::<Vec<String>>()
					.join(",")
			)
		}
		DynSolValue::Tuple(tuple) => {
			format!(
				"({})",
				tuple
					.iter()
					.map(format_token_value)
					.collect::<Vec<String>>()
					.join(",")
			)
		}
		DynSolValue::Function(selector) => format!("0x{}", hex::encode(selector)),
	}
}
