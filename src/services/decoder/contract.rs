//! Contract decoder handle.
//!
//! A `Contract` binds an address to an ABI and decodes receipt logs against
//! it. It also accumulates token-holder addresses observed in decoded
//! arguments so the pipeline can register them after the decode loop.

use alloy::{core::dyn_abi::EventExt, json_abi::AbiItem, primitives::LogData};
use tracing::debug;

use crate::{
	models::{EVMContractSpec, EVMDecodedEvent, EVMDecodedParamEntry, EVMReceiptLog},
	services::decoder::helpers::{format_token_value, normalize_address},
};

/// Decoder handle for one contract address
#[derive(Debug, Clone)]
pub struct Contract {
	/// Contract address, normalized lowercase
	address: String,

	/// Optional configured name
	name: Option<String>,

	/// ABI used for decoding
	spec: EVMContractSpec,

	/// Addresses observed in decoded address-typed arguments
	token_addresses: Vec<String>,
}

impl Contract {
	/// Creates a decoder handle for an address with the given ABI
	pub fn new(address: &str, name: Option<String>, spec: EVMContractSpec) -> Self {
		Self {
			address: normalize_address(address),
			name,
			spec,
			token_addresses: Vec::new(),
		}
	}

	/// The contract address, lowercase
	pub fn address(&self) -> &str {
		&self.address
	}

	/// The configured name, if any
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Decodes a single receipt log against this contract's ABI.
	///
	/// Returns `None` when no event fragment matches the log's first topic
	/// or when the payload does not decode against the matched fragment.
	pub fn decode_log(&self, log: &EVMReceiptLog) -> Option<EVMDecodedEvent> {
		let first_topic = log.topics.first()?;

		// Find the matching event fragment
		let event = self
			.spec
			.items()
			.filter_map(|item| match item {
				AbiItem::Event(e) => Some(e),
				_ => None,
			})
			.find(|e| e.selector() == *first_topic)?;

		// Decode event in one call (covering non-indexed and indexed params)
		let log_data = match LogData::new(log.topics.clone(), log.data.clone()) {
			Some(data) => data,
			None => {
				debug!(address = %self.address, "failed to build log data for decoding");
				return None;
			}
		};
		let decoded = match event.decode_log(&log_data) {
			Ok(decoded) => decoded,
			Err(e) => {
				debug!(address = %self.address, error = %e, "failed to decode log data");
				return None;
			}
		};

		// Both iterators follow the exact field sequence declared in the ABI
		let mut indexed_vals = decoded.indexed.into_iter().map(|v| format_token_value(&v));
		let mut body_vals = decoded.body.into_iter().map(|v| format_token_value(&v));

		let args: Vec<_> = event
			.inputs
			.iter()
			.map(|param| {
				let (value, indexed) = if param.indexed {
					(indexed_vals.next().unwrap_or_default(), true)
				} else {
					(body_vals.next().unwrap_or_default(), false)
				};

				EVMDecodedParamEntry {
					name: param.name.clone(),
					value,
					kind: param.ty.to_string(),
					indexed,
				}
			})
			.collect();

		Some(EVMDecodedEvent {
			name: event.name.clone(),
			signature: format!(
				"{}({})",
				event.name,
				event
					.inputs
					.iter()
					.map(|p| p.selector_type())
					.collect::<Vec<_>>()
					.join(",")
			),
			args,
		})
	}

	/// Decodes a slice of logs, one entry per log, receipt order preserved
	pub fn parse_logs(&self, logs: &[EVMReceiptLog]) -> Vec<Option<EVMDecodedEvent>> {
		logs.iter().map(|log| self.decode_log(log)).collect()
	}

	/// Addresses referenced by a decoded event's address-typed arguments
	pub fn extract_addresses(&self, event: &EVMDecodedEvent) -> Vec<String> {
		event.referenced_addresses()
	}

	/// Records an address in the token-holder accumulator
	pub fn add_address(&mut self, address: &str) {
		let normalized = normalize_address(address);
		if !self.token_addresses.contains(&normalized) {
			self.token_addresses.push(normalized);
		}
	}

	/// Addresses accumulated from decoded arguments, in observation order
	pub fn fetch_token_holder_addresses(&self) -> Vec<String> {
		self.token_addresses.clone()
	}
}
