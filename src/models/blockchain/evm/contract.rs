//! EVM contract ABI data structures.

use serde::{Deserialize, Serialize};

/// Contract specification for an EVM smart contract
///
/// This structure represents the parsed specification of an EVM smart
/// contract, following the Ethereum Contract ABI format. The indexer uses
/// the event fragments to decode receipt logs.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct ContractSpec(pub alloy::json_abi::JsonAbi);

/// Convert a JsonAbi to a ContractSpec
impl From<alloy::json_abi::JsonAbi> for ContractSpec {
	fn from(spec: alloy::json_abi::JsonAbi) -> Self {
		Self(spec)
	}
}

/// Convert a serde_json::Value to a ContractSpec
impl From<serde_json::Value> for ContractSpec {
	fn from(spec: serde_json::Value) -> Self {
		let spec = serde_json::from_value(spec).unwrap_or_else(|e| {
			tracing::error!("Error parsing contract spec: {:?}", e);
			alloy::json_abi::JsonAbi::new()
		});
		Self(spec)
	}
}

/// Display a ContractSpec
impl std::fmt::Display for ContractSpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match serde_json::to_string(self) {
			Ok(s) => write!(f, "{}", s),
			Err(e) => {
				tracing::error!("Error serializing contract spec: {:?}", e);
				write!(f, "")
			}
		}
	}
}

/// Dereference a ContractSpec
impl std::ops::Deref for ContractSpec {
	type Target = alloy::json_abi::JsonAbi;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Single decoded parameter from an event
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DecodedParamEntry {
	/// Parameter name
	pub name: String,

	/// Parameter value
	pub value: String,

	/// Whether this is an indexed parameter
	pub indexed: bool,

	/// Parameter type (uint256, address, etc)
	pub kind: String,
}

/// Event decoded against a contract ABI
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DecodedEvent {
	/// Event name (e.g. "Transfer")
	pub name: String,

	/// Event signature (e.g. "Transfer(address,address,uint256)")
	pub signature: String,

	/// Decoded argument values
	pub args: Vec<DecodedParamEntry>,
}

impl DecodedEvent {
	/// Addresses referenced by address-typed arguments, in argument order,
	/// deduplicated, lowercase.
	pub fn referenced_addresses(&self) -> Vec<String> {
		let mut addresses = Vec::new();
		for arg in self.args.iter().filter(|a| a.kind == "address") {
			let value = arg.value.to_lowercase();
			if !addresses.contains(&value) {
				addresses.push(value);
			}
		}
		addresses
	}
}
