use serde::{Deserialize, Serialize};

use crate::models::{SecretValue, TxType};

/// Configuration for connecting to and interacting with a blockchain network.
///
/// Defines connection details and the chain-level tables the indexer needs:
/// RPC endpoints with rotation weights and the native-contract registry
/// (precompiled contracts such as the bridge that carry no code).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Network {
	/// Unique identifier for this network
	pub slug: String,

	/// Human-readable name of the network
	pub name: String,

	/// List of RPC endpoints with their weights for load balancing
	pub rpc_urls: Vec<RpcUrl>,

	/// Chain ID of the network
	pub chain_id: Option<u64>,

	/// Native (precompiled) contracts of the chain
	#[serde(default)]
	pub native_contracts: Vec<NativeContract>,
}

impl Network {
	/// Look up a native contract by address (case-insensitive).
	pub fn native_contract(&self, address: &str) -> Option<&NativeContract> {
		let needle = address.trim().to_lowercase();
		self.native_contracts
			.iter()
			.find(|c| c.address.to_lowercase() == needle)
	}
}

/// RPC endpoint configuration with load balancing weight
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RpcUrl {
	/// Type of RPC endpoint (e.g. "rpc")
	pub type_: String,

	/// URL of the RPC endpoint (can be a secret value)
	pub url: SecretValue,

	/// Weight for load balancing (0-100)
	pub weight: u32,
}

/// A chain-native (precompiled) contract.
///
/// Native contracts exist at fixed addresses and may expose no bytecode;
/// the indexer classifies them as contracts from this table and labels
/// transactions to them with the configured type.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NativeContract {
	/// Fixed address of the contract
	pub address: String,

	/// Configured name (e.g. "bridge", "remasc")
	pub name: String,
}

impl NativeContract {
	/// Transaction type label for calls into this contract.
	pub fn tx_type(&self) -> TxType {
		TxType::Native(self.name.clone())
	}
}
