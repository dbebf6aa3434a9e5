//! Contract resolution.
//!
//! Resolves an address at a given height to a `Contract` decoder handle,
//! probing for deployed code and binding the configured ABI (or the
//! built-in token-event fallback when no ABI is configured).

use async_trait::async_trait;
use lazy_static::lazy_static;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use crate::{
	models::{ContractAbi, EVMContractSpec, Network},
	services::{
		blockchain::NodeClient,
		decoder::{
			contract::Contract,
			error::DecoderError,
			helpers::{has_code, is_address, normalize_address},
		},
	},
};

lazy_static! {
	/// Common token event fragments (ERC-20 Transfer/Approval and ERC-721
	/// ApprovalForAll) used when no ABI is configured for an address.
	static ref FALLBACK_SPEC: EVMContractSpec = EVMContractSpec::from(serde_json::json!([
		{
			"type": "event",
			"name": "Transfer",
			"inputs": [
				{"name": "from", "type": "address", "indexed": true},
				{"name": "to", "type": "address", "indexed": true},
				{"name": "value", "type": "uint256", "indexed": false}
			],
			"anonymous": false
		},
		{
			"type": "event",
			"name": "Approval",
			"inputs": [
				{"name": "owner", "type": "address", "indexed": true},
				{"name": "spender", "type": "address", "indexed": true},
				{"name": "value", "type": "uint256", "indexed": false}
			],
			"anonymous": false
		},
		{
			"type": "event",
			"name": "ApprovalForAll",
			"inputs": [
				{"name": "owner", "type": "address", "indexed": true},
				{"name": "operator", "type": "address", "indexed": true},
				{"name": "approved", "type": "bool", "indexed": false}
			],
			"anonymous": false
		}
	]));
}

/// Resolves addresses to contract decoder handles
///
/// Implementations answer "is there a contract at this address at this
/// height, and how do I decode its logs". `None` means no code there.
#[async_trait]
pub trait ContractResolver: Send + Sync {
	/// Resolves an address at an optional height to a decoder handle
	async fn resolve(
		&self,
		address: &str,
		block_number: Option<u64>,
	) -> Result<Option<Contract>, DecoderError>;
}

/// Resolver backed by a node code probe and a configured ABI table
pub struct AbiContractResolver {
	/// Node used for code probes
	node: Arc<dyn NodeClient>,

	/// Chain configuration (native contract table)
	network: Network,

	/// Configured ABIs keyed by lowercase address
	abis: HashMap<String, ContractAbi>,
}

impl AbiContractResolver {
	/// Creates a resolver over a node client, chain config, and ABI entries
	pub fn new(
		node: Arc<dyn NodeClient>,
		network: Network,
		abis: impl IntoIterator<Item = ContractAbi>,
	) -> Self {
		let abis = abis
			.into_iter()
			.map(|entry| (normalize_address(&entry.address), entry))
			.collect();
		Self {
			node,
			network,
			abis,
		}
	}

	fn contract_for(&self, address: &str) -> Contract {
		match self.abis.get(address) {
			Some(entry) => Contract::new(address, entry.name.clone(), entry.abi.clone()),
			None => Contract::new(address, None, FALLBACK_SPEC.clone()),
		}
	}
}

#[async_trait]
impl ContractResolver for AbiContractResolver {
	/// Resolves via the native-contract table first, then a code probe.
	///
	/// Native contracts resolve regardless of code presence. For everything
	/// else an empty or all-zero code blob means no contract at that height.
	async fn resolve(
		&self,
		address: &str,
		block_number: Option<u64>,
	) -> Result<Option<Contract>, DecoderError> {
		if !is_address(address) {
			return Err(DecoderError::resolve_error(
				format!("Invalid address: {}", address),
				None,
				None,
			));
		}
		let normalized = normalize_address(address);

		if let Some(native) = self.network.native_contract(&normalized) {
			let mut contract = self.contract_for(&normalized);
			if contract.name().is_none() {
				contract =
					Contract::new(&normalized, Some(native.name.clone()), FALLBACK_SPEC.clone());
			}
			return Ok(Some(contract));
		}

		let code = self
			.node
			.get_code(&normalized, block_number)
			.await
			.map_err(DecoderError::Other)?;

		if !has_code(&code) {
			debug!(address = %normalized, ?block_number, "no code at address");
			return Ok(None);
		}

		Ok(Some(self.contract_for(&normalized)))
	}
}
