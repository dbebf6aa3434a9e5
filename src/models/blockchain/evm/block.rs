//! EVM block data structures.

use alloy::primitives::{Address, Bytes, B256, U256, U64};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Base Block struct
/// Field set follows the eth_getBlockByHash response shape (transaction
/// hashes only; the indexer refetches each transaction individually).
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct BaseBlock<TX> {
	/// Hash of the block
	pub hash: Option<B256>,
	/// Hash of the parent
	#[serde(rename = "parentHash")]
	pub parent_hash: B256,
	/// Miner/author's address.
	#[serde(rename = "miner", default)]
	pub miner: Address,
	/// Block number. None if pending.
	pub number: Option<U64>,
	/// Gas Used
	#[serde(rename = "gasUsed", default)]
	pub gas_used: U256,
	/// Gas Limit
	#[serde(rename = "gasLimit", default)]
	pub gas_limit: U256,
	/// Extra data
	#[serde(rename = "extraData", default)]
	pub extra_data: Bytes,
	/// Timestamp
	pub timestamp: U256,
	/// Difficulty
	#[serde(default)]
	pub difficulty: U256,
	/// Minimum gas price enforced by the block (chain-family extension)
	#[serde(
		rename = "minimumGasPrice",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub minimum_gas_price: Option<U256>,
	/// Uncles' hashes
	#[serde(default)]
	pub uncles: Vec<B256>,
	/// Transactions
	#[serde(default)]
	pub transactions: Vec<TX>,
	/// Size in bytes
	pub size: Option<U256>,
}

/// Wrapper around Base Block that implements additional functionality
///
/// The indexer fetches blocks without transaction bodies, so the payload
/// carries transaction hashes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Block(pub BaseBlock<B256>);

impl Block {
	/// Get the block number
	pub fn number(&self) -> Option<u64> {
		self.0.number.map(|n| n.to())
	}

	/// Get the block hash
	pub fn hash(&self) -> Option<&B256> {
		self.0.hash.as_ref()
	}

	/// Get the block timestamp in seconds
	pub fn timestamp(&self) -> u64 {
		self.0.timestamp.to()
	}

	/// Get the miner address
	pub fn miner(&self) -> &Address {
		&self.0.miner
	}

	/// Get the hashes of the transactions included in the block
	pub fn transaction_hashes(&self) -> &[B256] {
		&self.0.transactions
	}
}

impl From<BaseBlock<B256>> for Block {
	fn from(block: BaseBlock<B256>) -> Self {
		Self(block)
	}
}

impl Deref for Block {
	type Target = BaseBlock<B256>;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
