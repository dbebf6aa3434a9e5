//! EVM receipt data structures.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use alloy::{
	primitives::{aliases::B2048, Address, Bytes, B256, U256, U64},
	rpc::types::Index,
};

/// Base Receipt struct
/// Field set follows the eth_getTransactionReceipt response shape.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseReceipt {
	/// Transaction hash.
	#[serde(rename = "transactionHash")]
	pub transaction_hash: B256,
	/// Index within the block.
	#[serde(rename = "transactionIndex")]
	pub transaction_index: Index,
	/// Hash of the block this transaction was included within.
	#[serde(rename = "blockHash")]
	pub block_hash: Option<B256>,
	/// Number of the block this transaction was included within.
	#[serde(rename = "blockNumber")]
	pub block_number: Option<U64>,
	/// Sender
	#[serde(default)]
	pub from: Address,
	/// Recipient (None when contract creation)
	#[serde(default)]
	pub to: Option<Address>,
	/// Cumulative gas used within the block after this was executed.
	#[serde(rename = "cumulativeGasUsed")]
	pub cumulative_gas_used: U256,
	/// Gas used by this transaction alone.
	#[serde(rename = "gasUsed")]
	pub gas_used: Option<U256>,
	/// Contract address created, or `None` if not a deployment.
	#[serde(rename = "contractAddress")]
	pub contract_address: Option<Address>,
	/// Logs generated within this transaction.
	pub logs: Vec<BaseLog>,
	/// Status: either 1 (success) or 0 (failure).
	pub status: Option<U64>,
	/// State root (pre-Byzantium chains report this instead of status).
	pub root: Option<B256>,
	/// Logs bloom
	#[serde(rename = "logsBloom", default)]
	pub logs_bloom: B2048,
	/// Transaction type, None for Legacy
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub transaction_type: Option<U64>,
	/// Effective gas price
	#[serde(rename = "effectiveGasPrice", default)]
	pub effective_gas_price: Option<U256>,
}

/// Base Log struct
/// Raw log entry as emitted inside a receipt.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLog {
	/// Emitting contract
	pub address: Address,
	/// Topics
	pub topics: Vec<B256>,
	/// Data
	pub data: Bytes,
	/// Block Hash
	#[serde(rename = "blockHash")]
	pub block_hash: Option<B256>,
	/// Block Number
	#[serde(rename = "blockNumber")]
	pub block_number: Option<U64>,
	/// Transaction Hash
	#[serde(rename = "transactionHash")]
	pub transaction_hash: Option<B256>,
	/// Transaction Index
	#[serde(rename = "transactionIndex")]
	pub transaction_index: Option<Index>,
	/// Log Index in Block
	#[serde(rename = "logIndex")]
	pub log_index: Option<U256>,
	/// Log Index in Transaction
	#[serde(rename = "transactionLogIndex")]
	pub transaction_log_index: Option<U256>,
	/// Log Type
	#[serde(rename = "logType")]
	pub log_type: Option<String>,
	/// Removed
	pub removed: Option<bool>,
}

/// Wrapper around Base Receipt that implements additional functionality
///
/// This type provides a convenient interface for working with EVM receipts
/// while maintaining compatibility with the alloy types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransactionReceipt(pub BaseReceipt);

impl TransactionReceipt {
	/// Get the logs emitted by the transaction
	pub fn logs(&self) -> &[BaseLog] {
		&self.0.logs
	}

	/// Get the contract address of a deployment receipt
	pub fn contract_address(&self) -> Option<&Address> {
		self.0.contract_address.as_ref()
	}
}

impl From<BaseReceipt> for TransactionReceipt {
	fn from(receipt: BaseReceipt) -> Self {
		Self(receipt)
	}
}

impl Deref for TransactionReceipt {
	type Target = BaseReceipt;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
