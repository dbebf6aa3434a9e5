//! EVM transaction data structures.

use std::{collections::HashMap, ops::Deref};

use serde::{Deserialize, Serialize};

use alloy::{
	primitives::{Address, Bytes, B256, U256, U64},
	rpc::types::Index,
};

/// Base Transaction struct
/// Field set follows the eth_getTransactionByHash response shape; unknown
/// fields returned by chain-specific nodes are preserved in `extra`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct BaseTransaction {
	/// Hash
	pub hash: B256,
	/// Nonce
	pub nonce: U256,
	/// Block hash. None when pending.
	#[serde(rename = "blockHash")]
	pub block_hash: Option<B256>,
	/// Block number. None when pending.
	#[serde(rename = "blockNumber")]
	pub block_number: Option<U64>,
	/// Transaction Index. None when pending.
	#[serde(rename = "transactionIndex")]
	pub transaction_index: Option<Index>,
	/// Sender
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from: Option<Address>,
	/// Recipient (None when contract creation)
	pub to: Option<Address>,
	/// Transferred value
	pub value: U256,
	/// Gas Price
	#[serde(rename = "gasPrice")]
	pub gas_price: Option<U256>,
	/// Gas amount
	pub gas: U256,
	/// Input data
	pub input: Bytes,
	/// ECDSA recovery id
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub v: Option<U64>,
	/// ECDSA signature r, 32 bytes
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub r: Option<U256>,
	/// ECDSA signature s, 32 bytes
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub s: Option<U256>,
	/// Transaction type, None for Legacy
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub transaction_type: Option<U64>,

	/// Catch-all for non-standard fields
	#[serde(flatten)]
	pub extra: HashMap<String, serde_json::Value>,
}

/// Wrapper around Base Transaction that implements additional functionality
///
/// This type provides a convenient interface for working with EVM transactions
/// while maintaining compatibility with the base types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Transaction(pub BaseTransaction);

impl Transaction {
	/// Get the transaction hash
	pub fn hash(&self) -> &B256 {
		&self.0.hash
	}

	/// Get the transaction sender address
	pub fn sender(&self) -> Option<&Address> {
		self.0.from.as_ref()
	}

	/// Get the transaction recipient address (None for contract creation)
	pub fn to(&self) -> Option<&Address> {
		self.0.to.as_ref()
	}

	/// Get the transaction value (amount of native currency transferred)
	pub fn value(&self) -> &U256 {
		&self.0.value
	}

	/// Get the transaction input data
	pub fn input(&self) -> &Bytes {
		&self.0.input
	}

	/// Get the hash of the containing block (None while pending)
	pub fn block_hash(&self) -> Option<&B256> {
		self.0.block_hash.as_ref()
	}

	/// Get the number of the containing block (None while pending)
	pub fn block_number(&self) -> Option<u64> {
		self.0.block_number.map(|n| n.to())
	}

	/// Get the position of the transaction within its block
	pub fn transaction_index(&self) -> Option<u64> {
		self.0.transaction_index.map(|i| i.0 as u64)
	}

	/// Get the gas limit for the transaction
	pub fn gas(&self) -> &U256 {
		&self.0.gas
	}

	/// Get the gas price (None for fee-market transactions)
	pub fn gas_price(&self) -> Option<&U256> {
		self.0.gas_price.as_ref()
	}

	/// Get the transaction nonce
	pub fn nonce(&self) -> &U256 {
		&self.0.nonce
	}
}

impl From<BaseTransaction> for Transaction {
	fn from(tx: BaseTransaction) -> Self {
		Self(tx)
	}
}

impl Deref for Transaction {
	type Target = BaseTransaction;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
