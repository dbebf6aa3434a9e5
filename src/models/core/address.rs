//! Address document model.
//!
//! The per-address state the indexer derives and persists: account vs
//! contract classification, balance, mining history and destruction.
//! Field names are part of the stored document contract; downstream query
//! layers match on them, so they are exposed as constants.

use serde::{Deserialize, Serialize};

use crate::models::InternalTransaction;

/// Stored key of the highest block this address has mined.
pub const LAST_BLOCK_MINED: &str = "lastBlockMined";

/// Stored key of the self-destruct record that removed this address.
pub const DESTROYED_BY: &str = "destroyedBy";

/// Stored key of the height at which the balance was last refreshed.
pub const BLOCK_NUMBER: &str = "blockNumber";

/// Classification of an address.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
	/// Externally owned account, or a destroyed contract
	#[default]
	Account,
	/// Address with non-empty code (or a configured native contract)
	Contract,
}

/// Compact block summary used as observation context and as the
/// `lastBlockMined` value.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
	pub number: u64,
	pub hash: String,
	pub miner: String,
	pub timestamp: u64,
}

impl BlockSummary {
	/// Summarize a fetched block. `None` for pending blocks (no number yet).
	pub fn from_block(block: &crate::models::EVMBlock) -> Option<Self> {
		Some(Self {
			number: block.number()?,
			hash: block
				.hash()
				.map(|h| format!("0x{:x}", h))
				.unwrap_or_default(),
			miner: format!("0x{:x}", block.miner()),
			timestamp: block.timestamp(),
		})
	}

	/// Context-only summary used for historical lookups at a given height.
	pub fn at_height(number: u64) -> Self {
		Self {
			number,
			..Default::default()
		}
	}
}

/// One address document, keyed by the lowercase `0x`-prefixed hash.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressDocument {
	/// Canonical lowercase address hash
	pub address: String,

	/// account | contract
	#[serde(rename = "type")]
	pub address_type: AddressType,

	/// Balance as a decimal string (arbitrary precision survives JSON)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub balance: Option<String>,

	/// Height at which the balance/state was last refreshed
	#[serde(rename = "blockNumber", skip_serializing_if = "Option::is_none")]
	pub block_number: Option<u64>,

	/// Hex bytecode when known and non-empty
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,

	/// True for configured native (precompiled) contracts
	#[serde(rename = "isNative", default, skip_serializing_if = "is_false")]
	pub is_native: bool,

	/// Configured name of a native contract
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	/// Highest block mined by this address
	#[serde(rename = "lastBlockMined", skip_serializing_if = "Option::is_none")]
	pub last_block_mined: Option<BlockSummary>,

	/// Self-destruct that removed this contract; immutable once set
	#[serde(rename = "destroyedBy", skip_serializing_if = "Option::is_none")]
	pub destroyed_by: Option<InternalTransaction>,

	/// Hash of the deploying transaction, when deployment data is known
	#[serde(rename = "createdByTx", skip_serializing_if = "Option::is_none")]
	pub created_by_tx: Option<String>,
}

fn is_false(value: &bool) -> bool {
	!*value
}

impl AddressDocument {
	/// Create an empty document for the given (already normalized) hash.
	pub fn new(address: impl Into<String>) -> Self {
		Self {
			address: address.into(),
			..Default::default()
		}
	}
}
