//! Canonical transaction document model and deterministic id helpers.

use serde::{Deserialize, Serialize};

use crate::models::blockchain::evm::{
	EVMBaseTransaction, EVMTraceAction, EVMTraceActionType, EVMTraceResult,
};
use crate::models::EventDocument;

/// Classification of a transaction.
///
/// The precedence chain in the indexer is: `Normal` by default, `Call` when
/// the destination is a contract, a native variant when the destination is a
/// configured native contract, and `Contract` whenever the receipt carries a
/// `contractAddress` (deployment overrides everything).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum TxType {
	#[default]
	Normal,
	Call,
	Contract,
	Create,
	/// Call into a configured native contract, labelled with its name
	Native(String),
}

impl TxType {
	pub fn as_str(&self) -> &str {
		match self {
			TxType::Normal => "normal",
			TxType::Call => "call",
			TxType::Contract => "contract",
			TxType::Create => "create",
			TxType::Native(name) => name,
		}
	}
}

impl Serialize for TxType {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for TxType {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let label = String::deserialize(deserializer)?;
		Ok(match label.as_str() {
			"normal" => TxType::Normal,
			"call" => TxType::Call,
			"contract" => TxType::Contract,
			"create" => TxType::Create,
			_ => TxType::Native(label),
		})
	}
}

/// A value transfer or call recorded in a trace but not present as a
/// top-level transaction. Self-destructs are the `Suicide` subset.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalTransaction {
	#[serde(rename = "internalTxId")]
	pub internal_tx_id: String,
	#[serde(rename = "transactionHash")]
	pub transaction_hash: String,
	#[serde(rename = "blockNumber", skip_serializing_if = "Option::is_none")]
	pub block_number: Option<u64>,
	#[serde(rename = "blockHash", skip_serializing_if = "Option::is_none")]
	pub block_hash: Option<String>,
	pub timestamp: u64,
	#[serde(rename = "type")]
	pub action_type: EVMTraceActionType,
	pub action: EVMTraceAction,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub result: Option<EVMTraceResult>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	pub subtraces: u64,
	#[serde(rename = "traceAddress")]
	pub trace_address: Vec<u64>,
}

/// Canonical transaction document, keyed by the `0x`-prefixed tx hash.
///
/// Carries the raw transaction fields (flattened), the receipt with its
/// `logs` replaced in place by canonical events, and the trace-derived
/// records. `events.len()` always equals the receipt's original log count.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxDocument {
	#[serde(rename = "txId")]
	pub tx_id: String,
	#[serde(rename = "txType")]
	pub tx_type: TxType,
	pub timestamp: u64,
	#[serde(flatten)]
	pub tx: EVMBaseTransaction,
	/// Receipt with `logs` substituted by the canonical events
	pub receipt: serde_json::Value,
	pub events: Vec<EventDocument>,
	#[serde(rename = "internalTransactions")]
	pub internal_transactions: Vec<InternalTransaction>,
	pub suicides: Vec<InternalTransaction>,
	#[serde(rename = "tokenAddresses")]
	pub token_addresses: Vec<String>,
}

impl TxDocument {
	/// Lowercase `0x`-prefixed hash of the transaction.
	pub fn hash(&self) -> String {
		format!("0x{:x}", self.tx.hash)
	}
}

/// Deterministic transaction id: `{blockNumber:x}-{txIndex:x}-{hash[2..10]}`.
///
/// Stable across re-fetches; lowercase hex throughout.
pub fn tx_id(block_number: u64, transaction_index: u64, hash: &str) -> String {
	let tail = hash.strip_prefix("0x").unwrap_or(hash);
	let tail = &tail[..tail.len().min(8)];
	format!(
		"{:x}-{:x}-{}",
		block_number,
		transaction_index,
		tail.to_lowercase()
	)
}

/// Deterministic event id: `{txId}-{logIndex:x}`.
pub fn event_id(tx_id: &str, log_index: u64) -> String {
	format!("{}-{:x}", tx_id, log_index)
}

/// Deterministic internal-transaction id: `{txId}-{traceAddress joined by '.'}`.
/// An empty trace address (top-level entry) maps to `0`.
pub fn internal_tx_id(tx_id: &str, trace_address: &[u64]) -> String {
	let suffix = if trace_address.is_empty() {
		"0".to_string()
	} else {
		trace_address
			.iter()
			.map(|n| n.to_string())
			.collect::<Vec<_>>()
			.join(".")
	};
	format!("{}-{}", tx_id, suffix)
}
