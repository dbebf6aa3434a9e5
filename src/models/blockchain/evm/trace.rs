//! EVM execution trace data structures.
//!
//! Shapes follow the trace_transaction / trace_block response format of
//! OpenEthereum-derived nodes, which this chain family exposes.

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Kind of operation a trace entry describes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceActionType {
	#[default]
	Call,
	Create,
	Suicide,
	Reward,
	#[serde(other)]
	Unknown,
}

/// Action payload of a trace entry. Which fields are present depends on the
/// action type: calls carry from/to/input, creates carry from/init,
/// suicides carry address/refundAddress/balance.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceAction {
	#[serde(rename = "callType", skip_serializing_if = "Option::is_none")]
	pub call_type: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub from: Option<Address>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub to: Option<Address>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub gas: Option<U256>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub input: Option<Bytes>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<U256>,
	/// Deployment bytecode (create entries)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub init: Option<Bytes>,
	/// Destroyed contract (suicide entries)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<Address>,
	/// Balance recipient of a self-destruct
	#[serde(rename = "refundAddress", skip_serializing_if = "Option::is_none")]
	pub refund_address: Option<Address>,
	/// Balance transferred by a self-destruct
	#[serde(skip_serializing_if = "Option::is_none")]
	pub balance: Option<U256>,
}

/// Result payload of a successful trace entry.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
	#[serde(rename = "gasUsed", skip_serializing_if = "Option::is_none")]
	pub gas_used: Option<U256>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub output: Option<Bytes>,
	/// Address of the created contract (create entries)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<Address>,
	/// Runtime code of the created contract (create entries)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code: Option<Bytes>,
}

/// One entry of an execution trace.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
	pub action: TraceAction,
	#[serde(rename = "blockHash", skip_serializing_if = "Option::is_none")]
	pub block_hash: Option<B256>,
	#[serde(rename = "blockNumber", skip_serializing_if = "Option::is_none")]
	pub block_number: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub result: Option<TraceResult>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	#[serde(default)]
	pub subtraces: u64,
	/// Position of the entry in the call tree
	#[serde(rename = "traceAddress", default)]
	pub trace_address: Vec<u64>,
	#[serde(rename = "transactionHash", skip_serializing_if = "Option::is_none")]
	pub transaction_hash: Option<B256>,
	#[serde(
		rename = "transactionPosition",
		skip_serializing_if = "Option::is_none"
	)]
	pub transaction_position: Option<u64>,
	#[serde(rename = "type", default)]
	pub action_type: TraceActionType,
}

impl TraceEntry {
	/// True for self-destruct entries.
	pub fn is_suicide(&self) -> bool {
		self.action_type == TraceActionType::Suicide
	}

	/// True for contract-creation entries.
	pub fn is_create(&self) -> bool {
		self.action_type == TraceActionType::Create
	}

	/// Every address the entry references, in field order.
	pub fn referenced_addresses(&self) -> Vec<Address> {
		let mut addresses = Vec::new();
		let action = &self.action;
		for candidate in [
			action.from,
			action.to,
			action.address,
			action.refund_address,
			self.result.as_ref().and_then(|r| r.address),
		]
		.into_iter()
		.flatten()
		{
			if !addresses.contains(&candidate) {
				addresses.push(candidate);
			}
		}
		addresses
	}
}
