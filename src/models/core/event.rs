//! Canonical event document model.
//!
//! One event per receipt log, in receipt order. A decoded event carries the
//! name, signature and arguments recovered from the contract ABI; an
//! undecodable log is recorded as a raw event with just its topics and data.

use serde::{Deserialize, Serialize};

use crate::models::blockchain::evm::{EVMDecodedParamEntry, EVMReceiptLog};

/// The normalized representation of one receipt log, independently
/// queryable thanks to its own id and block context.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDocument {
	#[serde(rename = "eventId")]
	pub event_id: String,
	#[serde(rename = "txHash")]
	pub tx_hash: String,
	#[serde(rename = "txId")]
	pub tx_id: String,
	/// Emitting contract
	pub address: String,
	#[serde(rename = "blockHash", skip_serializing_if = "Option::is_none")]
	pub block_hash: Option<String>,
	#[serde(rename = "blockNumber", skip_serializing_if = "Option::is_none")]
	pub block_number: Option<u64>,
	pub timestamp: u64,
	#[serde(rename = "logIndex", skip_serializing_if = "Option::is_none")]
	pub log_index: Option<u64>,
	/// Raw topics, kept for decoded events too
	pub topics: Vec<String>,
	/// Raw data payload
	pub data: String,
	/// Decoded event name; absent for raw fallback events
	#[serde(skip_serializing_if = "Option::is_none")]
	pub event: Option<String>,
	/// Decoded event signature, e.g. `Transfer(address,address,uint256)`
	#[serde(skip_serializing_if = "Option::is_none")]
	pub signature: Option<String>,
	/// Decoded argument entries
	#[serde(skip_serializing_if = "Option::is_none")]
	pub args: Option<Vec<EVMDecodedParamEntry>>,
	/// Addresses referenced by the decoded arguments
	#[serde(rename = "_addresses", default, skip_serializing_if = "Vec::is_empty")]
	pub addresses: Vec<String>,
}

/// Context shared by every event of one transaction.
#[derive(Debug, Clone)]
pub struct EventContext {
	pub tx_hash: String,
	pub tx_id: String,
	pub timestamp: u64,
}

impl EventDocument {
	/// Record a log as a raw event (no decoder available).
	pub fn raw(log: &EVMReceiptLog, ctx: &EventContext) -> Self {
		let log_index = log.log_index.map(|i| i.to::<u64>());
		Self {
			event_id: super::transaction::event_id(&ctx.tx_id, log_index.unwrap_or(0)),
			tx_hash: ctx.tx_hash.clone(),
			tx_id: ctx.tx_id.clone(),
			address: format!("0x{:x}", log.address),
			block_hash: log.block_hash.map(|h| format!("0x{:x}", h)),
			block_number: log.block_number.map(|n| n.to()),
			timestamp: ctx.timestamp,
			log_index,
			topics: log.topics.iter().map(|t| format!("0x{:x}", t)).collect(),
			data: format!("{}", log.data),
			..Default::default()
		}
	}

	/// Record a log together with its decoded form.
	pub fn decoded(
		log: &EVMReceiptLog,
		decoded: &crate::models::EVMDecodedEvent,
		ctx: &EventContext,
	) -> Self {
		let mut event = Self::raw(log, ctx);
		event.event = Some(decoded.name.clone());
		event.signature = Some(decoded.signature.clone());
		event.args = Some(decoded.args.clone());
		event.addresses = decoded.referenced_addresses();
		event
	}
}
