//! Execution-trace handling for one transaction.
//!
//! `TxTrace` lazily pulls `trace_transaction` for a hash, or reuses a
//! slice of an already-fetched block trace, and derives the internal
//! transactions, referenced addresses, and self-destructs in one pass.

use std::{collections::HashMap, sync::Arc};

use crate::{
	models::{internal_tx_id, BlockSummary, EVMTraceEntry, InternalTransaction},
	services::{
		blockchain::NodeClient,
		decoder::helpers::{b256_to_string, h160_to_string},
		indexer::error::IndexerError,
	},
};

/// Everything a single pass over the trace yields
#[derive(Debug, Default, Clone)]
pub struct InternalTransactionsData {
	/// One record per trace entry, in trace order
	pub internal_transactions: Vec<InternalTransaction>,

	/// Deduplicated addresses referenced by any entry, in first-seen order
	pub addresses: Vec<String>,

	/// The self-destruct subset of the records
	pub suicides: Vec<InternalTransaction>,
}

/// Execution trace of one transaction
pub struct TxTrace {
	hash: String,
	node: Arc<dyn NodeClient>,
	entries: Option<Vec<EVMTraceEntry>>,
}

impl TxTrace {
	/// Creates a lazy trace that pulls from the node on first use
	pub fn new(hash: &str, node: Arc<dyn NodeClient>) -> Self {
		Self {
			hash: hash.to_lowercase(),
			node,
			entries: None,
		}
	}

	/// Creates a trace from an already-fetched block trace, keeping only
	/// the entries of this transaction
	pub fn from_block_trace(
		hash: &str,
		node: Arc<dyn NodeClient>,
		block_trace: &[EVMTraceEntry],
	) -> Self {
		let hash = hash.to_lowercase();
		let entries = block_trace
			.iter()
			.filter(|entry| {
				entry
					.transaction_hash
					.map(|h| b256_to_string(h) == hash)
					.unwrap_or(false)
			})
			.cloned()
			.collect();
		Self {
			hash,
			node,
			entries: Some(entries),
		}
	}

	/// Returns the trace entries, fetching them when not supplied
	pub async fn fetch(&mut self) -> Result<&[EVMTraceEntry], IndexerError> {
		if self.entries.is_none() {
			let entries = self
				.node
				.trace_transaction(&self.hash)
				.await
				.map_err(|e| {
					IndexerError::not_found_error(
						format!("Failed to trace transaction {}", self.hash),
						Some(e.into()),
						Some(HashMap::from([(
							"hash".to_string(),
							self.hash.clone(),
						)])),
					)
				})?;
			self.entries = Some(entries);
		}
		Ok(self.entries.as_deref().unwrap_or_default())
	}

	/// Derives internal transactions, referenced addresses, and suicides
	/// in a single pass over the entries.
	///
	/// Every entry yields exactly one record, stamped with the block
	/// context and its deterministic id.
	pub async fn get_internal_transactions_data(
		&mut self,
		tx_id: &str,
		block: Option<&BlockSummary>,
	) -> Result<InternalTransactionsData, IndexerError> {
		let hash = self.hash.clone();
		let entries = self.fetch().await?;

		let mut data = InternalTransactionsData::default();
		for entry in entries {
			let record = InternalTransaction {
				internal_tx_id: internal_tx_id(tx_id, &entry.trace_address),
				transaction_hash: hash.clone(),
				block_number: entry.block_number.or(block.map(|b| b.number)),
				block_hash: entry
					.block_hash
					.map(b256_to_string)
					.or_else(|| block.map(|b| b.hash.clone())),
				timestamp: block.map(|b| b.timestamp).unwrap_or_default(),
				action_type: entry.action_type,
				action: entry.action.clone(),
				result: entry.result.clone(),
				error: entry.error.clone(),
				subtraces: entry.subtraces,
				trace_address: entry.trace_address.clone(),
			};

			for address in entry.referenced_addresses() {
				let address = h160_to_string(address);
				if !data.addresses.contains(&address) {
					data.addresses.push(address);
				}
			}
			if entry.is_suicide() {
				data.suicides.push(record.clone());
			}
			data.internal_transactions.push(record);
		}
		Ok(data)
	}
}
