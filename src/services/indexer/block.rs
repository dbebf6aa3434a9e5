//! Whole-block indexing entry point.
//!
//! One registry spans the block: the miner and every address touched by
//! any transaction share instances, the block trace is pulled once, and
//! each transaction reuses its pre-filtered slice.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
	models::{BlockSummary, TxDocument},
	services::{
		decoder::helpers::{b256_to_string, is_hash},
		indexer::{
			address::{AddressContext, AddressOptions},
			error::IndexerError,
			registry::AddressRegistry,
			transaction::{Tx, TxOptions},
		},
	},
};

/// A block reference: hash or height
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRef {
	Hash(String),
	Number(u64),
}

impl BlockRef {
	/// Parses a `0x`-prefixed 32-byte hash or a decimal height
	pub fn parse(value: &str) -> Result<Self, IndexerError> {
		let value = value.trim();
		if is_hash(value) {
			return Ok(Self::Hash(value.to_lowercase()));
		}
		value
			.parse::<u64>()
			.map(Self::Number)
			.map_err(|_| {
				IndexerError::validation_error(
					format!("Invalid block reference: {}", value),
					None,
					None,
				)
			})
	}
}

impl std::str::FromStr for BlockRef {
	type Err = String;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		Self::parse(value).map_err(|e| e.to_string())
	}
}

/// What one block run produced
#[derive(Debug, Clone, Serialize)]
pub struct BlockIndexSummary {
	pub block: BlockSummary,
	#[serde(rename = "transactionCount")]
	pub transaction_count: usize,
	#[serde(rename = "eventCount")]
	pub event_count: usize,
	#[serde(rename = "addressCount")]
	pub address_count: usize,
}

/// Indexes whole blocks through the transaction pipeline
pub struct BlockIndexer {
	context: AddressContext,
}

impl BlockIndexer {
	pub fn new(context: AddressContext) -> Self {
		Self { context }
	}

	/// Normalizes and persists every transaction of one block.
	///
	/// Transactions run sequentially through a shared registry; address
	/// documents are saved once at the end.
	#[instrument(skip(self), fields(block = ?block_ref))]
	pub async fn index_block(
		&self,
		block_ref: &BlockRef,
		force: bool,
	) -> Result<BlockIndexSummary, IndexerError> {
		let block = match block_ref {
			BlockRef::Hash(hash) => self.context.node.get_block_by_hash(hash).await,
			BlockRef::Number(number) => self.context.node.get_block_by_number(*number).await,
		}
		.map_err(|e| {
			IndexerError::not_found_error(
				format!("Failed to get block {:?}", block_ref),
				Some(e.into()),
				None,
			)
		})?
		.ok_or_else(|| {
			IndexerError::not_found_error(format!("Block not found: {:?}", block_ref), None, None)
		})?;

		let summary = BlockSummary::from_block(&block).ok_or_else(|| {
			IndexerError::validation_error(
				format!("Block is pending: {:?}", block_ref),
				None,
				Some(HashMap::from([(
					"block".to_string(),
					format!("{:?}", block_ref),
				)])),
			)
		})?;

		let mut registry = AddressRegistry::new(self.context.clone());
		registry.add(&summary.miner, AddressOptions::default())?;
		registry.set_block(&summary).await;

		// One trace pull for the whole block
		let block_trace = self
			.context
			.node
			.trace_block(summary.number)
			.await
			.map_err(|e| {
				IndexerError::not_found_error(
					format!("Failed to trace block {}", summary.number),
					Some(e.into()),
					None,
				)
			})?;

		let mut event_count = 0;
		let mut transaction_count = 0;
		for tx_hash in block.transaction_hashes() {
			let document = {
				let mut tx = Tx::new(
					&b256_to_string(*tx_hash),
					self.context.clone(),
					TxOptions {
						timestamp: Some(summary.timestamp),
						block_trace: Some(block_trace.clone()),
						..Default::default()
					},
					Some(registry),
				)?;
				let document = tx.fetch(force).await?;
				registry = tx.into_registry();
				document
			};
			self.persist(&document).await?;
			event_count += document.events.len();
			transaction_count += 1;
			debug!(hash = %document.hash(), events = document.events.len(), "indexed transaction");
		}

		registry.save_all().await?;

		Ok(BlockIndexSummary {
			address_count: registry.len(),
			block: summary,
			transaction_count,
			event_count,
		})
	}

	async fn persist(&self, document: &TxDocument) -> Result<(), IndexerError> {
		self.context.transactions.insert(document).await?;
		Ok(())
	}
}
