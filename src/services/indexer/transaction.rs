//! Transaction fetch orchestration.
//!
//! `Tx` drives the full normalization of one transaction: raw data,
//! receipt, containing block, event decoding, trace-derived internal
//! transactions, and address registration. The resulting `TxDocument`
//! is cached per instance; a fatal error leaves nothing cached.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, instrument, warn};

use crate::{
	models::{
		event_id, tx_id, AddressType, BlockSummary, EVMReceiptLog, EVMTraceEntry, EVMTransaction,
		EVMTransactionReceipt, EventContext, EventDocument, TxDocument, TxType,
	},
	services::{
		decoder::{
			helpers::{h160_to_string, is_hash},
			Contract,
		},
		indexer::{
			address::{AddressContext, AddressOptions},
			error::IndexerError,
			registry::AddressRegistry,
			trace::TxTrace,
		},
	},
};

/// Optional construction inputs for a `Tx`
#[derive(Default)]
pub struct TxOptions {
	/// Timestamp override; otherwise derived from the containing block
	pub timestamp: Option<u64>,

	/// Pre-fetched transaction data (block flow)
	pub tx_data: Option<EVMTransaction>,

	/// Slice of an already-fetched block trace for this transaction
	pub block_trace: Option<Vec<EVMTraceEntry>>,
}

/// One transaction being normalized
pub struct Tx {
	hash: String,
	context: AddressContext,
	registry: AddressRegistry,
	options: TxOptions,
	document: Option<TxDocument>,
}

impl Tx {
	/// Creates a fetcher for a validated transaction hash.
	///
	/// A registry handed in by the block flow is reused; otherwise the
	/// instance owns a fresh one.
	///
	/// # Errors
	/// `ValidationError` when the hash is not a 32-byte hex hash
	pub fn new(
		hash: &str,
		context: AddressContext,
		options: TxOptions,
		registry: Option<AddressRegistry>,
	) -> Result<Self, IndexerError> {
		let hash = hash.to_lowercase();
		if !is_hash(&hash) {
			return Err(IndexerError::validation_error(
				format!("Invalid transaction hash: {}", hash),
				None,
				Some(HashMap::from([("hash".to_string(), hash.clone())])),
			));
		}
		let registry = registry.unwrap_or_else(|| AddressRegistry::new(context.clone()));
		Ok(Self {
			hash,
			context,
			registry,
			options,
			document: None,
		})
	}

	/// The canonical lowercase transaction hash
	pub fn hash(&self) -> &str {
		&self.hash
	}

	/// The registry accumulated so far
	pub fn registry(&self) -> &AddressRegistry {
		&self.registry
	}

	/// Releases the registry back to the caller (block flow)
	pub fn into_registry(self) -> AddressRegistry {
		self.registry
	}

	/// Fetches and normalizes the transaction into its document.
	///
	/// The document is cached; `force` bypasses the cache. Nothing is
	/// cached when any step fails.
	#[instrument(skip(self), fields(hash = %self.hash))]
	pub async fn fetch(&mut self, force: bool) -> Result<TxDocument, IndexerError> {
		if let Some(document) = &self.document {
			if !force {
				debug!("returning cached document");
				return Ok(document.clone());
			}
		}

		// Raw transaction data
		let tx_data = match self.options.tx_data.take() {
			Some(data) => data,
			None => self
				.context
				.node
				.get_transaction_by_hash(&self.hash)
				.await
				.map_err(|e| self.not_found("Failed to get transaction", e))?
				.ok_or_else(|| {
					IndexerError::not_found_error(
						format!("Transaction not found: {}", self.hash),
						None,
						None,
					)
				})?,
		};
		self.validate_tx_data(&tx_data)?;

		// Receipt; mined transactions always have one on this chain family
		let receipt = self
			.context
			.node
			.get_transaction_receipt(&self.hash)
			.await
			.map_err(|e| self.not_found("Failed to get receipt", e))?
			.ok_or_else(|| {
				IndexerError::not_found_error(
					format!("Receipt not found: {}", self.hash),
					None,
					None,
				)
			})?;

		// Containing block, reused from the registry context when bound
		let block_hash = format!(
			"0x{:x}",
			tx_data.block_hash().ok_or_else(|| self.validation("Transaction has no blockHash"))?
		);
		let summary = match self.registry.block() {
			Some(bound) if bound.hash == block_hash => bound.clone(),
			_ => {
				let block = self
					.context
					.node
					.get_block_by_hash(&block_hash)
					.await
					.map_err(|e| self.not_found("Failed to get block", e))?
					.ok_or_else(|| {
						IndexerError::not_found_error(
							format!("Block not found: {}", block_hash),
							None,
							None,
						)
					})?;
				BlockSummary::from_block(&block)
					.ok_or_else(|| self.validation("Containing block is pending"))?
			}
		};
		let timestamp = self.options.timestamp.unwrap_or(summary.timestamp);
		self.registry.set_block(&summary).await;

		// Sender, and the deployed contract when the receipt names one
		if let Some(from) = tx_data.sender() {
			self.registry
				.add(&h160_to_string(*from), AddressOptions::default())?;
		}
		let deployed = receipt.contract_address().map(|a| h160_to_string(*a));
		if let Some(deployed) = &deployed {
			self.registry.add(
				deployed,
				AddressOptions {
					created_by_tx: Some(self.hash.clone()),
					deployment_code: Some(format!("{}", tx_data.input())),
					..Default::default()
				},
			)?;
		}

		// Destination type decides call vs normal
		let mut tx_type = TxType::Normal;
		if let Some(to) = tx_data.to() {
			let to = h160_to_string(*to);
			let handle = self.registry.add(&to, AddressOptions::default())?;
			let to_doc = handle.lock().await.fetch().await?.clone();
			if to_doc.address_type == AddressType::Contract {
				tx_type = TxType::Call;
			}
			if let Some(native) = self.context.network.native_contract(&to) {
				tx_type = native.tx_type();
			}
		}
		if deployed.is_some() {
			tx_type = TxType::Contract;
		}

		let id = tx_id(
			tx_data
				.block_number()
				.ok_or_else(|| self.validation("Transaction has no blockNumber"))?,
			tx_data
				.transaction_index()
				.ok_or_else(|| self.validation("Transaction has no transactionIndex"))?,
			&self.hash,
		);
		let event_context = EventContext {
			tx_hash: self.hash.clone(),
			tx_id: id.clone(),
			timestamp,
		};

		// Events; one per receipt log, receipt order preserved
		let (events, token_addresses) = self
			.decode_logs_and_addresses(receipt.logs(), &event_context, &summary)
			.await?;
		self.ensure_event_parity(events.len(), receipt.logs().len())?;

		// Trace-derived internal transactions and suicides
		let mut trace = match self.options.block_trace.take() {
			Some(entries) => {
				TxTrace::from_block_trace(&self.hash, self.context.node.clone(), &entries)
			}
			None => TxTrace::new(&self.hash, self.context.node.clone()),
		};
		let trace_data = trace
			.get_internal_transactions_data(&id, Some(&summary))
			.await?;
		for address in &trace_data.addresses {
			self.registry.add(address, AddressOptions::default())?;
		}
		for suicide in &trace_data.suicides {
			if let Some(destroyed) = suicide.action.address {
				let handle = self
					.registry
					.add(&h160_to_string(destroyed), AddressOptions::default())?;
				handle.lock().await.suicide(suicide);
			}
		}

		// Receipt with its logs replaced in place by the canonical events
		let mut receipt_value = serde_json::to_value(&receipt)
			.map_err(|e| self.internal("Failed to serialize receipt", e.into()))?;
		receipt_value["logs"] = serde_json::to_value(&events)
			.map_err(|e| self.internal("Failed to serialize events", e.into()))?;

		let document = TxDocument {
			tx_id: id,
			tx_type,
			timestamp,
			tx: tx_data.0,
			receipt: receipt_value,
			events,
			internal_transactions: trace_data.internal_transactions,
			suicides: trace_data.suicides,
			token_addresses,
		};
		self.document = Some(document.clone());
		Ok(document)
	}

	/// Nothing is persisted for a transaction whose event list diverged
	/// from its receipt logs.
	fn ensure_event_parity(&self, events: usize, logs: usize) -> Result<(), IndexerError> {
		if events != logs {
			return Err(IndexerError::integrity_error(
				format!(
					"Events/logs mismatch for {}: {} events, {} logs",
					self.hash, events, logs
				),
				None,
				None,
			));
		}
		Ok(())
	}

	/// Decodes every receipt log into exactly one event, registering all
	/// addresses encountered along the way.
	async fn decode_logs_and_addresses(
		&mut self,
		logs: &[EVMReceiptLog],
		ctx: &EventContext,
		summary: &BlockSummary,
	) -> Result<(Vec<EventDocument>, Vec<String>), IndexerError> {
		let mut contracts: BTreeMap<String, Contract> = BTreeMap::new();
		let mut events = Vec::with_capacity(logs.len());

		for log in logs {
			let emitter = h160_to_string(log.address);
			let handle = self.registry.add(&emitter, AddressOptions::default())?;

			if !contracts.contains_key(&emitter) {
				let mut resolved = handle.lock().await.get_contract().await?;
				if resolved.is_none() && summary.number > 0 {
					// The emitter may have self-destructed in this very
					// block; retry against the prior height.
					let mut historical = self.registry.create_address(
						&emitter,
						AddressOptions {
							block: Some(BlockSummary::at_height(summary.number - 1)),
							..Default::default()
						},
					)?;
					resolved = historical.get_contract().await?;
				}
				if let Some(contract) = resolved {
					contracts.insert(emitter.clone(), contract);
				}
			}

			match contracts.get_mut(&emitter) {
				Some(contract) => match contract.decode_log(log) {
					Some(decoded) => {
						for address in contract.extract_addresses(&decoded) {
							self.registry.add(&address, AddressOptions::default())?;
							contract.add_address(&address);
						}
						events.push(EventDocument::decoded(log, &decoded, ctx));
					}
					None => {
						warn!(
							address = %emitter,
							event_id = %event_id(&ctx.tx_id, log.log_index.map(|i| i.to::<u64>()).unwrap_or(0)),
							"no matching ABI event, recording raw event"
						);
						events.push(EventDocument::raw(log, ctx));
					}
				},
				None => {
					warn!(address = %emitter, "no decoder for emitter, recording raw event");
					events.push(EventDocument::raw(log, ctx));
				}
			}
		}

		// Token holders accumulated by every contract touched
		let mut token_addresses: Vec<String> = Vec::new();
		for contract in contracts.values() {
			for address in contract.fetch_token_holder_addresses() {
				self.registry.add(&address, AddressOptions::default())?;
				if !token_addresses.contains(&address) {
					token_addresses.push(address);
				}
			}
		}

		Ok((events, token_addresses))
	}

	fn validate_tx_data(&self, tx_data: &EVMTransaction) -> Result<(), IndexerError> {
		let data_hash = format!("0x{:x}", tx_data.hash());
		if data_hash != self.hash {
			return Err(IndexerError::validation_error(
				format!(
					"Transaction data hash mismatch: expected {}, got {}",
					self.hash, data_hash
				),
				None,
				None,
			));
		}
		if tx_data.block_hash().is_none() {
			return Err(self.validation("Transaction is pending (no blockHash)"));
		}
		Ok(())
	}

	fn validation(&self, message: &str) -> IndexerError {
		IndexerError::validation_error(
			format!("{}: {}", message, self.hash),
			None,
			Some(HashMap::from([("hash".to_string(), self.hash.clone())])),
		)
	}

	fn not_found(&self, message: &str, source: anyhow::Error) -> IndexerError {
		IndexerError::not_found_error(
			format!("{}: {}", message, self.hash),
			Some(source.into()),
			Some(HashMap::from([("hash".to_string(), self.hash.clone())])),
		)
	}

	fn internal(&self, message: &str, source: anyhow::Error) -> IndexerError {
		IndexerError::internal_error(
			format!("{}: {}", message, self.hash),
			Some(source.into()),
			Some(HashMap::from([("hash".to_string(), self.hash.clone())])),
		)
	}
}
