//! Per-address state derivation.
//!
//! `Address` owns the lifecycle of one address document: loading stored
//! state, probing code and balance at the bound observation height,
//! classifying account vs contract, and persisting under the monotonic
//! merge rules (`lastBlockMined`, `destroyedBy`, balance height).

use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use crate::{
	models::{
		AddressDocument, AddressType, BlockSummary, InternalTransaction, Network,
	},
	repositories::{AddressRepositoryTrait, TransactionRepositoryTrait},
	services::{
		blockchain::NodeClient,
		decoder::{
			helpers::{has_code, is_address, normalize_address},
			Contract, ContractResolver,
		},
		indexer::error::IndexerError,
	},
};

/// Collaborators shared by every address in a scope
#[derive(Clone)]
pub struct AddressContext {
	/// Node used for code and balance probes
	pub node: Arc<dyn NodeClient>,

	/// Resolver for contract decoder handles
	pub resolver: Arc<dyn ContractResolver>,

	/// Storage for address documents
	pub addresses: Arc<dyn AddressRepositoryTrait>,

	/// Storage for transaction documents (deployment lookups)
	pub transactions: Arc<dyn TransactionRepositoryTrait>,

	/// Chain configuration (native contract table)
	pub network: Network,
}

/// Per-instance construction options
#[derive(Debug, Default, Clone)]
pub struct AddressOptions {
	/// Observation context (block summary) to bind at construction
	pub block: Option<BlockSummary>,

	/// Deployment context: hash of the transaction that created this address
	pub created_by_tx: Option<String>,

	/// Deployment context: init code from the creating receipt or trace
	pub deployment_code: Option<String>,
}

/// State of one address within an indexing scope
pub struct Address {
	address: String,
	context: AddressContext,
	document: AddressDocument,
	block: Option<BlockSummary>,
	deployment_code: Option<String>,
	deployment_supplied: bool,
	searched_deployment: bool,
	fetched: bool,
	saved: Option<AddressDocument>,
	contract: Option<Option<Contract>>,
}

impl Address {
	/// Creates an address entity for a validated hash
	///
	/// # Errors
	/// `ValidationError` when the hash is not a well-formed address
	pub fn new(
		address: &str,
		context: AddressContext,
		options: AddressOptions,
	) -> Result<Self, IndexerError> {
		let normalized = normalize_address(address);
		if !is_address(&normalized) {
			return Err(IndexerError::validation_error(
				format!("Invalid address: {}", address),
				None,
				Some(HashMap::from([("address".to_string(), address.to_string())])),
			));
		}

		let mut document = AddressDocument::new(normalized.clone());
		document.created_by_tx = options.created_by_tx.clone();

		let mut instance = Self {
			address: normalized,
			context,
			document,
			block: None,
			deployment_code: options.deployment_code,
			deployment_supplied: options.created_by_tx.is_some(),
			searched_deployment: false,
			fetched: false,
			saved: None,
			contract: None,
		};
		if let Some(block) = options.block {
			instance.set_block(&block);
		}
		Ok(instance)
	}

	/// The canonical lowercase address
	pub fn address(&self) -> &str {
		&self.address
	}

	/// The current working document
	pub fn document(&self) -> &AddressDocument {
		&self.document
	}

	/// Rebinds the observation context to the given block.
	///
	/// `lastBlockMined` is replaced only when this address mined the block
	/// AND its number is strictly greater than the stored one.
	pub fn set_block(&mut self, block: &BlockSummary) {
		self.block = Some(block.clone());

		if block.miner.to_lowercase() == self.address {
			let replaces = match &self.document.last_block_mined {
				Some(stored) => block.number > stored.number,
				None => true,
			};
			if replaces {
				self.document.last_block_mined = Some(block.clone());
			}
		}
	}

	/// Records a self-destruct.
	///
	/// `destroyedBy` is immutable once set; the type is forced to account
	/// and later code observations never resurrect the contract type.
	pub fn suicide(&mut self, itx: &InternalTransaction) {
		if self.document.destroyed_by.is_none() {
			self.document.destroyed_by = Some(itx.clone());
		}
		self.document.address_type = AddressType::Account;
		self.document.code = None;
	}

	/// Resolves this address's contract decoder at the bound height.
	///
	/// The result is cached for the instance lifetime, including a
	/// negative result.
	pub async fn get_contract(&mut self) -> Result<Option<Contract>, IndexerError> {
		if let Some(cached) = &self.contract {
			return Ok(cached.clone());
		}
		let height = self.block.as_ref().map(|b| b.number);
		let resolved = self.context.resolver.resolve(&self.address, height).await?;
		self.contract = Some(resolved.clone());
		Ok(resolved)
	}

	/// Derives the current document from stored state plus node observations
	pub async fn fetch(&mut self) -> Result<&AddressDocument, IndexerError> {
		let stored = self.context.addresses.get_by_address(&self.address).await?;
		if let Some(stored) = stored {
			self.merge_stored(stored);
		}

		let height = self.block.as_ref().map(|b| b.number);

		// Code probe, unless destruction already settled the question
		if self.document.code.is_none() && self.document.destroyed_by.is_none() {
			let code = self
				.context
				.node
				.get_code(&self.address, height)
				.await
				.map_err(|e| {
					IndexerError::not_found_error(
						format!("Failed to get code for {}", self.address),
						Some(e.into()),
						None,
					)
				})?;
			if has_code(&code) {
				self.document.code = Some(code);
			}
		}

		// Balance refresh only at or above the stored height
		let refresh = match (height, self.document.block_number) {
			(Some(observed), Some(stored_height)) => observed >= stored_height,
			_ => true,
		};
		if refresh {
			let balance = self
				.context
				.node
				.get_balance(&self.address, height)
				.await
				.map_err(|e| {
					IndexerError::not_found_error(
						format!("Failed to get balance for {}", self.address),
						Some(e.into()),
						None,
					)
				})?;
			self.document.balance = Some(balance.to_string());
			if let Some(observed) = height {
				self.document.block_number = Some(observed);
			}
		} else {
			debug!(address = %self.address, ?height, "skipping balance refresh below stored height");
		}

		// Deployment data: supplied context wins; otherwise search storage once
		if self.document.code.is_none() && self.deployment_code.is_some() {
			self.document.code = self.deployment_code.clone();
		}
		if self.is_contract_shaped()
			&& self.document.created_by_tx.is_none()
			&& !self.deployment_supplied
			&& !self.searched_deployment
		{
			self.search_deployment_data().await?;
		}

		self.classify();
		self.fetched = true;
		Ok(&self.document)
	}

	/// Persists the document, fetching first when needed.
	///
	/// Saving twice with unchanged state performs no second write.
	pub async fn save(&mut self) -> Result<(), IndexerError> {
		if !self.fetched {
			self.fetch().await?;
		}
		if self.saved.as_ref() == Some(&self.document) {
			return Ok(());
		}
		self.context.addresses.upsert(&self.document).await?;
		self.saved = Some(self.document.clone());
		Ok(())
	}

	fn is_contract_shaped(&self) -> bool {
		self.document.code.is_some()
			|| self.deployment_code.is_some()
			|| self.document.created_by_tx.is_some()
	}

	/// Looks up the deploying transaction in storage
	async fn search_deployment_data(&mut self) -> Result<(), IndexerError> {
		self.searched_deployment = true;
		if let Some(deployment) = self
			.context
			.transactions
			.find_by_contract_address(&self.address)
			.await?
		{
			self.document.created_by_tx = Some(deployment.hash());
		}
		Ok(())
	}

	/// Merges stored state under the monotonic rules
	fn merge_stored(&mut self, stored: AddressDocument) {
		// lastBlockMined: keep the local candidate only when it supersedes
		let local_mined = self.document.last_block_mined.take();
		let last_block_mined = match (stored.last_block_mined, local_mined) {
			(Some(stored_mined), Some(local)) => {
				if local.number > stored_mined.number {
					Some(local)
				} else {
					Some(stored_mined)
				}
			}
			(Some(stored_mined), None) => Some(stored_mined),
			(None, local) => local,
		};

		// destroyedBy is immutable once stored
		let destroyed_by = stored.destroyed_by.or(self.document.destroyed_by.take());
		let created_by_tx = self.document.created_by_tx.take().or(stored.created_by_tx);

		self.document = AddressDocument {
			address: self.address.clone(),
			address_type: stored.address_type,
			balance: stored.balance,
			block_number: stored.block_number,
			code: stored.code,
			is_native: stored.is_native,
			name: stored.name,
			last_block_mined,
			destroyed_by,
			created_by_tx,
		};
	}

	/// Derives `type`, `isNative`, and `name`
	fn classify(&mut self) {
		if let Some(native) = self.context.network.native_contract(&self.address) {
			self.document.address_type = AddressType::Contract;
			self.document.is_native = true;
			self.document.name = Some(native.name.clone());
			return;
		}

		if self.document.destroyed_by.is_some() {
			self.document.address_type = AddressType::Account;
			return;
		}

		self.document.address_type = if self.is_contract_shaped() {
			AddressType::Contract
		} else {
			AddressType::Account
		};
	}
}
