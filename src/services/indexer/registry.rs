//! Per-scope address registry.
//!
//! Guarantees one shared `Address` instance per canonical hash within a
//! scope (one tx fetch or one block run). Handles are
//! `Arc<tokio::sync::Mutex<Address>>` so mutations through any handle are
//! visible to all holders.

use std::{collections::BTreeMap, sync::Arc};

use futures::future::try_join_all;
use tokio::sync::Mutex;

use crate::{
	models::BlockSummary,
	services::indexer::{
		address::{Address, AddressContext, AddressOptions},
		error::IndexerError,
	},
};

/// Registry of shared address instances for one indexing scope
pub struct AddressRegistry {
	context: AddressContext,
	block: Option<BlockSummary>,
	addresses: BTreeMap<String, Arc<Mutex<Address>>>,
}

impl AddressRegistry {
	pub fn new(context: AddressContext) -> Self {
		Self {
			context,
			block: None,
			addresses: BTreeMap::new(),
		}
	}

	/// The registry's default observation context
	pub fn block(&self) -> Option<&BlockSummary> {
		self.block.as_ref()
	}

	/// Sets the default observation context and rebinds every registered
	/// instance to it
	pub async fn set_block(&mut self, block: &BlockSummary) {
		self.block = Some(block.clone());
		for instance in self.addresses.values() {
			instance.lock().await.set_block(block);
		}
	}

	/// Returns the shared instance for a hash, creating and registering
	/// one when absent.
	///
	/// The same hash in any case maps to the same instance. Options are
	/// applied only on creation.
	pub fn add(
		&mut self,
		hash: &str,
		options: AddressOptions,
	) -> Result<Arc<Mutex<Address>>, IndexerError> {
		let address = Address::new(hash, self.context.clone(), self.with_default_block(options))?;
		let key = address.address().to_string();
		if let Some(existing) = self.addresses.get(&key) {
			return Ok(existing.clone());
		}
		let instance = Arc::new(Mutex::new(address));
		self.addresses.insert(key, instance.clone());
		Ok(instance)
	}

	/// Constructs an address WITHOUT registering it.
	///
	/// Historical lookups (such as decoding against a prior height) must
	/// not leak into the scope.
	pub fn create_address(
		&self,
		hash: &str,
		options: AddressOptions,
	) -> Result<Address, IndexerError> {
		Address::new(hash, self.context.clone(), self.with_default_block(options))
	}

	/// Snapshot of the registered instances, in canonical address order
	pub fn list(&self) -> Vec<Arc<Mutex<Address>>> {
		self.addresses.values().cloned().collect()
	}

	/// Registered canonical addresses, in order
	pub fn keys(&self) -> Vec<String> {
		self.addresses.keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.addresses.len()
	}

	pub fn is_empty(&self) -> bool {
		self.addresses.is_empty()
	}

	/// Fetches and persists every registered instance.
	///
	/// Documents are independent, so saves run concurrently.
	pub async fn save_all(&self) -> Result<(), IndexerError> {
		try_join_all(self.addresses.values().map(|instance| async move {
			instance.lock().await.save().await
		}))
		.await?;
		Ok(())
	}

	fn with_default_block(&self, mut options: AddressOptions) -> AddressOptions {
		if options.block.is_none() {
			options.block = self.block.clone();
		}
		options
	}
}
