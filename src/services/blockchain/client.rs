//! Core blockchain client interface and traits.
//!
//! This module defines the node-access interface the indexer depends on,
//! keeping the pipeline decoupled from the concrete JSON-RPC transport.

use async_trait::async_trait;

use crate::models::{EVMBlock, EVMTraceEntry, EVMTransaction, EVMTransactionReceipt};

/// Defines the node interface the indexing pipeline consumes
///
/// Implementations provide standardized access to chain data over JSON-RPC.
/// The trait is object safe so the pipeline can share one client behind
/// `Arc<dyn NodeClient>`.
#[async_trait]
pub trait NodeClient: Send + Sync {
	/// Retrieves a transaction by its hash
	///
	/// Returns `Ok(None)` when the node does not know the transaction.
	async fn get_transaction_by_hash(
		&self,
		hash: &str,
	) -> Result<Option<EVMTransaction>, anyhow::Error>;

	/// Retrieves a transaction receipt by the transaction hash
	///
	/// Returns `Ok(None)` when the transaction has not been mined.
	async fn get_transaction_receipt(
		&self,
		hash: &str,
	) -> Result<Option<EVMTransactionReceipt>, anyhow::Error>;

	/// Retrieves a block by its hash, including full transaction objects
	async fn get_block_by_hash(&self, hash: &str) -> Result<Option<EVMBlock>, anyhow::Error>;

	/// Retrieves a block by number, including full transaction objects
	async fn get_block_by_number(&self, number: u64) -> Result<Option<EVMBlock>, anyhow::Error>;

	/// Retrieves the deployed bytecode at an address
	///
	/// # Arguments
	/// * `address` - The address to probe
	/// * `block_number` - Optional height to probe at; `None` means latest
	async fn get_code(
		&self,
		address: &str,
		block_number: Option<u64>,
	) -> Result<String, anyhow::Error>;

	/// Retrieves the balance of an address, in wei
	///
	/// # Arguments
	/// * `address` - The address to query
	/// * `block_number` - Optional height to query at; `None` means latest
	async fn get_balance(
		&self,
		address: &str,
		block_number: Option<u64>,
	) -> Result<alloy::primitives::U256, anyhow::Error>;

	/// Retrieves the execution trace of a single transaction
	async fn trace_transaction(&self, hash: &str) -> Result<Vec<EVMTraceEntry>, anyhow::Error>;

	/// Retrieves the execution traces of every transaction in a block
	async fn trace_block(&self, number: u64) -> Result<Vec<EVMTraceEntry>, anyhow::Error>;

	/// Retrieves the latest block number from the node
	async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error>;
}
