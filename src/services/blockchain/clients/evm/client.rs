//! EVM-compatible blockchain client implementation.
//!
//! This module provides functionality to interact with Ethereum and other EVM-compatible
//! blockchains, supporting block, transaction, receipt, balance, code, and trace lookups.

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use tracing::instrument;

use crate::{
	models::{EVMBlock, EVMTraceEntry, EVMTransaction, EVMTransactionReceipt, Network},
	services::blockchain::{
		client::NodeClient,
		transports::{BlockchainTransport, HttpTransportClient},
	},
};

/// Client implementation for Ethereum Virtual Machine (EVM) compatible blockchains
///
/// Provides high-level access to EVM blockchain data and operations through HTTP transport.
#[derive(Clone)]
pub struct EvmClient<T: Send + Sync + Clone> {
	/// The underlying HTTP transport client for RPC communication
	http_client: T,
}

impl<T: Send + Sync + Clone> EvmClient<T> {
	/// Creates a new EVM client instance with a specific transport client
	pub fn new_with_transport(http_client: T) -> Self {
		Self { http_client }
	}
}

impl EvmClient<HttpTransportClient> {
	/// Creates a new EVM client instance
	///
	/// # Arguments
	/// * `network` - Network configuration containing RPC endpoints and chain details
	///
	/// # Returns
	/// * `Result<Self, anyhow::Error>` - New client instance or connection error
	pub async fn new(network: &Network) -> Result<Self, anyhow::Error> {
		let test_connection_payload =
			Some(r#"{"id":1,"jsonrpc":"2.0","method":"net_version","params":[]}"#.to_string());
		let client = HttpTransportClient::new(network, test_connection_payload).await?;
		Ok(Self::new_with_transport(client))
	}
}

impl<T: Send + Sync + Clone + BlockchainTransport> EvmClient<T> {
	/// Sends a JSON-RPC request and extracts the `result` field
	async fn rpc_result(
		&self,
		method: &str,
		params: serde_json::Value,
	) -> Result<serde_json::Value, anyhow::Error> {
		let response = self
			.http_client
			.send_raw_request(method, Some(params))
			.await
			.with_context(|| format!("Failed to send request: {}", method))?;

		response
			.get("result")
			.cloned()
			.with_context(|| format!("Missing 'result' field in {} response", method))
	}
}

fn block_tag(block_number: Option<u64>) -> serde_json::Value {
	match block_number {
		Some(number) => json!(format!("0x{:x}", number)),
		None => json!("latest"),
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> NodeClient for EvmClient<T> {
	/// Retrieves a transaction by hash, `None` when the node does not know it
	#[instrument(skip(self), fields(hash))]
	async fn get_transaction_by_hash(
		&self,
		hash: &str,
	) -> Result<Option<EVMTransaction>, anyhow::Error> {
		let data = self
			.rpc_result("eth_getTransactionByHash", json!([hash]))
			.await?;

		if data.is_null() {
			return Ok(None);
		}

		Ok(Some(
			serde_json::from_value(data).with_context(|| "Failed to parse transaction")?,
		))
	}

	/// Retrieves a transaction receipt by hash, `None` when not yet mined
	#[instrument(skip(self), fields(hash))]
	async fn get_transaction_receipt(
		&self,
		hash: &str,
	) -> Result<Option<EVMTransactionReceipt>, anyhow::Error> {
		let data = self
			.rpc_result("eth_getTransactionReceipt", json!([hash]))
			.await?;

		if data.is_null() {
			return Ok(None);
		}

		Ok(Some(
			serde_json::from_value(data).with_context(|| "Failed to parse transaction receipt")?,
		))
	}

	/// Retrieves a block by hash with full transaction objects
	#[instrument(skip(self), fields(hash))]
	async fn get_block_by_hash(&self, hash: &str) -> Result<Option<EVMBlock>, anyhow::Error> {
		let data = self
			.rpc_result("eth_getBlockByHash", json!([hash, true]))
			.await?;

		if data.is_null() {
			return Ok(None);
		}

		Ok(Some(
			serde_json::from_value(data).with_context(|| "Failed to parse block")?,
		))
	}

	/// Retrieves a block by number with full transaction objects
	#[instrument(skip(self), fields(number))]
	async fn get_block_by_number(&self, number: u64) -> Result<Option<EVMBlock>, anyhow::Error> {
		let data = self
			.rpc_result(
				"eth_getBlockByNumber",
				json!([format!("0x{:x}", number), true]),
			)
			.await?;

		if data.is_null() {
			return Ok(None);
		}

		Ok(Some(
			serde_json::from_value(data).with_context(|| "Failed to parse block")?,
		))
	}

	/// Retrieves the deployed bytecode at an address
	#[instrument(skip(self), fields(address, block_number))]
	async fn get_code(
		&self,
		address: &str,
		block_number: Option<u64>,
	) -> Result<String, anyhow::Error> {
		let data = self
			.rpc_result("eth_getCode", json!([address, block_tag(block_number)]))
			.await?;

		data.as_str()
			.map(|s| s.to_string())
			.with_context(|| "Failed to parse code response")
	}

	/// Retrieves the balance of an address in wei
	#[instrument(skip(self), fields(address, block_number))]
	async fn get_balance(
		&self,
		address: &str,
		block_number: Option<u64>,
	) -> Result<alloy::primitives::U256, anyhow::Error> {
		let data = self
			.rpc_result("eth_getBalance", json!([address, block_tag(block_number)]))
			.await?;

		let hex_str = data
			.as_str()
			.with_context(|| "Failed to parse balance response")?;

		alloy::primitives::U256::from_str_radix(hex_str.trim_start_matches("0x"), 16)
			.map_err(|e| anyhow::anyhow!("Failed to parse balance: {}", e))
	}

	/// Retrieves the execution trace of a single transaction
	///
	/// A null result is treated as an empty trace, some nodes return null
	/// for transactions without internal calls.
	#[instrument(skip(self), fields(hash))]
	async fn trace_transaction(&self, hash: &str) -> Result<Vec<EVMTraceEntry>, anyhow::Error> {
		let data = self.rpc_result("trace_transaction", json!([hash])).await?;

		if data.is_null() {
			return Ok(Vec::new());
		}

		serde_json::from_value(data).with_context(|| "Failed to parse transaction trace")
	}

	/// Retrieves the execution traces of every transaction in a block
	#[instrument(skip(self), fields(number))]
	async fn trace_block(&self, number: u64) -> Result<Vec<EVMTraceEntry>, anyhow::Error> {
		let data = self
			.rpc_result("trace_block", json!([format!("0x{:x}", number)]))
			.await?;

		if data.is_null() {
			return Ok(Vec::new());
		}

		serde_json::from_value(data).with_context(|| "Failed to parse block trace")
	}

	/// Retrieves the latest block number
	#[instrument(skip(self))]
	async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error> {
		let data = self.rpc_result("eth_blockNumber", json!([])).await?;

		let hex_str = data
			.as_str()
			.with_context(|| "Failed to parse block number response")?;

		u64::from_str_radix(hex_str.trim_start_matches("0x"), 16)
			.map_err(|e| anyhow::anyhow!("Failed to parse block number: {}", e))
	}
}
