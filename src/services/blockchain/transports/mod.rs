//! JSON-RPC transport layer.
//!
//! One HTTP transport serves every network; per-network behavior lives in
//! the URL list the [`EndpointManager`] rotates through.

mod endpoint_manager;
mod error;
mod http;

pub use endpoint_manager::EndpointManager;
pub use error::TransportError;
pub use http::HttpTransportClient;

use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{
	default_on_request_failure, default_on_request_success, Retryable, RetryableStrategy,
};
use serde::Serialize;
use serde_json::{json, Value};

/// HTTP status codes that trigger endpoint rotation.
///
/// 429 means the current endpoint is rate limiting us; a fallback may still
/// have quota.
pub const ROTATE_ON_ERROR_CODES: [u16; 1] = [429];

/// Base trait for transport clients
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Returns the URL requests currently go to
	async fn get_current_url(&self) -> String;

	/// Sends a raw JSON-RPC request
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize;

	/// Builds the request envelope; the default is plain JSON-RPC 2.0
	async fn customize_request<P>(&self, method: &str, params: Option<P>) -> Value
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params.map(|p| p.into())
		})
	}

	/// Replaces the HTTP client behind the transport
	fn update_endpoint_manager_client(
		&mut self,
		client: ClientWithMiddleware,
	) -> Result<(), anyhow::Error>;
}

/// Transports that can switch between multiple endpoint URLs
#[async_trait::async_trait]
pub trait RotatingTransport: BlockchainTransport {
	/// Probes a candidate URL before switching to it
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error>;

	/// Makes the given URL the active one
	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error>;
}

/// Retry strategy delegating to reqwest-retry's defaults, retrying
/// transient status codes and connection failures
pub struct TransientErrorRetryStrategy;
impl RetryableStrategy for TransientErrorRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(success) => default_on_request_success(success),
			Err(error) => default_on_request_failure(error),
		}
	}
}
