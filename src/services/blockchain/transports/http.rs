//! HTTP transport for JSON-RPC node access.
//!
//! Wraps a retryable `reqwest` client and an [`EndpointManager`] so that
//! requests transparently fail over between the RPC URLs configured for a
//! network. Endpoints are probed at construction time in weight order and the
//! first responsive one becomes the active URL.

use anyhow::Context;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use url::Url;

use crate::{
	models::Network,
	services::blockchain::transports::{
		BlockchainTransport, EndpointManager, RotatingTransport, TransientErrorRetryStrategy,
		TransportError,
	},
	utils::http::{create_retryable_http_client, RetryConfig},
};

/// HTTP transport client for JSON-RPC node interactions
///
/// Thread-safe and cheap to clone. The same underlying client is shared
/// between the endpoint manager and connection probing.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	/// Retryable HTTP client used for all requests
	pub client: ClientWithMiddleware,
	/// Tracks the active URL and rotates to fallbacks on failure
	endpoint_manager: EndpointManager,
	/// Stringified JSON-RPC payload used to probe endpoints
	test_connection_payload: Option<String>,
}

/// Builds the JSON-RPC request used to probe an endpoint.
///
/// Uses the caller-supplied payload when present, otherwise a plain
/// `net_version` call.
fn probe_request(test_connection_payload: &Option<String>) -> Result<Value, anyhow::Error> {
	match test_connection_payload {
		Some(payload) => {
			serde_json::from_str(payload).context("Failed to parse test payload as JSON")
		}
		None => Ok(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": "net_version",
			"params": []
		})),
	}
}

impl HttpTransportClient {
	/// Creates a new HTTP transport client for the given network
	///
	/// RPC URLs of type `rpc` with a positive weight are tried from heaviest
	/// to lightest. The first URL that answers the probe request with a
	/// success status becomes the active endpoint and the remaining URLs are
	/// kept as fallbacks.
	///
	/// # Arguments
	/// * `network` - Network configuration containing RPC URLs and weights
	/// * `test_connection_payload` - Optional JSON-RPC payload for the probe (defaults to `net_version`)
	///
	/// # Returns
	/// * `Result<Self, anyhow::Error>` - New client instance, or an error when no URL is reachable
	pub async fn new(
		network: &Network,
		test_connection_payload: Option<String>,
	) -> Result<Self, anyhow::Error> {
		let mut rpc_urls: Vec<_> = network
			.rpc_urls
			.iter()
			.filter(|rpc_url| rpc_url.type_ == "rpc" && rpc_url.weight > 0)
			.collect();

		rpc_urls.sort_by(|a, b| b.weight.cmp(&a.weight));

		let base_http_client = Arc::new(
			reqwest::ClientBuilder::new()
				.pool_idle_timeout(Duration::from_secs(90))
				.pool_max_idle_per_host(32)
				.timeout(Duration::from_secs(30))
				.connect_timeout(Duration::from_secs(20))
				.build()
				.context("Failed to create base HTTP client")?,
		);

		// One retryable client serves both the endpoint manager and the probe
		let retryable_client = create_retryable_http_client(
			&RetryConfig::default(),
			(*base_http_client).clone(),
			Some(TransientErrorRetryStrategy),
		);

		for rpc_url in rpc_urls.iter() {
			let url = match Url::parse(rpc_url.url.as_ref()) {
				Ok(url) => url,
				Err(_) => continue,
			};

			let test_request = probe_request(&test_connection_payload)?;

			let request_result = retryable_client
				.post(url.clone())
				.json(&test_request)
				.send()
				.await;

			match request_result {
				Ok(response) if response.status().is_success() => {
					let fallback_urls: Vec<String> = rpc_urls
						.iter()
						.filter(|url| url.url != rpc_url.url)
						.map(|url| url.url.as_ref().to_string())
						.collect();

					return Ok(Self {
						client: retryable_client.clone(),
						endpoint_manager: EndpointManager::new(
							retryable_client,
							rpc_url.url.as_ref(),
							fallback_urls,
						),
						test_connection_payload,
					});
				}
				// Error status or connection failure, try the next URL
				_ => continue,
			}
		}

		Err(anyhow::anyhow!("All RPC URLs failed to connect"))
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	/// Returns the URL of the currently active endpoint
	async fn get_current_url(&self) -> String {
		self.endpoint_manager.active_url.read().await.clone()
	}

	/// Sends a JSON-RPC request through the endpoint manager
	///
	/// The endpoint manager handles request formatting, retries, and URL
	/// rotation on rotation-worthy status codes.
	///
	/// # Arguments
	/// * `method` - The JSON-RPC method name to call
	/// * `params` - Optional parameters for the method call
	///
	/// # Returns
	/// * `Result<Value, TransportError>` - JSON response or error with context
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let response = self
			.endpoint_manager
			.send_raw_request(self, method, params)
			.await?;

		Ok(response)
	}

	/// Replaces the endpoint manager's HTTP client
	fn update_endpoint_manager_client(
		&mut self,
		client: ClientWithMiddleware,
	) -> Result<(), anyhow::Error> {
		self.endpoint_manager.update_client(client);
		Ok(())
	}
}

#[async_trait]
impl RotatingTransport for HttpTransportClient {
	/// Probes a candidate endpoint before rotating to it
	///
	/// # Arguments
	/// * `url` - The URL to test
	///
	/// # Returns
	/// * `Result<(), anyhow::Error>` - Success or detailed error message
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error> {
		let url = Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;

		let test_request = probe_request(&self.test_connection_payload)?;

		match self.client.post(url.clone()).json(&test_request).send().await {
			Ok(response) => {
				let status = response.status();
				if !status.is_success() {
					Err(anyhow::anyhow!(
						"Failed to connect to {}: {}",
						url,
						status.as_u16()
					))
				} else {
					Ok(())
				}
			}
			Err(e) => Err(anyhow::anyhow!("Failed to connect to {}: {}", url, e)),
		}
	}

	/// Makes the given URL the active endpoint
	///
	/// The HTTP client itself is URL-agnostic, so rotation only updates the
	/// endpoint manager's active URL. Trailing slashes are trimmed so URL
	/// comparisons stay consistent.
	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error> {
		let parsed_url = Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;
		let normalized_url = parsed_url.as_str().trim_end_matches('/');

		let mut active_url = self.endpoint_manager.active_url.write().await;
		*active_url = normalized_url.to_string();
		Ok(())
	}
}
