//! RPC endpoint rotation.
//!
//! Tracks the active URL for a transport together with its fallbacks, and
//! retries failed requests on the next reachable fallback. Rotation happens
//! on network errors and on a fixed set of HTTP status codes.
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::services::blockchain::transports::{
	RotatingTransport, TransportError, ROTATE_ON_ERROR_CODES,
};

/// Shared endpoint state for a rotating transport
///
/// Clones share the same active URL and fallback list, so every handle to a
/// transport observes rotations immediately.
#[derive(Clone, Debug)]
pub struct EndpointManager {
	pub active_url: Arc<RwLock<String>>,
	pub fallback_urls: Arc<RwLock<Vec<String>>>,
	client: ClientWithMiddleware,
	rotation_lock: Arc<tokio::sync::Mutex<()>>,
}

/// Outcome of a single request attempt against one URL
#[derive(Debug)]
enum RequestAttempt {
	/// Got a response back, status may still indicate failure
	Response(reqwest::Response),
	/// Send failed at the network layer (connection, timeout)
	NetworkError(reqwest_middleware::Error),
	/// The request body could not be serialized, never retried
	SerializationError(TransportError),
}

impl EndpointManager {
	/// Creates a new endpoint manager
	///
	/// # Arguments
	/// * `client` - HTTP client used for all requests
	/// * `active_url` - The initial active URL
	/// * `fallback_urls` - URLs to rotate to when the active one fails
	pub fn new(client: ClientWithMiddleware, active_url: &str, fallback_urls: Vec<String>) -> Self {
		Self {
			active_url: Arc::new(RwLock::new(active_url.to_string())),
			fallback_urls: Arc::new(RwLock::new(fallback_urls)),
			rotation_lock: Arc::new(tokio::sync::Mutex::new(())),
			client,
		}
	}

	/// Replaces the HTTP client, e.g. to install a different retry policy
	pub fn update_client(&mut self, client: ClientWithMiddleware) {
		self.client = client;
	}

	/// Rotates to the next reachable fallback URL
	///
	/// Holds the rotation lock for the full attempt so concurrent failures
	/// trigger at most one rotation. The displaced active URL is appended to
	/// the fallback list so it can be retried later.
	///
	/// # Arguments
	/// * `transport` - The transport performing the connectivity check
	///
	/// # Returns
	/// * `Result<String, TransportError>` - The new active URL, or an error when no fallback works
	pub async fn try_rotate_url<T: RotatingTransport>(
		&self,
		transport: &T,
	) -> Result<String, TransportError> {
		let _guard = self.rotation_lock.lock().await;
		let initial_active_url = self.active_url.read().await.clone();
		let fallbacks_snapshot = self.fallback_urls.read().await.clone();

		tracing::debug!(
			"Trying to rotate URL: Current Active: '{}', Fallbacks: {:?}",
			initial_active_url,
			fallbacks_snapshot,
		);

		let new_url = match fallbacks_snapshot
			.iter()
			.find(|&url| *url != initial_active_url)
		{
			Some(url) => url.clone(),
			None => {
				let msg = format!(
					"No fallback URLs available. Current active: '{}', Fallbacks checked: {:?}",
					initial_active_url, fallbacks_snapshot
				);
				return Err(TransportError::url_rotation(msg, None, None));
			}
		};

		transport
			.try_connect(&new_url)
			.await
			.map_err(|connect_err| {
				TransportError::url_rotation(
					format!("Failed to connect to new URL '{}'", new_url),
					Some(connect_err.into()),
					None,
				)
			})?;

		transport
			.update_client(&new_url)
			.await
			.map_err(|update_err| {
				TransportError::url_rotation(
					format!(
						"Failed to update transport client with new URL '{}'",
						new_url
					),
					Some(update_err.into()),
					None,
				)
			})?;

		// Both checks passed, commit the new state under the write locks
		{
			let mut active_url_guard = self.active_url.write().await;
			let mut fallback_urls_guard = self.fallback_urls.write().await;

			let mut next_fallback_urls: Vec<String> = fallback_urls_guard
				.iter()
				.filter(|url| **url != new_url)
				.cloned()
				.collect();
			next_fallback_urls.push(initial_active_url.clone());

			tracing::debug!(
				"Successful URL rotation - from: '{}', to: '{}'. New Fallbacks: {:?}",
				initial_active_url,
				new_url,
				next_fallback_urls
			);

			*fallback_urls_guard = next_fallback_urls;
			*active_url_guard = new_url.clone();
		}
		Ok(new_url)
	}

	/// Sends one request to the given URL and classifies the outcome
	async fn try_request_on_url<P>(
		&self,
		url: &str,
		transport: &impl RotatingTransport,
		method: &str,
		params: Option<P>,
	) -> RequestAttempt
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let request_body = transport.customize_request(method, params).await;

		let request_body_str = match serde_json::to_string(&request_body) {
			Ok(body) => body,
			Err(e) => {
				tracing::error!("Failed to serialize request body: {}", e);
				return RequestAttempt::SerializationError(TransportError::request_serialization(
					"Failed to serialize request JSON",
					Some(Box::new(e)),
					None,
				));
			}
		};

		let response_result = self
			.client
			.post(url)
			.header("Content-Type", "application/json")
			.body(request_body_str)
			.send()
			.await;

		match response_result {
			Ok(response) => RequestAttempt::Response(response),
			Err(network_error) => {
				tracing::warn!("Network error while sending request: {}", network_error);
				RequestAttempt::NetworkError(network_error)
			}
		}
	}

	/// Sends a JSON-RPC request, rotating URLs on failure
	///
	/// Network errors always trigger a rotation attempt. HTTP errors rotate
	/// only when the status code is in [`ROTATE_ON_ERROR_CODES`]. After a
	/// successful rotation the request is retried on the new active URL; when
	/// rotation fails the original error is returned with the rotation error
	/// attached as its source.
	///
	/// # Arguments
	/// * `transport` - The transport client implementing the RotatingTransport trait
	/// * `method` - The RPC method name to call
	/// * `params` - The parameters for the RPC method call as a JSON Value
	///
	/// # Returns
	/// * `Result<Value, TransportError>` - The JSON response from the RPC endpoint or an error
	pub async fn send_raw_request<
		T: RotatingTransport,
		P: Into<Value> + Send + Clone + Serialize,
	>(
		&self,
		transport: &T,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError> {
		loop {
			let current_url = self.active_url.read().await.clone();

			tracing::debug!("Attempting request on active URL: '{}'", current_url);

			let attempt = self
				.try_request_on_url(&current_url, transport, method, params.clone())
				.await;

			match attempt {
				RequestAttempt::Response(response) => {
					let status = response.status();
					if status.is_success() {
						return response.json().await.map_err(|e| {
							TransportError::response_parse(
								"Failed to parse JSON response".to_string(),
								Some(Box::new(e)),
								None,
							)
						});
					}

					let error_body = response.text().await.unwrap_or_default();
					tracing::warn!(
						"Request to {} failed with status {}: {}",
						current_url,
						status,
						error_body
					);

					if ROTATE_ON_ERROR_CODES.contains(&status.as_u16()) {
						match self.try_rotate_url(transport).await {
							Ok(_new_url) => continue,
							Err(rotation_error) => {
								return Err(TransportError::http(
									status,
									current_url.clone(),
									error_body,
									Some(Box::new(rotation_error)),
									None,
								));
							}
						}
					}

					tracing::warn!(
						"HTTP error status {} on {} does not trigger rotation. Failing.",
						status,
						current_url
					);
					return Err(TransportError::http(status, current_url, error_body, None, None));
				}
				RequestAttempt::NetworkError(network_error) => {
					tracing::warn!("Network error for {}: {}", current_url, network_error);

					match self.try_rotate_url(transport).await {
						Ok(new_url) => {
							tracing::debug!(
								"Rotation successful after network error, retrying request on new URL: '{}'",
								new_url
							);
							continue;
						}
						Err(rotation_error) => {
							return Err(TransportError::network(
								network_error.to_string(),
								Some(Box::new(rotation_error)),
								None,
							));
						}
					}
				}
				RequestAttempt::SerializationError(serialization_error) => {
					return Err(serialization_error);
				}
			}
		}
	}
}
