use mockito::Server;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;

use evm_indexer::services::blockchain::{BlockchainTransport, EndpointManager, TransportError};

use crate::integration::mocks::{AlwaysFailsToUpdateClientTransport, MockTransport};

fn plain_client() -> ClientWithMiddleware {
	ClientBuilder::new(reqwest::Client::new()).build()
}

fn success_body() -> &'static str {
	r#"{"jsonrpc": "2.0", "result": "success", "id": 1}"#
}

#[tokio::test]
async fn test_rotation_picks_first_fallback() {
	let server1 = Server::new_async().await;
	let mut server2 = Server::new_async().await;
	let server3 = Server::new_async().await;

	// MockTransport probes the candidate with a GET before rotating
	let probe = server2
		.mock("GET", "/")
		.with_status(200)
		.create_async()
		.await;

	let manager = EndpointManager::new(
		plain_client(),
		server1.url().as_ref(),
		vec![server2.url(), server3.url()],
	);
	let transport = MockTransport::new();

	assert_eq!(&*manager.active_url.read().await, &server1.url());
	assert_eq!(
		&*manager.fallback_urls.read().await,
		&vec![server2.url(), server3.url()]
	);

	let new_url = manager.try_rotate_url(&transport).await.unwrap();
	assert_eq!(new_url, server2.url());
	assert_eq!(&*manager.active_url.read().await, &server2.url());

	probe.assert();
}

#[tokio::test]
async fn test_send_raw_request_success() {
	let mut server = Server::new_async().await;

	let mock = server
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(success_body())
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), server.url().as_ref(), vec![]);
	let transport = MockTransport::new();

	let result = manager
		.send_raw_request(&transport, "test_method", Some(json!(["param1"])))
		.await
		.unwrap();

	assert_eq!(result["result"], "success");
	mock.assert();
}

#[tokio::test]
async fn test_429_rotates_to_fallback() {
	let mut primary_server = Server::new_async().await;
	let mut fallback_server = Server::new_async().await;

	// One request only; rate limited responses rotate instead of retrying
	let primary_mock = primary_server
		.mock("POST", "/")
		.with_status(429)
		.with_body("Rate limited")
		.expect(1)
		.create_async()
		.await;

	let fallback_mock = fallback_server
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(success_body())
		.create_async()
		.await;

	let manager = EndpointManager::new(
		plain_client(),
		primary_server.url().as_ref(),
		vec![fallback_server.url()],
	);
	let transport = MockTransport::new();

	let result = manager
		.send_raw_request(&transport, "test_method", Some(json!(["param1"])))
		.await
		.unwrap();

	assert_eq!(result["result"], "success");
	assert_eq!(&*manager.active_url.read().await, &fallback_server.url());
	primary_mock.assert();
	fallback_mock.assert();
}

#[tokio::test]
async fn test_429_without_fallback_surfaces_http_error() {
	let mut server = Server::new_async().await;

	let mock = server
		.mock("POST", "/")
		.with_status(429)
		.with_body("Rate limited")
		.expect(1)
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), server.url().as_ref(), vec![]);
	let transport = MockTransport::new();

	let err = manager
		.send_raw_request(&transport, "test_method", Some(json!(["param1"])))
		.await
		.unwrap_err();

	match err {
		TransportError::Http {
			status_code,
			url,
			body,
			..
		} => {
			assert_eq!(status_code, 429);
			assert_eq!(url, server.url());
			assert_eq!(body, "Rate limited");
		}
		_ => panic!("Expected Http error with status code 429"),
	}
	mock.assert();
}

#[tokio::test]
async fn test_customize_request_builds_jsonrpc_envelope() {
	let transport = MockTransport::new();

	let with_params = transport
		.customize_request("test_method", Some(json!(["param1", "param2"])))
		.await;
	assert_eq!(
		with_params,
		json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": "test_method",
			"params": ["param1", "param2"]
		})
	);

	let without_params = transport
		.customize_request::<Value>("test_method", None)
		.await;
	assert_eq!(
		without_params,
		json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": "test_method",
			"params": null
		})
	);
}

#[tokio::test]
async fn test_rotation_fails_without_fallbacks() {
	let server = Server::new_async().await;

	let manager = EndpointManager::new(plain_client(), server.url().as_ref(), vec![]);
	let transport = MockTransport::new();

	match manager.try_rotate_url(&transport).await.unwrap_err() {
		TransportError::UrlRotation(ctx) => {
			assert!(ctx.to_string().contains("No fallback URLs available"));
		}
		_ => panic!("Expected UrlRotation error"),
	}

	assert_eq!(&*manager.active_url.read().await, &server.url());
}

#[tokio::test]
async fn test_rotation_skips_fallbacks_equal_to_active() {
	let server = Server::new_async().await;
	let active_url = server.url();

	let manager = EndpointManager::new(
		plain_client(),
		active_url.as_ref(),
		vec![active_url.clone(), active_url.clone()],
	);
	let transport = MockTransport::new();

	match manager.try_rotate_url(&transport).await.unwrap_err() {
		TransportError::UrlRotation(ctx) => {
			assert!(ctx.to_string().contains("No fallback URLs available"));
			assert!(ctx.to_string().contains(&active_url));
		}
		_ => panic!("Expected UrlRotation error"),
	}

	// State untouched on failed rotation
	assert_eq!(&*manager.active_url.read().await, &active_url);
	assert_eq!(
		&*manager.fallback_urls.read().await,
		&vec![active_url.clone(), active_url.clone()]
	);
}

#[tokio::test]
async fn test_rotation_keeps_unreachable_fallback_in_list() {
	let server = Server::new_async().await;
	let invalid_url = "http://invalid-domain-that-does-not-exist:12345";

	let manager = EndpointManager::new(
		plain_client(),
		server.url().as_ref(),
		vec![invalid_url.to_string()],
	);
	let transport = MockTransport::new();

	match manager.try_rotate_url(&transport).await.unwrap_err() {
		TransportError::UrlRotation(ctx) => {
			assert!(ctx.to_string().contains("Failed to connect to new URL"));
			assert!(ctx.to_string().contains(invalid_url));
		}
		_ => panic!("Expected UrlRotation error"),
	}

	assert_eq!(&*manager.active_url.read().await, &server.url());
	assert_eq!(
		&*manager.fallback_urls.read().await,
		&vec![invalid_url.to_string()]
	);
}

#[tokio::test]
async fn test_rotation_fails_when_transport_rejects_update() {
	let server1 = Server::new_async().await;
	let server2 = Server::new_async().await;

	let manager = EndpointManager::new(
		plain_client(),
		server1.url().as_ref(),
		vec![server2.url()],
	);
	let transport = AlwaysFailsToUpdateClientTransport {
		current_url: Arc::new(RwLock::new(server1.url())),
	};

	match manager.try_rotate_url(&transport).await.unwrap_err() {
		TransportError::UrlRotation(ctx) => {
			assert!(ctx
				.to_string()
				.contains("Failed to update transport client with new URL"));
		}
		_ => panic!("Expected UrlRotation error"),
	}

	assert_eq!(&*manager.active_url.read().await, &server1.url());
}

#[tokio::test]
async fn test_rotation_fails_when_every_url_is_down() {
	let manager = EndpointManager::new(
		plain_client(),
		"http://invalid-domain-that-will-fail-1:12345",
		vec!["http://invalid-domain-that-will-fail-2:12345".to_string()],
	);
	let transport = MockTransport::new();

	let result = manager.try_rotate_url(&transport).await;
	assert!(matches!(
		result.unwrap_err(),
		TransportError::UrlRotation(_)
	));
}

#[tokio::test]
async fn test_update_client_swaps_http_client() {
	let mut server = Server::new_async().await;

	// Distinct response bodies tell the two clients apart
	let initial_mock = server
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"jsonrpc": "2.0", "result": "initial_client", "id": 1}"#)
		.expect(1)
		.create_async()
		.await;

	let mut manager = EndpointManager::new(plain_client(), server.url().as_ref(), vec![]);
	let transport = MockTransport::new();

	let initial_result = manager
		.send_raw_request(&transport, "test_method", Some(json!(["param1"])))
		.await
		.unwrap();
	assert_eq!(initial_result["result"], "initial_client");
	initial_mock.assert();

	let updated_mock = server
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"jsonrpc": "2.0", "result": "updated_client", "id": 1}"#)
		.expect(1)
		.create_async()
		.await;

	let new_client = ClientBuilder::new(reqwest::Client::new())
		.with(RetryTransientMiddleware::new_with_policy(
			ExponentialBackoff::builder().build_with_max_retries(3),
		))
		.build();
	manager.update_client(new_client);

	let updated_result = manager
		.send_raw_request(&transport, "test_method", Some(json!(["param1"])))
		.await
		.unwrap();
	assert_eq!(updated_result["result"], "updated_client");
	updated_mock.assert();
}

#[tokio::test]
async fn test_network_error_rotates_and_retries() {
	let invalid_url = "http://invalid-domain-that-will-fail:12345";
	let mut valid_server = Server::new_async().await;

	let success_mock = valid_server
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(success_body())
		.expect(1)
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), invalid_url, vec![valid_server.url()]);
	let transport = MockTransport::new();

	let response = manager
		.send_raw_request(&transport, "test_method", Some(json!(["param1"])))
		.await
		.unwrap();

	assert_eq!(response["result"], "success");
	assert_eq!(&*manager.active_url.read().await, &valid_server.url());
	success_mock.assert();
}

#[tokio::test]
async fn test_network_error_without_fallback() {
	let invalid_url = "http://invalid-domain-that-will-fail:12345";
	let manager = EndpointManager::new(plain_client(), invalid_url, vec![]);
	let transport = MockTransport::new();

	let result = manager
		.send_raw_request(&transport, "test_method", Some(json!(["param1"])))
		.await;

	assert!(matches!(result.unwrap_err(), TransportError::Network(_)));
	assert_eq!(&*manager.active_url.read().await, invalid_url);
}

#[tokio::test]
async fn test_truncated_response_is_a_parse_error() {
	let mut server = Server::new_async().await;

	let mock = server
		.mock("POST", "/")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(r#"{"jsonrpc": "2.0", "result": "invalid_json"#)
		.expect(1)
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), server.url().as_ref(), vec![]);
	let transport = MockTransport::new();

	let result = manager
		.send_raw_request(&transport, "test_method", Some(json!(["param1"])))
		.await;

	assert!(matches!(
		result.unwrap_err(),
		TransportError::ResponseParse(_)
	));
	mock.assert();
}

#[tokio::test]
async fn test_all_urls_down_is_a_network_error() {
	let manager = EndpointManager::new(
		plain_client(),
		"http://invalid-domain-that-will-fail-1:12345",
		vec![
			"http://invalid-domain-that-will-fail-2:12345".to_string(),
			"http://invalid-domain-that-will-fail-3:12345".to_string(),
		],
	);
	let transport = MockTransport::new();

	let result = manager
		.send_raw_request(&transport, "test_method", Some(json!(["param1"])))
		.await;

	assert!(matches!(result.unwrap_err(), TransportError::Network(_)));
}

#[tokio::test]
async fn test_400_does_not_rotate() {
	let mut server = Server::new_async().await;

	let mock = server
		.mock("POST", "/")
		.with_status(400)
		.with_body("Bad Request")
		.expect(1)
		.create_async()
		.await;

	let manager = EndpointManager::new(plain_client(), server.url().as_ref(), vec![]);
	let transport = MockTransport::new();

	let err = manager
		.send_raw_request(&transport, "test_method", Some(json!(["param1"])))
		.await
		.unwrap_err();

	match err {
		TransportError::Http {
			status_code,
			url,
			body,
			..
		} => {
			assert_eq!(status_code, 400);
			assert_eq!(url, server.url());
			assert_eq!(body, "Bad Request");
		}
		_ => panic!("Expected Http error with status code 400"),
	}
	mock.assert();
}
