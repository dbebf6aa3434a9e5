use crate::integration::mocks::{
	create_evm_test_network_with_urls, create_evm_valid_server_mock_network_response,
	MockEVMTransportClient,
};
use mockall::predicate;
use mockito::Server;
use serde_json::json;

use evm_indexer::services::blockchain::{EvmClient, NodeClient};

#[tokio::test]
async fn test_get_transaction_by_hash_handles_null() {
	let mut transport = MockEVMTransportClient::new();
	transport
		.expect_send_raw_request()
		.with(
			predicate::eq("eth_getTransactionByHash"),
			predicate::eq(Some(vec![json!("0x123")])),
		)
		.times(1)
		.returning(|_, _| Ok(json!({"jsonrpc": "2.0", "id": 1, "result": null})));

	let client = EvmClient::new_with_transport(transport);
	let result = client.get_transaction_by_hash("0x123").await.unwrap();
	assert!(result.is_none());
}

#[tokio::test]
async fn test_get_code_at_height() {
	let mut transport = MockEVMTransportClient::new();
	transport
		.expect_send_raw_request()
		.with(
			predicate::eq("eth_getCode"),
			predicate::eq(Some(vec![json!("0xabc"), json!("0x64")])),
		)
		.times(1)
		.returning(|_, _| Ok(json!({"jsonrpc": "2.0", "id": 1, "result": "0x6080604052"})));

	let client = EvmClient::new_with_transport(transport);
	let code = client.get_code("0xabc", Some(100)).await.unwrap();
	assert_eq!(code, "0x6080604052");
}

#[tokio::test]
async fn test_get_balance_parses_hex() {
	let mut transport = MockEVMTransportClient::new();
	transport
		.expect_send_raw_request()
		.with(
			predicate::eq("eth_getBalance"),
			predicate::eq(Some(vec![json!("0xabc"), json!("latest")])),
		)
		.times(1)
		.returning(|_, _| Ok(json!({"jsonrpc": "2.0", "id": 1, "result": "0x3e8"})));

	let client = EvmClient::new_with_transport(transport);
	let balance = client.get_balance("0xabc", None).await.unwrap();
	assert_eq!(balance, alloy::primitives::U256::from(1000));
}

#[tokio::test]
async fn test_get_latest_block_number() {
	let mut transport = MockEVMTransportClient::new();
	transport
		.expect_send_raw_request()
		.with(predicate::eq("eth_blockNumber"), predicate::always())
		.times(1)
		.returning(|_, _| Ok(json!({"jsonrpc": "2.0", "id": 1, "result": "0x64"})));

	let client = EvmClient::new_with_transport(transport);
	let number = client.get_latest_block_number().await.unwrap();
	assert_eq!(number, 100);
}

#[tokio::test]
async fn test_trace_transaction_handles_null() {
	let mut transport = MockEVMTransportClient::new();
	transport
		.expect_send_raw_request()
		.with(predicate::eq("trace_transaction"), predicate::always())
		.times(1)
		.returning(|_, _| Ok(json!({"jsonrpc": "2.0", "id": 1, "result": null})));

	let client = EvmClient::new_with_transport(transport);
	let trace = client.trace_transaction("0x123").await.unwrap();
	assert!(trace.is_empty());
}

#[tokio::test]
async fn test_missing_result_field_is_an_error() {
	let mut transport = MockEVMTransportClient::new();
	transport
		.expect_send_raw_request()
		.times(1)
		.returning(|_, _| Ok(json!({"jsonrpc": "2.0", "id": 1})));

	let client = EvmClient::new_with_transport(transport);
	let result = client.get_latest_block_number().await;
	assert!(result
		.unwrap_err()
		.to_string()
		.contains("Missing 'result' field"));
}

#[tokio::test]
async fn test_new_client() {
	let mut server = Server::new_async().await;

	let mock = create_evm_valid_server_mock_network_response(&mut server);
	// Create a test network
	let network = create_evm_test_network_with_urls(vec![&server.url()]);

	// Test successful client creation
	let result = EvmClient::new(&network).await;
	assert!(result.is_ok(), "Client creation should succeed");
	mock.assert();
}
