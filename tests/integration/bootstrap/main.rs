//! Integration tests for service stack initialization.

use evm_indexer::bootstrap::{initialize_services, BootstrapConfig};

use mockito::Server;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

use crate::integration::mocks::create_evm_valid_server_mock_network_response;

fn write_network_config(dir: &TempDir, slug: &str, rpc_url: &str) {
	let networks = dir.path().join("networks");
	fs::create_dir_all(&networks).unwrap();
	fs::write(
		networks.join(format!("{}.json", slug)),
		json!({
			"slug": slug,
			"name": "Test Network",
			"chain_id": 31,
			"rpc_urls": [
				{
					"type_": "rpc",
					"url": { "type": "plain", "value": rpc_url },
					"weight": 100
				}
			]
		})
		.to_string(),
	)
	.unwrap();
}

#[tokio::test]
async fn test_initialize_services_with_in_memory_storage() {
	let mut server = Server::new_async().await;
	let mock = create_evm_valid_server_mock_network_response(&mut server);

	let config_dir = TempDir::new().unwrap();
	write_network_config(&config_dir, "test", &server.url());

	let stack = initialize_services(BootstrapConfig {
		network_slug: "test".to_string(),
		config_path: Some(config_dir.path().to_path_buf()),
		data_dir: None,
	})
	.await
	.unwrap();

	assert_eq!(stack.network.slug, "test");
	assert_eq!(stack.network.chain_id, Some(31));
	assert_eq!(stack.context.transactions.count().await.unwrap(), 0);
	mock.assert();
}

#[tokio::test]
async fn test_initialize_services_with_file_storage() {
	let mut server = Server::new_async().await;
	let _mock = create_evm_valid_server_mock_network_response(&mut server);

	let config_dir = TempDir::new().unwrap();
	let data_dir = TempDir::new().unwrap();
	write_network_config(&config_dir, "test", &server.url());

	let stack = initialize_services(BootstrapConfig {
		network_slug: "test".to_string(),
		config_path: Some(config_dir.path().to_path_buf()),
		data_dir: Some(data_dir.path().to_path_buf()),
	})
	.await
	.unwrap();

	// File-backed storage starts empty; directories appear on first write
	assert_eq!(stack.context.addresses.count().await.unwrap(), 0);
	assert_eq!(stack.context.transactions.count().await.unwrap(), 0);
	assert!(!data_dir.path().join("addresses").exists());
}

#[tokio::test]
async fn test_initialize_services_rejects_unknown_network() {
	let mut server = Server::new_async().await;
	let _mock = create_evm_valid_server_mock_network_response(&mut server);

	let config_dir = TempDir::new().unwrap();
	write_network_config(&config_dir, "test", &server.url());

	let result = initialize_services(BootstrapConfig {
		network_slug: "absent".to_string(),
		config_path: Some(config_dir.path().to_path_buf()),
		data_dir: None,
	})
	.await;

	let error = result.err().expect("unknown slug must fail");
	let message = error.to_string();
	assert!(message.contains("Network not found"));
	assert!(message.contains("test"));
}
