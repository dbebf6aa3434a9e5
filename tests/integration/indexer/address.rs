//! Integration tests for address state derivation against scripted storage.

use evm_indexer::{
	models::{AddressDocument, AddressType, BlockSummary, TxDocument},
	services::indexer::{Address, AddressOptions, AddressRegistry},
};

use alloy::primitives::{B256, U256};
use evm_indexer::utils::tests::evm::transaction::TransactionBuilder;
use serde_json::json;

use crate::integration::mocks::{
	create_test_context, create_test_network, MockAddressRepository, MockContractResolver,
	MockNodeClient, MockTransactionRepository,
};

const ADDR: &str = "0x2acc95758f8b5f583470ba265eb685a8f45fc9d5";
const DEPLOY_TX: &str = "0x5a4bf6970980a9381e6d6c78d96ab278035bbff58c383ffe96a0a2bbc7c02a4b";

fn account_node() -> MockNodeClient {
	let mut node = MockNodeClient::new();
	node.expect_get_code().returning(|_, _| Ok("0x".to_string()));
	node.expect_get_balance()
		.returning(|_, _| Ok(U256::from(1000)));
	node
}

fn contract_node() -> MockNodeClient {
	let mut node = MockNodeClient::new();
	node.expect_get_code()
		.returning(|_, _| Ok("0x6080604052".to_string()));
	node.expect_get_balance()
		.returning(|_, _| Ok(U256::from(1000)));
	node
}

fn deployment_document() -> TxDocument {
	let tx = TransactionBuilder::new()
		.hash(B256::from_slice(&hex::decode(&DEPLOY_TX[2..]).unwrap()))
		.build();
	TxDocument {
		tx_id: "64-0-5a4bf697".to_string(),
		tx: tx.0,
		receipt: json!({ "contractAddress": ADDR }),
		..Default::default()
	}
}

#[tokio::test]
async fn test_deployment_search_runs_exactly_once() {
	let mut transactions = MockTransactionRepository::new();
	transactions
		.expect_find_by_contract_address()
		.withf(|address| address == ADDR)
		.times(1)
		.returning(|_| Ok(Some(deployment_document())));

	let mut addresses = MockAddressRepository::new();
	addresses.expect_get_by_address().returning(|_| Ok(None));

	let context = create_test_context(
		contract_node(),
		MockContractResolver::new(),
		addresses,
		transactions,
		create_test_network("Test", "test"),
	);

	let mut address = Address::new(ADDR, context, AddressOptions::default()).unwrap();
	address.fetch().await.unwrap();
	// Second fetch must not search again
	address.fetch().await.unwrap();

	let document = address.document();
	assert_eq!(document.address_type, AddressType::Contract);
	assert_eq!(document.created_by_tx.as_deref(), Some(DEPLOY_TX));
}

#[tokio::test]
async fn test_deployment_search_skipped_when_context_supplied() {
	let mut transactions = MockTransactionRepository::new();
	transactions.expect_find_by_contract_address().times(0);

	let mut addresses = MockAddressRepository::new();
	addresses.expect_get_by_address().returning(|_| Ok(None));

	let context = create_test_context(
		account_node(),
		MockContractResolver::new(),
		addresses,
		transactions,
		create_test_network("Test", "test"),
	);

	let options = AddressOptions {
		created_by_tx: Some(DEPLOY_TX.to_string()),
		deployment_code: Some("0x6080604052".to_string()),
		..Default::default()
	};
	let mut address = Address::new(ADDR, context, options).unwrap();
	address.fetch().await.unwrap();

	let document = address.document();
	assert_eq!(document.address_type, AddressType::Contract);
	assert_eq!(document.created_by_tx.as_deref(), Some(DEPLOY_TX));
}

#[tokio::test]
async fn test_save_writes_once_for_unchanged_state() {
	let mut addresses = MockAddressRepository::new();
	addresses.expect_get_by_address().returning(|_| Ok(None));
	addresses.expect_upsert().times(1).returning(|_| Ok(()));

	let context = create_test_context(
		account_node(),
		MockContractResolver::new(),
		addresses,
		MockTransactionRepository::new(),
		create_test_network("Test", "test"),
	);

	let mut address = Address::new(ADDR, context, AddressOptions::default()).unwrap();
	address.save().await.unwrap();
	address.save().await.unwrap();
}

#[tokio::test]
async fn test_stored_mining_record_survives_lower_observation() {
	let mut addresses = MockAddressRepository::new();
	addresses.expect_get_by_address().returning(|_| {
		Ok(Some(AddressDocument {
			address: ADDR.to_string(),
			last_block_mined: Some(BlockSummary {
				number: 200,
				hash: "0xstored".to_string(),
				miner: ADDR.to_string(),
				timestamp: 1_600_000_200,
			}),
			block_number: Some(200),
			balance: Some("5".to_string()),
			..Default::default()
		}))
	});

	let mut node = MockNodeClient::new();
	node.expect_get_code().returning(|_, _| Ok("0x".to_string()));
	// No balance probe below the stored height
	node.expect_get_balance().times(0);

	let context = create_test_context(
		node,
		MockContractResolver::new(),
		addresses,
		MockTransactionRepository::new(),
		create_test_network("Test", "test"),
	);

	let options = AddressOptions {
		block: Some(BlockSummary {
			number: 150,
			hash: "0xlocal".to_string(),
			miner: ADDR.to_string(),
			timestamp: 1_600_000_150,
		}),
		..Default::default()
	};
	let mut address = Address::new(ADDR, context, options).unwrap();
	address.fetch().await.unwrap();

	let document = address.document();
	assert_eq!(document.last_block_mined.as_ref().unwrap().number, 200);
	assert_eq!(document.balance.as_deref(), Some("5"));
}

#[tokio::test]
async fn test_registry_save_all_through_mock_storage() {
	let mut addresses = MockAddressRepository::new();
	addresses.expect_get_by_address().returning(|_| Ok(None));
	addresses.expect_upsert().times(2).returning(|_| Ok(()));

	let context = create_test_context(
		account_node(),
		MockContractResolver::new(),
		addresses,
		MockTransactionRepository::new(),
		create_test_network("Test", "test"),
	);

	let mut registry = AddressRegistry::new(context);
	registry.add(ADDR, AddressOptions::default()).unwrap();
	registry
		.add(
			"0x00000000000000000000000000000000000a11ce",
			AddressOptions::default(),
		)
		.unwrap();
	registry.save_all().await.unwrap();
}
