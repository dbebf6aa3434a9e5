//! Integration tests for the transaction normalization pipeline with
//! scripted node, resolver, and storage collaborators.

use evm_indexer::{
	models::{EVMBlock, EVMContractSpec, EVMTransaction, EVMTransactionReceipt},
	services::{
		decoder::Contract,
		indexer::{IndexerError, Tx, TxOptions},
	},
	utils::tests::evm::{
		block::BlockBuilder, receipt::ReceiptBuilder, transaction::TransactionBuilder,
	},
};

use alloy::primitives::{Address, Bytes, B256, U256};
use serde_json::json;
use tracing_test::traced_test;

use crate::integration::mocks::{
	create_test_context, create_test_network, MockAddressRepository, MockContractResolver,
	MockNodeClient, MockTransactionRepository,
};

const TX_HASH: &str = "0x5a4bf6970980a9381e6d6c78d96ab278035bbff58c383ffe96a0a2bbc7c02a4b";

fn tx_hash() -> B256 {
	B256::from_slice(&hex::decode(&TX_HASH[2..]).unwrap())
}

fn emitter() -> Address {
	Address::with_last_byte(0x22)
}

fn transfer_spec() -> EVMContractSpec {
	EVMContractSpec::from(json!([
		{
			"type": "event",
			"name": "Transfer",
			"inputs": [
				{"name": "from", "type": "address", "indexed": true},
				{"name": "to", "type": "address", "indexed": true},
				{"name": "value", "type": "uint256", "indexed": false}
			],
			"anonymous": false
		}
	]))
}

fn scripted_chain() -> (EVMTransaction, EVMBlock) {
	let block = BlockBuilder::new().number(100).transaction(tx_hash()).build();
	let tx = TransactionBuilder::new()
		.hash(tx_hash())
		.from(Address::with_last_byte(0x11))
		.to(emitter())
		.block_hash(*block.hash().unwrap())
		.block_number(100)
		.transaction_index(0)
		.build();
	(tx, block)
}

fn scripted_node(tx: EVMTransaction, receipt: EVMTransactionReceipt, block: EVMBlock) -> MockNodeClient {
	let mut node = MockNodeClient::new();
	node.expect_get_transaction_by_hash()
		.returning(move |_| Ok(Some(tx.clone())));
	node.expect_get_transaction_receipt()
		.returning(move |_| Ok(Some(receipt.clone())));
	node.expect_get_block_by_hash()
		.returning(move |_| Ok(Some(block.clone())));
	node.expect_get_code().returning(|_, _| Ok("0x".to_string()));
	node.expect_get_balance()
		.returning(|_, _| Ok(U256::from(1000)));
	node.expect_trace_transaction().returning(|_| Ok(Vec::new()));
	node
}

fn passive_storage() -> (MockAddressRepository, MockTransactionRepository) {
	let mut addresses = MockAddressRepository::new();
	addresses.expect_get_by_address().returning(|_| Ok(None));
	let mut transactions = MockTransactionRepository::new();
	transactions
		.expect_find_by_contract_address()
		.returning(|_| Ok(None));
	(addresses, transactions)
}

#[tokio::test]
async fn test_two_decodable_logs_decode_in_receipt_order() {
	let holder_a = Address::with_last_byte(0x55);
	let holder_b = Address::with_last_byte(0x66);
	let receipt = ReceiptBuilder::new()
		.transaction_hash(tx_hash())
		.transfer_log(emitter(), holder_a, holder_b, U256::from(100))
		.transfer_log(emitter(), holder_b, holder_a, U256::from(40))
		.build();
	let (tx, block) = scripted_chain();
	let node = scripted_node(tx, receipt, block);

	let mut resolver = MockContractResolver::new();
	resolver.expect_resolve().returning(|address, _| {
		Ok(Some(Contract::new(address, None, transfer_spec())))
	});

	let (addresses, transactions) = passive_storage();
	let context = create_test_context(
		node,
		resolver,
		addresses,
		transactions,
		create_test_network("Test", "test"),
	);

	let mut tx = Tx::new(TX_HASH, context, TxOptions::default(), None).unwrap();
	let document = tx.fetch(false).await.unwrap();

	assert_eq!(document.events.len(), 2);
	assert_eq!(document.events[0].event_id, "64-0-5a4bf697-0");
	assert_eq!(document.events[1].event_id, "64-0-5a4bf697-1");
	assert_eq!(document.events[0].event.as_deref(), Some("Transfer"));
	assert_eq!(document.events[1].event.as_deref(), Some("Transfer"));
	assert_eq!(
		document.events[0].log_index,
		Some(0)
	);
	assert_eq!(
		document.events[1].log_index,
		Some(1)
	);

	// Extracted holders are registered and reported as token addresses
	let expected = vec![
		format!("0x{:x}", holder_a),
		format!("0x{:x}", holder_b),
	];
	assert_eq!(document.token_addresses, expected);
	let registry = tx.into_registry();
	for holder in &expected {
		assert!(registry.keys().contains(holder));
	}
}

#[tokio::test]
#[traced_test]
async fn test_undecodable_log_is_recorded_raw_with_warning() {
	let receipt = ReceiptBuilder::new()
		.transaction_hash(tx_hash())
		.raw_log(
			emitter(),
			vec![B256::with_last_byte(0xfe)],
			Bytes::from(vec![0x01, 0x02]),
		)
		.build();
	let (tx, block) = scripted_chain();
	let node = scripted_node(tx, receipt, block);

	// The emitter resolves, but its ABI knows nothing about this topic
	let mut resolver = MockContractResolver::new();
	resolver.expect_resolve().returning(|address, _| {
		Ok(Some(Contract::new(address, None, transfer_spec())))
	});

	let (addresses, transactions) = passive_storage();
	let context = create_test_context(
		node,
		resolver,
		addresses,
		transactions,
		create_test_network("Test", "test"),
	);

	let mut tx = Tx::new(TX_HASH, context, TxOptions::default(), None).unwrap();
	let document = tx.fetch(false).await.unwrap();

	assert_eq!(document.events.len(), 1);
	assert!(document.events[0].event.is_none());
	assert!(document.events[0].signature.is_none());
	assert!(logs_contain("no matching ABI event"));
}

#[tokio::test]
async fn test_destroyed_emitter_retried_at_prior_height() {
	let holder_a = Address::with_last_byte(0x55);
	let holder_b = Address::with_last_byte(0x66);
	let receipt = ReceiptBuilder::new()
		.transaction_hash(tx_hash())
		.transfer_log(emitter(), holder_a, holder_b, U256::from(100))
		.build();
	let (tx, block) = scripted_chain();
	let node = scripted_node(tx, receipt, block);

	let emitter_hex = format!("0x{:x}", emitter());
	// No code at the observation height, decodable one block earlier
	let mut resolver = MockContractResolver::new();
	{
		let emitter_hex = emitter_hex.clone();
		resolver
			.expect_resolve()
			.withf(move |address, height| address == emitter_hex && *height == Some(100))
			.times(1)
			.returning(|_, _| Ok(None));
	}
	{
		let emitter_hex = emitter_hex.clone();
		resolver
			.expect_resolve()
			.withf(move |address, height| address == emitter_hex && *height == Some(99))
			.times(1)
			.returning(|address, _| Ok(Some(Contract::new(address, None, transfer_spec()))));
	}

	let (addresses, transactions) = passive_storage();
	let context = create_test_context(
		node,
		resolver,
		addresses,
		transactions,
		create_test_network("Test", "test"),
	);

	let mut tx = Tx::new(TX_HASH, context, TxOptions::default(), None).unwrap();
	let document = tx.fetch(false).await.unwrap();

	assert_eq!(document.events.len(), 1);
	assert_eq!(document.events[0].event.as_deref(), Some("Transfer"));
}

#[tokio::test]
async fn test_missing_receipt_fails_without_caching() {
	let (tx, block) = scripted_chain();
	let mut node = MockNodeClient::new();
	{
		let tx = tx.clone();
		node.expect_get_transaction_by_hash()
			.times(2)
			.returning(move |_| Ok(Some(tx.clone())));
	}
	node.expect_get_transaction_receipt()
		.times(2)
		.returning(|_| Ok(None));
	let _ = block;

	let (addresses, transactions) = passive_storage();
	let context = create_test_context(
		node,
		MockContractResolver::new(),
		addresses,
		transactions,
		create_test_network("Test", "test"),
	);

	let mut tx = Tx::new(TX_HASH, context, TxOptions::default(), None).unwrap();
	let first = tx.fetch(false).await;
	assert!(matches!(first, Err(IndexerError::NotFoundError(_))));

	// Nothing was cached by the failed attempt; the node is hit again
	let second = tx.fetch(false).await;
	assert!(matches!(second, Err(IndexerError::NotFoundError(_))));
}
