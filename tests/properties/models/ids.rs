use crate::properties::strategies::hash_strategy;

use evm_indexer::models::{event_id, internal_tx_id, tx_id};
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	// Determinism & Format Tests
	#[test]
	fn test_tx_id_is_deterministic_lowercase_hex(
		block_number in proptest::arbitrary::any::<u64>(),
		transaction_index in proptest::arbitrary::any::<u64>(),
		hash in hash_strategy()
	) {
		let id = tx_id(block_number, transaction_index, &hash);

		// Stable across re-fetches
		prop_assert_eq!(&id, &tx_id(block_number, transaction_index, &hash));

		// Case-insensitive in the hash digits
		let upper = format!("0x{}", hash[2..].to_uppercase());
		prop_assert_eq!(&id, &tx_id(block_number, transaction_index, &upper));

		let parts: Vec<&str> = id.split('-').collect();
		prop_assert_eq!(parts.len(), 3);
		prop_assert_eq!(u64::from_str_radix(parts[0], 16).unwrap(), block_number);
		prop_assert_eq!(u64::from_str_radix(parts[1], 16).unwrap(), transaction_index);
		prop_assert_eq!(parts[2], &hash[2..10]);
		prop_assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
	}

	// Uniqueness within a block
	#[test]
	fn test_tx_id_distinct_per_index(
		block_number in proptest::arbitrary::any::<u64>(),
		index_a in 0..1_000u64,
		index_b in 0..1_000u64,
		hash in hash_strategy()
	) {
		prop_assume!(index_a != index_b);
		prop_assert_ne!(
			tx_id(block_number, index_a, &hash),
			tx_id(block_number, index_b, &hash)
		);
	}

	#[test]
	fn test_event_id_extends_tx_id(
		block_number in proptest::arbitrary::any::<u64>(),
		transaction_index in proptest::arbitrary::any::<u64>(),
		hash in hash_strategy(),
		log_index in proptest::arbitrary::any::<u64>()
	) {
		let parent = tx_id(block_number, transaction_index, &hash);
		let id = event_id(&parent, log_index);

		prop_assert!(id.starts_with(&parent));
		let suffix = &id[parent.len() + 1..];
		prop_assert_eq!(u64::from_str_radix(suffix, 16).unwrap(), log_index);
	}

	#[test]
	fn test_internal_tx_id_encodes_trace_address(
		block_number in proptest::arbitrary::any::<u64>(),
		transaction_index in proptest::arbitrary::any::<u64>(),
		hash in hash_strategy(),
		trace_address in proptest::collection::vec(0..100u64, 0..6)
	) {
		let parent = tx_id(block_number, transaction_index, &hash);
		let id = internal_tx_id(&parent, &trace_address);

		prop_assert!(id.starts_with(&parent));
		let suffix = &id[parent.len() + 1..];
		if trace_address.is_empty() {
			// Top-level entries collapse to a fixed suffix
			prop_assert_eq!(suffix, "0");
		} else {
			let decoded: Vec<u64> = suffix
				.split('.')
				.map(|part| part.parse().unwrap())
				.collect();
			prop_assert_eq!(decoded, trace_address);
		}
	}

	// Distinct trace paths must never collide within one transaction
	#[test]
	fn test_internal_tx_id_distinct_per_path(
		trace_a in proptest::collection::vec(0..100u64, 1..6),
		trace_b in proptest::collection::vec(0..100u64, 1..6)
	) {
		prop_assume!(trace_a != trace_b);
		prop_assert_ne!(
			internal_tx_id("64-0-5a4bf697", &trace_a),
			internal_tx_id("64-0-5a4bf697", &trace_b)
		);
	}
}
