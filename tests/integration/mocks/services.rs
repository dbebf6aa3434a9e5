//! Mock implementations of service traits.
//!
//! Provides a mock contract resolver so pipeline tests can script which
//! addresses decode as contracts without probing a node.

use async_trait::async_trait;
use mockall::mock;

use evm_indexer::services::decoder::{Contract, ContractResolver, DecoderError};

mock! {
	/// Mock implementation of the contract resolver.
	///
	/// Scripts the "is there a decodable contract at this address" answer
	/// for testing purposes.
	pub ContractResolver {}

	#[async_trait]
	impl ContractResolver for ContractResolver {
		async fn resolve(
			&self,
			address: &str,
			block_number: Option<u64>,
		) -> Result<Option<Contract>, DecoderError>;
	}
}
