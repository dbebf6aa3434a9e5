//! Domain models and data structures for blockchain indexing.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `blockchain`: EVM node types (blocks, transactions, receipts, traces, ABIs)
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (Network, addresses, events, tx documents)
//! - `security`: Security models (Secret)

mod blockchain;
mod config;
mod core;
mod security;

// Re-export blockchain types
pub use blockchain::evm::{
	EVMBaseBlock, EVMBaseReceipt, EVMBaseTransaction, EVMBlock, EVMContractSpec, EVMDecodedEvent,
	EVMDecodedParamEntry, EVMReceiptLog, EVMTraceAction, EVMTraceActionType, EVMTraceEntry,
	EVMTraceResult, EVMTransaction, EVMTransactionReceipt,
};

// Re-export core types
pub use core::{
	event_id, internal_tx_id, tx_id, AddressDocument, AddressType, BlockSummary, EventContext,
	EventDocument, InternalTransaction, NativeContract, Network, RpcUrl, TxDocument, TxType,
	BLOCK_NUMBER, DESTROYED_BY, LAST_BLOCK_MINED,
};

// Re-export config types
pub use config::{ConfigError, ConfigLoader, ContractAbi};

// Re-export security types
pub use security::{SecretString, SecretValue, SecurityError};
