//! Core domain models for the indexer.
//!
//! This module contains the canonical documents the indexer derives and
//! persists, plus the network definitions it runs against:
//! - Addresses: per-address state (type, balance, mining, destruction)
//! - Transactions: canonical transaction documents with decoded events
//! - Events: normalized per-log records
//! - Networks: chain connection details and native-contract tables

mod address;
mod event;
mod network;
mod transaction;

pub use address::{
	AddressDocument, AddressType, BlockSummary, BLOCK_NUMBER, DESTROYED_BY, LAST_BLOCK_MINED,
};
pub use event::{EventContext, EventDocument};
pub use network::{NativeContract, Network, RpcUrl};
pub use transaction::{event_id, internal_tx_id, tx_id, InternalTransaction, TxDocument, TxType};
