//! Repository implementations for configuration and document storage.
//!
//! This module provides traits and implementations for loading configuration
//! from the filesystem and for persisting the documents the pipeline
//! produces:
//!
//! - Network: loads network configurations defining blockchain connection details
//! - Abi: loads known-contract ABI entries for the resolver
//! - Address: stores per-address state documents (in-memory or JSON files)
//! - Transaction: stores canonical transaction documents (in-memory or JSON files)

mod abi;
mod address;
mod error;
mod network;
mod transaction;

pub use abi::{AbiRepository, AbiRepositoryTrait};
pub use address::{AddressRepositoryTrait, FileAddressRepository, InMemoryAddressRepository};
pub use error::RepositoryError;
pub use network::{NetworkRepository, NetworkRepositoryTrait, NetworkService};
pub use transaction::{
	FileTransactionRepository, InMemoryTransactionRepository, TransactionRepositoryTrait,
};
