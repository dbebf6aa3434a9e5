//! Blockchain client interfaces and implementations.
//!
//! Provides abstractions and concrete implementations for interacting with
//! EVM networks. Includes:
//!
//! - Node client trait consumed by the indexing pipeline
//! - EVM JSON-RPC client
//! - Network transport implementations

mod client;
mod clients;
mod transports;

pub use client::NodeClient;
pub use clients::EvmClient;
pub use transports::{
	BlockchainTransport, EndpointManager, HttpTransportClient, RotatingTransport,
	TransientErrorRetryStrategy, TransportError,
};
