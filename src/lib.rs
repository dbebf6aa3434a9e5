//! EVM blockchain indexing service.
//!
//! This library normalizes raw EVM chain data into queryable documents. It includes:
//!
//! - Network and ABI configuration management through JSON files
//! - Transaction, event, internal transaction and address normalization
//! - Event log decoding against contract ABIs
//! - Extensible repository and service architecture
//!
//! # Module Structure
//!
//! - `bootstrap`: Bootstraps the application
//! - `models`: Data structures for configuration and blockchain data
//! - `repositories`: Configuration storage and management
//! - `services`: Core business logic and blockchain interaction
//! - `utils`: Common utilities and helper functions

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
