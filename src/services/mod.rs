//! Core services implementing the business logic.
//!
//! This module contains the main service implementations:
//! - `blockchain`: Blockchain client interfaces and implementations
//! - `decoder`: Contract ABI resolution and event log decoding
//! - `indexer`: Transaction, address, and block normalization pipeline

pub mod blockchain;
pub mod decoder;
pub mod indexer;
