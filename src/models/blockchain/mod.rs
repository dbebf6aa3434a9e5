//! Blockchain-specific model implementations.
//!
//! This module contains the platform types the indexer consumes from the
//! node: blocks, transactions, receipts, traces, and contract ABIs.

pub mod evm;
