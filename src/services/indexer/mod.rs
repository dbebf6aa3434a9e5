//! Indexing pipeline.
//!
//! Normalizes raw chain data into the stored documents: `Address` derives
//! per-address state, `AddressRegistry` shares instances within a scope,
//! `TxTrace` partitions execution traces, `Tx` orchestrates one
//! transaction, and `BlockIndexer` runs whole blocks.

mod address;
mod block;
mod error;
mod registry;
mod trace;
mod transaction;

pub use address::{Address, AddressContext, AddressOptions};
pub use block::{BlockIndexSummary, BlockIndexer, BlockRef};
pub use error::IndexerError;
pub use registry::AddressRegistry;
pub use trace::{InternalTransactionsData, TxTrace};
pub use transaction::{Tx, TxOptions};
