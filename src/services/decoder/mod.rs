//! Contract ABI resolution and event log decoding.
//!
//! This module turns raw receipt logs into decoded events:
//! - `Contract`: decoder handle bound to one address and ABI
//! - `ContractResolver`: resolves an address at a height to a handle
//! - helpers for address/hash validation and token value formatting

mod contract;
mod error;
pub mod helpers;
mod resolver;

pub use contract::Contract;
pub use error::DecoderError;
pub use resolver::{AbiContractResolver, ContractResolver};
