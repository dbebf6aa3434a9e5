//! Ethereum Virtual Machine (EVM) blockchain specific implementations.
//!
//! This module contains data structures specific to EVM-based blockchains:
//! blocks, transactions, receipts, execution traces, and contract ABIs.

mod block;
mod contract;
mod receipt;
mod trace;
mod transaction;

pub use block::{BaseBlock as EVMBaseBlock, Block as EVMBlock};
pub use contract::{
	ContractSpec as EVMContractSpec, DecodedEvent as EVMDecodedEvent,
	DecodedParamEntry as EVMDecodedParamEntry,
};
pub use receipt::{
	BaseLog as EVMReceiptLog, BaseReceipt as EVMBaseReceipt,
	TransactionReceipt as EVMTransactionReceipt,
};
pub use trace::{
	TraceAction as EVMTraceAction, TraceActionType as EVMTraceActionType,
	TraceEntry as EVMTraceEntry, TraceResult as EVMTraceResult,
};
pub use transaction::{BaseTransaction as EVMBaseTransaction, Transaction as EVMTransaction};
