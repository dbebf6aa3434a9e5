use crate::models::{
	EVMTraceAction, EVMTraceActionType, EVMTraceEntry, EVMTraceResult,
};
use alloy::primitives::{Address, Bytes, B256, U256};

/// A builder for creating test EVM trace entries.
///
/// The entry points mirror the action shapes: `call` carries from/to,
/// `create` carries from/init plus the created address in the result,
/// `suicide` carries address/refundAddress/balance.
#[derive(Debug, Default)]
pub struct TraceBuilder {
	action: EVMTraceAction,
	action_type: EVMTraceActionType,
	result: Option<EVMTraceResult>,
	error: Option<String>,
	subtraces: u64,
	trace_address: Vec<u64>,
	transaction_hash: Option<B256>,
	block_number: Option<u64>,
	block_hash: Option<B256>,
}

impl TraceBuilder {
	/// Starts a call entry.
	pub fn call(from: Address, to: Address) -> Self {
		Self {
			action: EVMTraceAction {
				call_type: Some("call".to_string()),
				from: Some(from),
				to: Some(to),
				value: Some(U256::ZERO),
				input: Some(Bytes::default()),
				..Default::default()
			},
			action_type: EVMTraceActionType::Call,
			result: Some(EVMTraceResult {
				gas_used: Some(U256::ZERO),
				..Default::default()
			}),
			..Default::default()
		}
	}

	/// Starts a create entry resulting in `created`.
	pub fn create(from: Address, created: Address) -> Self {
		Self {
			action: EVMTraceAction {
				from: Some(from),
				init: Some(Bytes::from(vec![0x60, 0x80])),
				value: Some(U256::ZERO),
				..Default::default()
			},
			action_type: EVMTraceActionType::Create,
			result: Some(EVMTraceResult {
				address: Some(created),
				code: Some(Bytes::from(vec![0x60, 0x80])),
				..Default::default()
			}),
			..Default::default()
		}
	}

	/// Starts a suicide entry destroying `address`.
	pub fn suicide(address: Address, refund: Address) -> Self {
		Self {
			action: EVMTraceAction {
				address: Some(address),
				refund_address: Some(refund),
				balance: Some(U256::ZERO),
				..Default::default()
			},
			action_type: EVMTraceActionType::Suicide,
			..Default::default()
		}
	}

	/// Sets the position in the call tree.
	pub fn trace_address(mut self, trace_address: Vec<u64>) -> Self {
		self.trace_address = trace_address;
		self
	}

	/// Sets the containing transaction hash.
	pub fn transaction_hash(mut self, hash: B256) -> Self {
		self.transaction_hash = Some(hash);
		self
	}

	/// Sets the block context.
	pub fn block(mut self, number: u64, hash: B256) -> Self {
		self.block_number = Some(number);
		self.block_hash = Some(hash);
		self
	}

	/// Marks the entry as failed.
	pub fn error(mut self, error: &str) -> Self {
		self.error = Some(error.to_string());
		self.result = None;
		self
	}

	/// Sets the number of sub-entries.
	pub fn subtraces(mut self, subtraces: u64) -> Self {
		self.subtraces = subtraces;
		self
	}

	/// Builds the trace entry.
	pub fn build(self) -> EVMTraceEntry {
		EVMTraceEntry {
			action: self.action,
			action_type: self.action_type,
			result: self.result,
			error: self.error,
			subtraces: self.subtraces,
			trace_address: self.trace_address,
			transaction_hash: self.transaction_hash,
			transaction_position: None,
			block_number: self.block_number,
			block_hash: self.block_hash,
		}
	}
}
