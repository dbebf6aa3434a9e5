//! Decoder error types.
//!
//! Covers ABI resolution and event log decoding failures.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that can occur during contract resolution and log decoding
#[derive(ThisError, Debug)]
pub enum DecoderError {
	/// Errors related to malformed or unusable ABIs
	#[error("ABI error: {0}")]
	AbiError(ErrorContext),

	/// Errors related to resolving an address to a contract
	#[error("Resolve error: {0}")]
	ResolveError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl DecoderError {
	// Abi error
	pub fn abi_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::AbiError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Resolve error
	pub fn resolve_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResolveError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for DecoderError {
	fn trace_id(&self) -> String {
		match self {
			Self::AbiError(ctx) => ctx.trace_id.clone(),
			Self::ResolveError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
