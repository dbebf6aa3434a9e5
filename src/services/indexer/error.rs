//! Indexer error types.
//!
//! The taxonomy the pipeline exposes to callers: validation failures caught
//! before I/O, missing upstream objects, broken document invariants, and
//! internal breakage. All variants are fatal for the operation that raised
//! them; decode fallbacks are handled inline with warnings instead.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that can occur during indexing operations
#[derive(ThisError, Debug)]
pub enum IndexerError {
	/// Malformed hash, address, or object shape, detected before I/O
	#[error("Validation error: {0}")]
	ValidationError(ErrorContext),

	/// Required upstream object missing or surface unreachable
	#[error("Not found: {0}")]
	NotFoundError(ErrorContext),

	/// Document invariant broken (events/logs length mismatch)
	#[error("Integrity error: {0}")]
	IntegrityError(ErrorContext),

	/// Invariant breakage inside the crate
	#[error("Internal error: {0}")]
	InternalError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl IndexerError {
	// Validation error
	pub fn validation_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ValidationError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Not found error
	pub fn not_found_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotFoundError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Integrity error
	pub fn integrity_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::IntegrityError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Internal error
	pub fn internal_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InternalError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for IndexerError {
	fn trace_id(&self) -> String {
		match self {
			Self::ValidationError(ctx) => ctx.trace_id.clone(),
			Self::NotFoundError(ctx) => ctx.trace_id.clone(),
			Self::IntegrityError(ctx) => ctx.trace_id.clone(),
			Self::InternalError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}

impl From<crate::repositories::RepositoryError> for IndexerError {
	fn from(err: crate::repositories::RepositoryError) -> Self {
		Self::not_found_error(err.to_string(), Some(Box::new(err)), None)
	}
}

impl From<crate::services::decoder::DecoderError> for IndexerError {
	fn from(err: crate::services::decoder::DecoderError) -> Self {
		Self::internal_error(err.to_string(), Some(Box::new(err)), None)
	}
}
