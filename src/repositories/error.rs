//! Error types for repository operations.
//!
//! Configuration loading and document storage share one error type, with
//! each variant carrying an [`ErrorContext`] for structured logging and
//! trace-id propagation.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents errors that can occur during repository operations
#[derive(ThisError, Debug)]
pub enum RepositoryError {
	/// Configuration or document files failed to load or parse
	#[error("Load error: {0}")]
	LoadError(ErrorContext),

	/// Storage backend failures (I/O, serialization)
	#[error("Internal error: {0}")]
	InternalError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

type ErrorSource = Option<Box<dyn std::error::Error + Send + Sync + 'static>>;

impl RepositoryError {
	pub fn load_error(
		msg: impl Into<String>,
		source: ErrorSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::LoadError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn internal_error(
		msg: impl Into<String>,
		source: ErrorSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InternalError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for RepositoryError {
	fn trace_id(&self) -> String {
		match self {
			Self::LoadError(ctx) | Self::InternalError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
