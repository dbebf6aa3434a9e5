//! Security error types.
//!
//! Errors raised while resolving secret values. Boxed in [`SecurityResult`]
//! to keep the result type small on the hot configuration path.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Result type alias for security operations
pub type SecurityResult<T> = Result<T, Box<SecurityError>>;

/// Represents errors that can occur during secret resolution
#[derive(ThisError, Debug)]
pub enum SecurityError {
	/// A secret source could not be read or parsed
	#[error("Parse error: {0}")]
	ParseError(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

type ErrorSource = Option<Box<dyn std::error::Error + Send + Sync + 'static>>;

impl SecurityError {
	pub fn parse_error(
		msg: impl Into<String>,
		source: ErrorSource,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ParseError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for SecurityError {
	fn trace_id(&self) -> String {
		match self {
			Self::ParseError(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}

impl From<std::io::Error> for SecurityError {
	fn from(err: std::io::Error) -> Self {
		Self::parse_error(err.to_string(), None, None)
	}
}

impl From<serde_json::Error> for SecurityError {
	fn from(err: serde_json::Error) -> Self {
		Self::parse_error(err.to_string(), None, None)
	}
}
