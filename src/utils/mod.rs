//! Shared utilities.
//!
//! - http: retryable HTTP client construction
//! - logging: tracing setup and the structured error context
//! - macros: config deserialization helpers
//! - parsing: human-readable size strings
//! - tests: builders shared between unit and integration tests

pub mod http;
pub mod logging;
pub mod macros;
pub mod parsing;

pub use http::*;
pub use parsing::*;
