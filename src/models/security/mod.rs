//! Security models
//!
//! Secret handling for configuration values that must not leak into logs
//! or linger in memory.
//!
//! - `error`: Error types for security operations
//! - `secret`: Secret management and zeroization

mod error;
mod secret;

pub use error::{SecurityError, SecurityResult};
pub use secret::{SecretString, SecretValue};
