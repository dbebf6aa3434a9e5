//! Macros for common functionality.

pub mod deserialization;
