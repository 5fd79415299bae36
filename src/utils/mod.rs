//! Utility Modules
//!
//! Error types and filesystem path helpers.

pub mod error;
pub mod paths;
