//! Storage Layer
//!
//! SQLite connection pooling and JSON configuration.

pub mod config;
pub mod database;

pub use config::*;
pub use database::*;
