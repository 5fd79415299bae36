//! Data Models
//!
//! Core data structures for the application.

pub mod interview;
pub mod response;
pub mod settings;

pub use interview::*;
pub use response::*;
pub use settings::*;
