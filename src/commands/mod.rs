//! Commands
//!
//! Command handlers forming the API surface of the application.
//! Each handler validates its input and returns a `CommandResponse`.

pub mod health;
pub mod interview;
pub mod settings;

pub use health::*;
pub use interview::*;
pub use settings::*;
