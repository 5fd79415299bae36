//! Business Logic Services
//!
//! Service layer behind the command handlers.

pub mod interview;
