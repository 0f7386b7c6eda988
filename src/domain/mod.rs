//! # Domain Layer
//!
//! Conversation model, configuration values and the error taxonomy.
//! This layer is independent of HTTP, files and the terminal.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
