//! # Connector Layer
//!
//! External integrations implementing application ports:
//! - Completion backends (Azure OpenAI over HTTPS, offline mock)
//! - Configuration sources (JSON files, environment variables)
//! - The interactive terminal loop and its wiring

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
