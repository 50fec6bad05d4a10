//! SandboxMeta Common - Shared types and utilities
//!
//! This crate provides the error definitions, configuration and
//! well-known metadata keys used across all SandboxMeta components.

pub mod config;
pub mod error;
pub mod keys;

pub use config::{Config, RelayConfig};
pub use error::{Error, Result};
pub use keys::NETNS_PATH_KEY;
