//! SandboxMeta RPC - moving context metadata on and off real requests
//!
//! This crate provides:
//! - Client side: copying a context's outgoing gRPC metadata onto tonic
//!   requests ([`inject`], [`ContextInterceptor`])
//! - Server side: building a context from a received request ([`extract`],
//!   [`ServerContextInterceptor`], [`extract_ttrpc`])
//! - Conversion between context metadata and tonic metadata maps, where
//!   gRPC's key and value rules are enforced ([`to_metadata_map`])
//! - [`Relay`], which forwards configured keys from an incoming context to
//!   the next hop

pub mod client;
pub mod metadata;
pub mod relay;
pub mod server;
pub mod status;

pub use client::{ContextInterceptor, inject, request};
pub use metadata::{from_metadata_map, to_metadata_map};
pub use relay::Relay;
pub use server::{RequestContextExt, ServerContextInterceptor, extract, extract_ttrpc};
pub use status::status_from_error;
