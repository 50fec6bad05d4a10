//! SandboxMeta Context - request metadata across two transports
//!
//! This crate provides:
//! - An immutable, cheaply cloned request [`Context`]
//! - gRPC (first-value-wins multi-map) and ttrpc (key to values map)
//!   metadata carried on that context
//! - [`attach`], which puts a pair on both transports' outgoing metadata
//! - [`lookup`], which reads incoming gRPC metadata with ttrpc as fallback
//!
//! # Example
//!
//! ```rust
//! use sandboxmeta_context::{Context, attach, lookup};
//!
//! let ctx = Context::background();
//! let ctx = attach(&ctx, "io.containerd.sandbox.netns_path", "/var/run/netns/cni-1");
//! assert_eq!(
//!     lookup(&ctx, "io.containerd.sandbox.netns_path").as_deref(),
//!     Some("/var/run/netns/cni-1")
//! );
//! ```

pub mod channel;
pub mod context;
pub mod grpc;
pub mod propagate;
pub mod ttrpc;

pub use channel::{IncomingReader, OutgoingWriter};
pub use context::Context;
pub use grpc::{GrpcChannel, GrpcMetadata, IncomingGrpc, OutgoingGrpc};
pub use propagate::{attach, lookup, lookup_pair, netns_path, with_netns_path};
pub use ttrpc::{TtrpcChannel, TtrpcMetadata};
