//! Per-transport capability ports
//!
//! There are exactly two transports, [`GrpcChannel`](crate::GrpcChannel)
//! and [`TtrpcChannel`](crate::TtrpcChannel). The writer and reader compose
//! them statically.

use crate::context::Context;

/// Attach a pair to a transport's outgoing metadata
pub trait OutgoingWriter {
    /// Transport name, for logging
    const NAME: &'static str;

    /// Derive a context whose outgoing metadata also carries `key = value`
    ///
    /// Must not modify any metadata reachable from `ctx`.
    fn write(ctx: &Context, key: &str, value: &str) -> Context;
}

/// Read a key from a transport's incoming metadata
pub trait IncomingReader {
    /// Transport name, for logging
    const NAME: &'static str;

    /// First value for `key`, if the transport carries it
    fn read(ctx: &Context, key: &str) -> Option<String>;
}
