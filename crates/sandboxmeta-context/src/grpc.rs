//! Channel A: gRPC metadata
//!
//! gRPC metadata is an ordered sequence of keys, each with an ordered list
//! of values, read "first value wins". Outgoing metadata (attached by a
//! client, to be sent) and incoming metadata (received by a server) live in
//! separate context slots.
//!
//! Values are kept as strings. Whether a pair can actually be put on the
//! wire is checked where the request is built, not here.

use crate::channel::{IncomingReader, OutgoingWriter};
use crate::context::Context;
use sandboxmeta_common::keys;

/// Ordered gRPC metadata
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrpcMetadata {
    entries: Vec<(String, Vec<String>)>,
}

impl GrpcMetadata {
    /// Create empty metadata
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-pair metadata `{key: [value]}`
    #[must_use]
    pub fn pairs(key: &str, value: &str) -> Self {
        Self {
            entries: vec![(keys::normalize(key), vec![value.to_string()])],
        }
    }

    /// Concatenate two metadata sets
    ///
    /// For every key, the values of `first` come before the values of
    /// `rest`. Readers take the first value of a key, so whatever `first`
    /// holds for a key shadows `rest`. Key order follows `first`, then keys
    /// only `rest` has.
    #[must_use]
    pub fn join(first: &Self, rest: &Self) -> Self {
        let mut md = first.clone();
        for (key, values) in &rest.entries {
            for value in values {
                md.append(key, value.clone());
            }
        }
        md
    }

    /// Add a value after any existing values for `key`
    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        let key = keys::normalize(key);
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.into()),
            None => self.entries.push((key, vec![value.into()])),
        }
    }

    /// First value for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values for `key`, in order
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.values(key).map(<[String]>::to_vec).unwrap_or_default()
    }

    /// Number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys and their values, in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    fn values(&self, key: &str) -> Option<&[String]> {
        let key = keys::normalize(key);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, values)| values.as_slice())
    }
}

impl<K, V> FromIterator<(K, V)> for GrpcMetadata
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut md = Self::new();
        for (key, value) in pairs {
            md.append(key.as_ref(), value);
        }
        md
    }
}

/// Context slot for metadata to be sent by a gRPC client
#[derive(Debug)]
pub struct OutgoingGrpc(pub GrpcMetadata);

/// Context slot for metadata received by a gRPC server
#[derive(Debug)]
pub struct IncomingGrpc(pub GrpcMetadata);

/// Outgoing gRPC metadata attached to `ctx`, if any
#[must_use]
pub fn outgoing(ctx: &Context) -> Option<&GrpcMetadata> {
    ctx.value::<OutgoingGrpc>().map(|slot| &slot.0)
}

/// Derive a context whose outgoing gRPC metadata is `md`
#[must_use]
pub fn with_outgoing(ctx: &Context, md: GrpcMetadata) -> Context {
    ctx.with_value(OutgoingGrpc(md))
}

/// Incoming gRPC metadata attached to `ctx`, if any
#[must_use]
pub fn incoming(ctx: &Context) -> Option<&GrpcMetadata> {
    ctx.value::<IncomingGrpc>().map(|slot| &slot.0)
}

/// Derive a context whose incoming gRPC metadata is `md`
#[must_use]
pub fn with_incoming(ctx: &Context, md: GrpcMetadata) -> Context {
    ctx.with_value(IncomingGrpc(md))
}

/// Channel A port
#[derive(Clone, Copy, Debug, Default)]
pub struct GrpcChannel;

impl OutgoingWriter for GrpcChannel {
    const NAME: &'static str = "grpc";

    fn write(ctx: &Context, key: &str, value: &str) -> Context {
        let pair = GrpcMetadata::pairs(key, value);
        let md = match outgoing(ctx) {
            // the new pair goes first so it wins on lookup
            Some(existing) => GrpcMetadata::join(&pair, existing),
            None => pair,
        };
        with_outgoing(ctx, md)
    }
}

impl IncomingReader for GrpcChannel {
    const NAME: &'static str = "grpc";

    fn read(ctx: &Context, key: &str) -> Option<String> {
        incoming(ctx)?.get(key).map(str::to_string)
    }
}
