//! Channel B: ttrpc metadata
//!
//! ttrpc metadata is a plain map from key to a list of values. ttrpc keeps
//! one metadata slot per context: a client sends whatever the slot holds
//! and a server installs what it received into the same slot for its
//! handler. Lookups on this channel therefore see locally attached pairs
//! as well as received ones.
//!
//! The map in a context is shared with every context derived from it, so
//! it is only ever read through `&`; writers copy it first.

use crate::channel::{IncomingReader, OutgoingWriter};
use crate::context::Context;
use sandboxmeta_common::keys;
use std::collections::HashMap;
use std::sync::Arc;

/// ttrpc metadata map
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TtrpcMetadata {
    map: HashMap<String, Vec<String>>,
}

impl TtrpcMetadata {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from the key/value list of a ttrpc request
    ///
    /// Repeated keys accumulate their values in order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut md = Self::new();
        for (key, value) in pairs {
            md.append(key.as_ref(), value);
        }
        md
    }

    /// Flatten into the key/value list of a ttrpc request
    ///
    /// Keys are emitted in sorted order so the output is stable.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut keys: Vec<&String> = self.map.keys().collect();
        keys.sort();
        keys.into_iter()
            .flat_map(|key| {
                self.map[key]
                    .iter()
                    .map(move |value| (key.clone(), value.clone()))
            })
            .collect()
    }

    /// Values for `key`; absent and empty lists both read as `None`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.map
            .get(&keys::normalize(key))
            .map(Vec::as_slice)
            .filter(|values| !values.is_empty())
    }

    /// First value for `key`
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Replace the values for `key`; an empty list removes the key
    pub fn set(&mut self, key: &str, values: Vec<String>) {
        let key = keys::normalize(key);
        if values.is_empty() {
            self.map.remove(&key);
        } else {
            self.map.insert(key, values);
        }
    }

    /// Add a value after any existing values for `key`
    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        self.map
            .entry(keys::normalize(key))
            .or_default()
            .push(value.into());
    }

    /// Number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if there are no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over keys and their values, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.map
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

/// ttrpc metadata attached to `ctx`, if any
#[must_use]
pub fn metadata(ctx: &Context) -> Option<&TtrpcMetadata> {
    ctx.value::<TtrpcMetadata>()
}

/// Derive a context whose ttrpc metadata is `md`
#[must_use]
pub fn with_metadata(ctx: &Context, md: TtrpcMetadata) -> Context {
    ctx.with_arc(Arc::new(md))
}

/// Channel B port
#[derive(Clone, Copy, Debug, Default)]
pub struct TtrpcChannel;

impl OutgoingWriter for TtrpcChannel {
    const NAME: &'static str = "ttrpc";

    fn write(ctx: &Context, key: &str, value: &str) -> Context {
        // Clone, never mutate: other contexts may hold the same map.
        let mut md = metadata(ctx).cloned().unwrap_or_default();
        md.set(key, vec![value.to_string()]);
        with_metadata(ctx, md)
    }
}

impl IncomingReader for TtrpcChannel {
    const NAME: &'static str = "ttrpc";

    fn read(ctx: &Context, key: &str) -> Option<String> {
        metadata(ctx)?.first(key).map(str::to_string)
    }
}
