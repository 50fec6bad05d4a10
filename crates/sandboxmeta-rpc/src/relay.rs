//! Forwarding selected keys from one hop to the next
//!
//! A service that receives, say, the sandbox network namespace path and
//! then calls another service has to re-attach the value on its outgoing
//! context. The relay does this for a configured set of keys without
//! caring which transport delivered the value or which will carry it on.

use sandboxmeta_common::{RelayConfig, keys};
use sandboxmeta_context::Context;
use tracing::debug;

/// Re-attaches configured keys from an incoming context
#[derive(Clone, Debug)]
pub struct Relay {
    keys: Vec<String>,
}

impl Relay {
    /// Create a relay for the keys in `config`
    #[must_use]
    pub fn new(config: &RelayConfig) -> Self {
        let keys = config
            .forward_keys
            .iter()
            .map(|key| keys::normalize(key))
            .collect();
        Self { keys }
    }

    /// Normalized keys this relay forwards
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Derive the context for downstream calls from `incoming`
    ///
    /// Every configured key found on `incoming` is attached again so it
    /// goes out on all transports. Missing keys are skipped. Whether a
    /// value can actually be sent is decided when the request is built.
    #[must_use]
    pub fn forward(&self, incoming: &Context) -> Context {
        let mut ctx = incoming.clone();
        for key in &self.keys {
            match incoming.lookup(key) {
                Some(value) => ctx = ctx.attach(key, &value),
                None => debug!(key = key.as_str(), "relay key not present on incoming context"),
            }
        }
        ctx
    }
}
