//! Writing to and reading from both transports at once
//!
//! [`attach`] puts a pair on the outgoing metadata of every transport, so
//! the caller does not need to know which one will carry the request.
//! [`lookup`] checks incoming gRPC metadata first and falls back to ttrpc
//! metadata; the first transport holding the key wins outright.

use crate::channel::{IncomingReader, OutgoingWriter};
use crate::context::Context;
use crate::grpc::GrpcChannel;
use crate::ttrpc::TtrpcChannel;
use sandboxmeta_common::NETNS_PATH_KEY;
use tracing::trace;

impl Context {
    /// Derive a context carrying `key = value` on every transport
    ///
    /// The receiver is left untouched. Neither key nor value is validated;
    /// a pair gRPC cannot encode is rejected when the request is built.
    #[must_use]
    pub fn attach(&self, key: &str, value: &str) -> Self {
        let ctx = GrpcChannel::write(self, key, value);
        let ctx = TtrpcChannel::write(&ctx, key, value);
        trace!(
            key,
            channels = ?[
                <GrpcChannel as OutgoingWriter>::NAME,
                <TtrpcChannel as OutgoingWriter>::NAME,
            ],
            "attached metadata"
        );
        ctx
    }

    /// Value received for `key`, from gRPC if present, otherwise ttrpc
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<String> {
        GrpcChannel::read(self, key).or_else(|| TtrpcChannel::read(self, key))
    }
}

/// Derive a context carrying `key = value` on every transport
#[must_use]
pub fn attach(ctx: &Context, key: &str, value: &str) -> Context {
    ctx.attach(key, value)
}

/// Value received for `key`, if any transport carries it
#[must_use]
pub fn lookup(ctx: &Context, key: &str) -> Option<String> {
    ctx.lookup(key)
}

/// `(value, found)` form of [`lookup`]; a missing key yields `("", false)`
#[must_use]
pub fn lookup_pair(ctx: &Context, key: &str) -> (String, bool) {
    lookup(ctx, key).map_or_else(|| (String::new(), false), |value| (value, true))
}

/// Derive a context carrying the sandbox network namespace path
#[must_use]
pub fn with_netns_path(ctx: &Context, path: &str) -> Context {
    ctx.attach(NETNS_PATH_KEY, path)
}

/// Sandbox network namespace path carried by `ctx`
#[must_use]
pub fn netns_path(ctx: &Context) -> Option<String> {
    ctx.lookup(NETNS_PATH_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grpc::{self, GrpcMetadata};
    use crate::ttrpc::{self, TtrpcMetadata};

    #[test]
    fn test_attach_then_lookup() {
        let ctx = Context::background();
        let key = "test-key";

        assert_eq!(lookup_pair(&ctx, key), (String::new(), false));

        let nctx = attach(&ctx, key, "test-value");
        assert_eq!(lookup_pair(&nctx, key), ("test-value".to_string(), true));

        // the original context is unchanged
        assert_eq!(lookup_pair(&ctx, key), (String::new(), false));
    }

    #[test]
    fn test_attach_writes_both_channels() {
        let ctx = attach(&Context::background(), "k", "v");
        assert_eq!(grpc::outgoing(&ctx).unwrap().get("k"), Some("v"));
        assert_eq!(ttrpc::metadata(&ctx).unwrap().first("k"), Some("v"));
    }

    #[test]
    fn test_latest_attach_wins() {
        let ctx = attach(&Context::background(), "k", "v1");
        let ctx = attach(&ctx, "k", "v2");

        assert_eq!(lookup(&ctx, "k").as_deref(), Some("v2"));
        assert_eq!(grpc::outgoing(&ctx).unwrap().get("k"), Some("v2"));
        assert_eq!(
            grpc::outgoing(&ctx).unwrap().get_all("k"),
            vec!["v2".to_string(), "v1".to_string()]
        );
        assert_eq!(ttrpc::metadata(&ctx).unwrap().get("k"), Some(&["v2".to_string()][..]));
    }

    #[test]
    fn test_independent_keys() {
        let ctx = attach(&Context::background(), "a", "1");
        let ctx = attach(&ctx, "b", "2");
        assert_eq!(lookup(&ctx, "a").as_deref(), Some("1"));
        assert_eq!(lookup(&ctx, "b").as_deref(), Some("2"));

        let ctx = attach(&ctx, "a", "3");
        assert_eq!(lookup(&ctx, "a").as_deref(), Some("3"));
        assert_eq!(lookup(&ctx, "b").as_deref(), Some("2"));
    }

    #[test]
    fn test_derivation_does_not_affect_parent() {
        let base = attach(&Context::background(), "k", "v");
        let derived = attach(&base, "k", "other");
        let derived = attach(&derived, "extra", "x");

        assert_eq!(lookup(&base, "k").as_deref(), Some("v"));
        assert_eq!(lookup(&base, "extra"), None);
        assert_eq!(lookup(&derived, "k").as_deref(), Some("other"));
    }

    #[test]
    fn test_empty_value_is_found() {
        let ctx = attach(&Context::background(), "k", "");
        assert_eq!(lookup_pair(&ctx, "k"), (String::new(), true));
    }

    #[test]
    fn test_attach_accepts_any_pair() {
        let ctx = attach(&Context::background(), "My Key", "/var/run/netns/caf\u{e9}");
        assert_eq!(
            lookup(&ctx, "my key").as_deref(),
            Some("/var/run/netns/caf\u{e9}")
        );
        assert_eq!(
            grpc::outgoing(&ctx).unwrap().get("My Key"),
            Some("/var/run/netns/caf\u{e9}")
        );
    }

    #[test]
    fn test_grpc_incoming_wins_over_ttrpc() {
        let ctx = ttrpc::with_metadata(
            &Context::background(),
            TtrpcMetadata::from_pairs([("k", "from-ttrpc"), ("only-ttrpc", "t")]),
        );
        let ctx = grpc::with_incoming(&ctx, GrpcMetadata::pairs("k", "from-grpc"));

        assert_eq!(lookup(&ctx, "k").as_deref(), Some("from-grpc"));
        assert_eq!(lookup(&ctx, "only-ttrpc").as_deref(), Some("t"));
    }

    #[test]
    fn test_grpc_incoming_empty_value_still_wins() {
        let ctx = ttrpc::with_metadata(
            &Context::background(),
            TtrpcMetadata::from_pairs([("k", "from-ttrpc")]),
        );
        let ctx = grpc::with_incoming(&ctx, GrpcMetadata::pairs("k", ""));
        assert_eq!(lookup_pair(&ctx, "k"), (String::new(), true));
    }

    #[test]
    fn test_grpc_incoming_non_ascii_value_wins() {
        let ctx = ttrpc::with_metadata(
            &Context::background(),
            TtrpcMetadata::from_pairs([("k", "from-ttrpc")]),
        );
        let ctx = grpc::with_incoming(&ctx, GrpcMetadata::pairs("k", "caf\u{e9}"));
        assert_eq!(lookup_pair(&ctx, "k"), ("caf\u{e9}".to_string(), true));
    }

    #[test]
    fn test_outgoing_grpc_is_not_read() {
        let ctx = grpc::with_outgoing(&Context::background(), GrpcMetadata::pairs("k", "v"));
        assert_eq!(lookup(&ctx, "k"), None);
    }

    #[test]
    fn test_netns_path() {
        let ctx = Context::background();
        assert_eq!(netns_path(&ctx), None);

        let ctx = with_netns_path(&ctx, "/var/run/netns/cni-42");
        assert_eq!(netns_path(&ctx).as_deref(), Some("/var/run/netns/cni-42"));
        assert_eq!(
            lookup(&ctx, NETNS_PATH_KEY).as_deref(),
            Some("/var/run/netns/cni-42")
        );
    }

    #[test]
    fn test_concurrent_derivations() {
        let base = attach(&Context::background(), "shared", "base");

        std::thread::scope(|scope| {
            for i in 0..8 {
                let base = &base;
                scope.spawn(move || {
                    let mut ctx = base.clone();
                    for j in 0..50 {
                        ctx = attach(&ctx, "worker", &format!("{i}-{j}"));
                    }
                    assert_eq!(lookup(&ctx, "worker"), Some(format!("{i}-49")));
                    assert_eq!(lookup(&ctx, "shared").as_deref(), Some("base"));
                });
            }
        });

        assert_eq!(lookup(&base, "worker"), None);
        assert_eq!(ttrpc::metadata(&base).unwrap().len(), 1);
    }
}
