//! Well-known metadata keys

/// Key carrying the filesystem path of a sandbox's network namespace
///
/// The value is an opaque path string; whoever consumes it is responsible
/// for validating it.
pub const NETNS_PATH_KEY: &str = "io.containerd.sandbox.netns_path";

/// Normalize a metadata key the way both transports compare keys
///
/// gRPC and ttrpc metadata keys are case-insensitive and stored lowercase.
#[must_use]
pub fn normalize(key: &str) -> String {
    key.to_ascii_lowercase()
}
