//! Server side: building a context from what a request carried

use crate::metadata::from_metadata_map;
use sandboxmeta_context::{Context, TtrpcMetadata, grpc, ttrpc};
use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracing::debug;

/// Build the server-side context for a received gRPC request
///
/// The request's metadata, decoded from its raw bytes, becomes the context's incoming gRPC metadata. If
/// a [`Context`] is already stored in the request's extensions, the new
/// context is derived from it.
pub fn extract<T>(request: &Request<T>) -> Context {
    let base = request
        .extensions()
        .get::<Context>()
        .cloned()
        .unwrap_or_default();
    let md = from_metadata_map(request.metadata());
    debug!(keys = md.len(), "extracted incoming grpc metadata");
    grpc::with_incoming(&base, md)
}

/// Derive a context carrying the key/value list received on a ttrpc request
pub fn extract_ttrpc<K, V>(ctx: &Context, pairs: impl IntoIterator<Item = (K, V)>) -> Context
where
    K: AsRef<str>,
    V: Into<String>,
{
    let md = TtrpcMetadata::from_pairs(pairs);
    debug!(keys = md.len(), "extracted incoming ttrpc metadata");
    ttrpc::with_metadata(ctx, md)
}

/// Server interceptor storing the extracted [`Context`] in the request
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerContextInterceptor;

impl Interceptor for ServerContextInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let ctx = extract(&request);
        request.extensions_mut().insert(ctx);
        Ok(request)
    }
}

/// Extension trait for getting the context of a received request
pub trait RequestContextExt {
    /// Context stored by [`ServerContextInterceptor`], or one extracted on
    /// the spot
    fn context(&self) -> Context;
}

impl<T> RequestContextExt for Request<T> {
    fn context(&self) -> Context {
        match self.extensions().get::<Context>() {
            Some(ctx) if grpc::incoming(ctx).is_some() => ctx.clone(),
            _ => extract(self),
        }
    }
}
