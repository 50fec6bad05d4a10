//! Client side: context metadata onto outgoing tonic requests

use crate::metadata::to_metadata_map;
use crate::status::status_from_error;
use sandboxmeta_common::Result;
use sandboxmeta_context::{Context, grpc};
use tonic::metadata::{KeyAndValueRef, KeyRef};
use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracing::debug;

/// Copy the outgoing gRPC metadata of `ctx` onto `request`
///
/// Keys carried by the context replace whatever the request already held
/// for them, keeping the context's value order. Other request metadata is
/// left alone. If any pair cannot be sent as gRPC metadata the request is
/// not modified and the error is returned.
pub fn inject<T>(ctx: &Context, request: &mut Request<T>) -> Result<()> {
    let Some(md) = grpc::outgoing(ctx) else {
        return Ok(());
    };
    let encoded = to_metadata_map(md)?;

    let target = request.metadata_mut();
    for key in encoded.keys() {
        match key {
            KeyRef::Ascii(key) => {
                target.remove(key.as_str());
            }
            KeyRef::Binary(key) => {
                target.remove_bin(key.as_str());
            }
        }
    }
    for entry in encoded.iter() {
        match entry {
            KeyAndValueRef::Ascii(key, value) => {
                target.append(key.clone(), value.clone());
            }
            KeyAndValueRef::Binary(key, value) => {
                target.append_bin(key.clone(), value.clone());
            }
        }
    }

    debug!(keys = md.len(), "injected context metadata into request");
    Ok(())
}

/// Build a request for `message` carrying the metadata of `ctx`
pub fn request<T>(ctx: &Context, message: T) -> Result<Request<T>> {
    let mut request = Request::new(message);
    inject(ctx, &mut request)?;
    Ok(request)
}

/// Client interceptor attaching context metadata to every call
///
/// A [`Context`] stored in the request's extensions takes precedence over
/// the one the interceptor was built with, so a single channel can serve
/// many logical requests.
#[derive(Clone, Debug, Default)]
pub struct ContextInterceptor {
    ctx: Context,
}

impl ContextInterceptor {
    /// Create an interceptor for `ctx`
    #[must_use]
    pub const fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl Interceptor for ContextInterceptor {
    fn call(&mut self, mut request: Request<()>) -> std::result::Result<Request<()>, Status> {
        let ctx = request
            .extensions()
            .get::<Context>()
            .cloned()
            .unwrap_or_else(|| self.ctx.clone());
        inject(&ctx, &mut request).map_err(|e| status_from_error(&e))?;
        Ok(request)
    }
}
