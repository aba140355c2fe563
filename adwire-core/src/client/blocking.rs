//! # Blocking Facade
//!
//! Synchronous wrapper over a resolved [`ServiceClient`]. There is exactly
//! one call implementation in this crate, the async one; this facade blocks
//! on a caller-provided [`tokio::runtime::Handle`] and never starts or owns
//! a runtime itself. Streaming calls are drained into a `Vec` because a
//! blocking caller has nothing to suspend on.
//!
//! NOTE: calling these methods from inside an async context panics in
//! `Handle::block_on`; the facade is for threads that are not already
//! running on the runtime.
use super::message::ResolvedMessage;
use super::service::{CallError, ServiceClient};
use crate::BoxError;
use futures_util::StreamExt;
use http_body::Body as HttpBody;
use tokio::runtime::Handle;
use tonic::client::GrpcService;
use tonic::transport::Channel;

/// A synchronous view over a [`ServiceClient`].
pub struct BlockingServiceClient<S = Channel> {
    inner: ServiceClient<S>,
    handle: Handle,
}

impl<S> BlockingServiceClient<S>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    /// Wraps `inner`, blocking on `handle` for every call.
    pub fn new(inner: ServiceClient<S>, handle: Handle) -> Self {
        Self { inner, handle }
    }

    /// The wrapped async client.
    pub fn into_inner(self) -> ServiceClient<S> {
        self.inner
    }

    pub fn request_for(&self, method: &str) -> Result<ResolvedMessage, CallError> {
        self.inner.request_for(method)
    }

    /// Performs a unary call, blocking until the response arrives.
    pub fn unary(
        &mut self,
        method: &str,
        request: impl Into<ResolvedMessage>,
    ) -> Result<ResolvedMessage, CallError> {
        self.handle
            .clone()
            .block_on(self.inner.unary(method, request))
    }

    /// Performs a server-streaming call and drains the whole stream. The
    /// first failed item ends the drain and is returned as the error.
    pub fn server_streaming(
        &mut self,
        method: &str,
        request: impl Into<ResolvedMessage>,
    ) -> Result<Vec<ResolvedMessage>, CallError> {
        self.handle.clone().block_on(async {
            let mut stream = std::pin::pin!(self.inner.server_streaming(method, request).await?);
            let mut items = Vec::new();
            while let Some(item) = stream.next().await {
                items.push(item?);
            }
            Ok(items)
        })
    }
}
