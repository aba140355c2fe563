//! # Resolved Service Client
//!
//! A [`ServiceClient`] is the product of service resolution: one API
//! version's service descriptor bound to a transport, with the mandatory
//! call pipeline baked in. Every RPC runs the same three steps in order:
//!
//! 1. **Headers**: caller-supplied [`RequestInterceptor`] hooks first, then
//!    the identity headers (which always win on conflicting keys).
//! 2. **Logging**: one structured event pair per call, success or failure.
//! 3. **Failure translation**: failed statuses whose trailers carry encoded
//!    failure details surface as [`DomainFailure`]; everything else passes
//!    through as the raw transport status.
//!
//! The client is generic over the underlying service `S` so tests can drive
//! it against an in-process server without a socket.
use crate::pipeline::failure::{request_id_from_metadata, FailureTranslator};
use crate::pipeline::headers::HeaderInterceptor;
use crate::pipeline::logging::{log_failure, log_success, redact_metadata};
use crate::pipeline::{DomainFailure, RequestInterceptor};
use crate::transport::codec::DynamicCodec;
use crate::BoxError;

use super::message::ResolvedMessage;
use crate::config::MessageMode;
use futures_util::{Stream, StreamExt};
use http_body::Body as HttpBody;
use prost_reflect::{DynamicMessage, MethodDescriptor, ReflectMessage, ServiceDescriptor};
use std::str::FromStr;
use std::sync::Arc;
use tonic::{client::GrpcService, transport::Channel, Status};

#[derive(thiserror::Error, Debug)]
pub enum CallError {
    #[error("Internal error, the client was not ready: '{0}'")]
    NotReady(#[source] BoxError),
    #[error("Service '{service}' has no method named '{method}'")]
    MethodNotFound { service: String, method: String },
    #[error("Request message is a '{got}', the method expects a '{expected}'")]
    WrongRequestType { expected: String, got: String },
    #[error("Failed to decode message bytes: '{0}'")]
    Decode(#[from] prost::DecodeError),
    #[error(transparent)]
    Domain(#[from] DomainFailure),
    #[error("RPC failed with status '{0}'")]
    Transport(#[source] Status),
}

/// A ready-to-call client for one service of one API version.
pub struct ServiceClient<S = Channel> {
    grpc: tonic::client::Grpc<S>,
    service: ServiceDescriptor,
    version: String,
    endpoint: String,
    mode: MessageMode,
    headers: HeaderInterceptor,
    extra: Vec<Arc<dyn RequestInterceptor>>,
    translator: FailureTranslator,
}

impl<S> std::fmt::Debug for ServiceClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("version", &self.version)
            .field("endpoint", &self.endpoint)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl<S> ServiceClient<S>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        transport: S,
        max_receive_message_size: usize,
        service: ServiceDescriptor,
        version: String,
        endpoint: String,
        mode: MessageMode,
        headers: HeaderInterceptor,
        extra: Vec<Arc<dyn RequestInterceptor>>,
        translator: FailureTranslator,
    ) -> Self {
        let grpc =
            tonic::client::Grpc::new(transport).max_decoding_message_size(max_receive_message_size);
        Self {
            grpc,
            service,
            version,
            endpoint,
            mode,
            headers,
            extra,
            translator,
        }
    }

    /// Full name of the resolved service, e.g. `adsapi.v1.services.CampaignService`.
    pub fn full_name(&self) -> &str {
        self.service.full_name()
    }

    /// The API version this client is bound to.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Descriptor of one method, looked up by simple name.
    pub fn method(&self, name: &str) -> Result<MethodDescriptor, CallError> {
        self.service
            .methods()
            .find(|method| method.name() == name)
            .ok_or_else(|| CallError::MethodNotFound {
                service: self.service.full_name().to_string(),
                method: name.to_string(),
            })
    }

    /// A default-valued request message for `method`, in this client's
    /// configured representation.
    pub fn request_for(&self, method: &str) -> Result<ResolvedMessage, CallError> {
        let method = self.method(method)?;
        Ok(ResolvedMessage::empty(method.input(), self.mode))
    }

    /// Performs a unary call (single request, single response).
    pub async fn unary(
        &mut self,
        method: &str,
        request: impl Into<ResolvedMessage>,
    ) -> Result<ResolvedMessage, CallError> {
        let method = self.method(method)?;
        let request = self.prepare(&method, request.into())?;
        let logged_metadata = redact_metadata(request.metadata());

        self.grpc
            .ready()
            .await
            .map_err(|e| CallError::NotReady(e.into()))?;

        let codec = DynamicCodec::new(method.input(), method.output());
        match self.grpc.unary(request, http_path(&method), codec).await {
            Ok(response) => {
                log_success(
                    &self.version,
                    &self.endpoint,
                    method.full_name(),
                    &logged_metadata,
                );
                Ok(ResolvedMessage::from_dynamic(
                    response.into_inner(),
                    self.mode,
                ))
            }
            Err(status) => Err(self.fail(&method, status)),
        }
    }

    /// Performs a server-streaming call (single request, stream of
    /// responses). The call itself is logged once; stream items are not.
    pub async fn server_streaming<R: Into<ResolvedMessage>>(
        &mut self,
        method: &str,
        request: R,
    ) -> Result<impl Stream<Item = Result<ResolvedMessage, CallError>> + use<S, R>, CallError> {
        let method = self.method(method)?;
        let request = self.prepare(&method, request.into())?;
        let logged_metadata = redact_metadata(request.metadata());

        self.grpc
            .ready()
            .await
            .map_err(|e| CallError::NotReady(e.into()))?;

        let codec = DynamicCodec::new(method.input(), method.output());
        let response = match self
            .grpc
            .server_streaming(request, http_path(&method), codec)
            .await
        {
            Ok(response) => response,
            Err(status) => return Err(self.fail(&method, status)),
        };

        log_success(
            &self.version,
            &self.endpoint,
            method.full_name(),
            &logged_metadata,
        );

        let mode = self.mode;
        let translator = self.translator.clone();
        Ok(response.into_inner().map(move |item| match item {
            Ok(message) => Ok(ResolvedMessage::from_dynamic(message, mode)),
            Err(status) => Err(match translator.translate(status) {
                Ok(failure) => CallError::Domain(failure),
                Err(raw) => CallError::Transport(raw),
            }),
        }))
    }

    /// Runs the metadata pipeline and type check for one outbound request.
    fn prepare(
        &self,
        method: &MethodDescriptor,
        request: ResolvedMessage,
    ) -> Result<tonic::Request<DynamicMessage>, CallError> {
        let message = request.into_dynamic()?;
        if message.descriptor() != method.input() {
            return Err(CallError::WrongRequestType {
                expected: method.input().full_name().to_string(),
                got: message.descriptor().full_name().to_string(),
            });
        }

        let mut request = tonic::Request::new(message);
        for interceptor in &self.extra {
            interceptor
                .call(request.metadata_mut())
                .map_err(CallError::Transport)?;
        }
        // Identity headers go last so caller hooks cannot override them.
        self.headers.apply(request.metadata_mut());
        Ok(request)
    }

    fn fail(&self, method: &MethodDescriptor, status: Status) -> CallError {
        let request_id = request_id_from_metadata(status.metadata());
        match self.translator.translate(status) {
            Ok(failure) => {
                log_failure(
                    &self.version,
                    &self.endpoint,
                    method.full_name(),
                    failure.request_id.as_deref(),
                    &failure.to_string(),
                );
                CallError::Domain(failure)
            }
            Err(raw) => {
                log_failure(
                    &self.version,
                    &self.endpoint,
                    method.full_name(),
                    request_id.as_deref(),
                    raw.message(),
                );
                CallError::Transport(raw)
            }
        }
    }
}

fn http_path(method: &MethodDescriptor) -> http::uri::PathAndQuery {
    let path = format!("/{}/{}", method.parent_service().full_name(), method.name());
    http::uri::PathAndQuery::from_str(&path).expect("valid gRPC path")
}
