//! # Transport
//!
//! Low-level building blocks shared by every resolved service client: channel
//! construction bound to an endpoint plus the fixed tuning ceilings, and a
//! codec that moves `prost_reflect::DynamicMessage` values over the wire
//! without compile-time knowledge of the message types.
pub mod codec;

use crate::pipeline::ChannelOptions;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

/// Errors that can occur while constructing a channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelBuildError {
    #[error("Invalid endpoint '{0}': {1}")]
    InvalidEndpoint(String, #[source] tonic::transport::Error),
    #[error("Invalid TLS configuration for endpoint '{0}': {1}")]
    InvalidTls(String, #[source] tonic::transport::Error),
}

/// Builds a lazily connecting channel bound to `endpoint` with the given
/// options applied. Connection establishment is deferred to the first RPC, so
/// resolution itself never suspends.
pub(crate) fn build_channel(
    endpoint: &str,
    options: &ChannelOptions,
) -> Result<Channel, ChannelBuildError> {
    let mut builder = Endpoint::new(endpoint.to_string())
        .map_err(|e| ChannelBuildError::InvalidEndpoint(endpoint.to_string(), e))?
        .http2_max_header_list_size(options.max_metadata_size)
        .connect_timeout(options.connect_timeout);

    if endpoint.starts_with("https://") {
        builder = builder
            .tls_config(ClientTlsConfig::new().with_webpki_roots())
            .map_err(|e| ChannelBuildError::InvalidTls(endpoint.to_string(), e))?;
    }

    // TODO: honor options.http_proxy once tonic exposes a connector-level
    // proxy hook; until then the field is carried but not applied.
    Ok(builder.connect_lazy())
}
