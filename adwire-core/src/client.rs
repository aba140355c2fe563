//! # Ads Client
//!
//! The main entry point of the crate. An [`AdsClient`] owns a validated
//! [`ClientConfig`] and a [`Catalog`] and resolves, by name:
//!
//! * **Service clients** ([`ServiceClient`]): bound to a lazily connecting
//!   channel, with the identity/logging/failure pipeline attached. A fresh
//!   client is resolved per call site; nothing is cached, so configuration
//!   changes take effect on the next resolution.
//! * **Message types** ([`ResolvedMessage`]): default-valued instances in
//!   the configured representation.
//! * **Enum directories** ([`EnumDirectory`]): lazy per-version views over
//!   the published enums.
//!
//! Resolution itself never suspends. Channel connection is deferred to the
//! first RPC, so every `get_*` method here is a plain synchronous call.
pub mod blocking;
pub mod enums;
pub mod message;
pub mod service;

pub use enums::{EnumDirectory, EnumLookupError};
pub use message::ResolvedMessage;
pub use service::{CallError, ServiceClient};

use crate::catalog::Catalog;
use crate::config::{ClientConfig, ConfigError};
use crate::pipeline::failure::FailureTranslator;
use crate::pipeline::headers::HeaderInterceptor;
use crate::pipeline::{ChannelOptions, RequestInterceptor};
use crate::transport::{build_channel, ChannelBuildError};
use crate::BoxError;

use http_body::Body as HttpBody;
use prost_reflect::ServiceDescriptor;
use std::sync::Arc;
use tokio::runtime::Handle;
use tonic::client::GrpcService;
use tonic::metadata::errors::InvalidMetadataValue;

/// Endpoint used when the configuration does not name one.
pub const DEFAULT_ENDPOINT: &str = "https://grpc.adsapi.example.com";

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("Unknown API version '{version}', supported versions: {supported:?}")]
    UnknownVersion {
        version: String,
        supported: Vec<String>,
    },
    #[error("No service named '{name}' in version {version}")]
    ServiceNotFound { name: String, version: String },
    #[error(transparent)]
    Channel(#[from] ChannelBuildError),
    #[error("Configured value for header '{key}' is not a valid metadata value: '{source}'")]
    InvalidHeader {
        key: &'static str,
        source: InvalidMetadataValue,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum TypeError {
    #[error(
        "'{name}' looks like a raw generated-module reference; \
         ask for the message name itself, e.g. 'Campaign'"
    )]
    RawModuleReference { name: String },
    #[error(
        "'{name}' names a service client or transport, not a message type; \
         use a service resolver for those"
    )]
    ServiceOrTransportName { name: String },
    #[error("No message type named '{name}' in version {version}")]
    NotFound { name: String, version: String },
    #[error(transparent)]
    UnknownVersion(#[from] ResolveError),
}

/// Resolution facade over one configuration and one descriptor catalog.
#[derive(Debug, Clone)]
pub struct AdsClient {
    config: ClientConfig,
    catalog: Catalog,
}

impl AdsClient {
    /// Validates `config` and builds a client over `catalog`.
    ///
    /// When the configuration carries a `logging` directive, the global
    /// tracing subscriber is installed here; an already-installed subscriber
    /// is left in place.
    pub fn new(config: ClientConfig, catalog: Catalog) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        if let Some(directive) = &config.logging {
            init_logging(directive);
        }
        Ok(Self { config, catalog })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The endpoint service clients will dial.
    pub fn endpoint(&self) -> &str {
        self.config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Pins every subsequent resolution to `version`. A pinned version wins
    /// over per-call version arguments.
    pub fn set_version(&mut self, version: Option<&str>) {
        self.config.version = version.map(str::to_owned);
    }

    /// Changes the login customer id for subsequently resolved clients.
    /// Already-resolved clients keep the headers they were built with.
    pub fn set_login_customer_id(&mut self, id: Option<&str>) {
        self.config.login_customer_id = id.map(str::to_owned);
    }

    /// Changes the linked customer id for subsequently resolved clients.
    pub fn set_linked_customer_id(&mut self, id: Option<&str>) {
        self.config.linked_customer_id = id.map(str::to_owned);
    }

    /// Resolves a service client in the effective version (the pinned
    /// version if one is configured, otherwise the newest in the catalog).
    pub fn get_service(&self, name: &str) -> Result<ServiceClient, ResolveError> {
        self.get_service_with(name, None, Vec::new())
    }

    /// Resolves a service client in an explicitly requested version. A
    /// pinned configuration version still wins.
    pub fn get_service_in_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<ServiceClient, ResolveError> {
        self.get_service_with(name, Some(version), Vec::new())
    }

    /// Resolves a service client with caller-supplied metadata hooks. The
    /// hooks run before the identity headers on every call.
    pub fn get_service_with(
        &self,
        name: &str,
        version: Option<&str>,
        interceptors: Vec<Arc<dyn RequestInterceptor>>,
    ) -> Result<ServiceClient, ResolveError> {
        let version = self.effective_version(version)?;
        let options = ChannelOptions::from_config(&self.config);
        let channel = build_channel(self.endpoint(), &options)?;
        self.bind(channel, &options, name, &version, interceptors)
    }

    /// Like [`Self::get_service_with`], but over a caller-provided
    /// transport instead of a freshly built channel. This is the seam
    /// in-process tests drive their servers through.
    pub fn get_service_with_transport<S>(
        &self,
        transport: S,
        name: &str,
        version: Option<&str>,
        interceptors: Vec<Arc<dyn RequestInterceptor>>,
    ) -> Result<ServiceClient<S>, ResolveError>
    where
        S: GrpcService<tonic::body::Body>,
        S::Error: Into<BoxError>,
        S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
        <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
    {
        let version = self.effective_version(version)?;
        let options = ChannelOptions::from_config(&self.config);
        self.bind(transport, &options, name, &version, interceptors)
    }

    /// Resolves a service client and wraps it for blocking callers. Calls
    /// block on `handle`; the client itself never owns a runtime.
    pub fn get_blocking_service(
        &self,
        name: &str,
        handle: Handle,
    ) -> Result<blocking::BlockingServiceClient, ResolveError> {
        Ok(blocking::BlockingServiceClient::new(
            self.get_service(name)?,
            handle,
        ))
    }

    /// Resolves a message type by simple name and returns a default-valued
    /// instance in the configured representation. Namespaces are searched in
    /// the fixed priority order (common, enums, errors, resources,
    /// services).
    pub fn get_type(&self, name: &str) -> Result<ResolvedMessage, TypeError> {
        self.get_type_in_version(name, None)
    }

    pub fn get_type_in_version(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<ResolvedMessage, TypeError> {
        let lowered = name.to_ascii_lowercase();
        if lowered.ends_with("pb2") {
            return Err(TypeError::RawModuleReference {
                name: name.to_string(),
            });
        }
        if lowered.ends_with("serviceclient") || lowered.ends_with("transport") {
            return Err(TypeError::ServiceOrTransportName {
                name: name.to_string(),
            });
        }

        let version = self.effective_version(version)?;
        let (_, descriptor) =
            self.catalog
                .find_message(&version, name)
                .ok_or_else(|| TypeError::NotFound {
                    name: name.to_string(),
                    version: version.clone(),
                })?;
        Ok(ResolvedMessage::empty(descriptor, self.config.message_mode))
    }

    /// Enum directory for the effective version.
    pub fn enums(&self) -> Result<EnumDirectory, ResolveError> {
        let version = self.effective_version(None)?;
        Ok(EnumDirectory::new(self.catalog.clone(), &version))
    }

    pub fn enums_in_version(&self, version: &str) -> Result<EnumDirectory, ResolveError> {
        let version = self.effective_version(Some(version))?;
        Ok(EnumDirectory::new(self.catalog.clone(), &version))
    }

    fn bind<S>(
        &self,
        transport: S,
        options: &ChannelOptions,
        name: &str,
        version: &str,
        interceptors: Vec<Arc<dyn RequestInterceptor>>,
    ) -> Result<ServiceClient<S>, ResolveError>
    where
        S: GrpcService<tonic::body::Body>,
        S::Error: Into<BoxError>,
        S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
        <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
    {
        let service = self.service_descriptor(name, version)?;
        let headers = HeaderInterceptor::from_config(&self.config)
            .map_err(|(key, source)| ResolveError::InvalidHeader { key, source })?;
        let translator = FailureTranslator::for_version(&self.catalog, version);

        Ok(ServiceClient::new(
            transport,
            options.max_receive_message_size,
            service,
            version.to_string(),
            self.endpoint().to_string(),
            self.config.message_mode,
            headers,
            interceptors,
            translator,
        ))
    }

    fn service_descriptor(
        &self,
        name: &str,
        version: &str,
    ) -> Result<ServiceDescriptor, ResolveError> {
        self.catalog
            .service(version, name)
            .ok_or_else(|| ResolveError::ServiceNotFound {
                name: name.to_string(),
                version: version.to_string(),
            })
    }

    /// The version a resolution should use: the configured pin wins, then
    /// the per-call request, then the newest catalog version.
    fn effective_version(&self, requested: Option<&str>) -> Result<String, ResolveError> {
        let version = self
            .config
            .version
            .as_deref()
            .or(requested)
            .unwrap_or_else(|| self.catalog.latest_version());
        if !self.catalog.contains_version(version) {
            return Err(ResolveError::UnknownVersion {
                version: version.to_string(),
                supported: self.catalog.versions().to_vec(),
            });
        }
        Ok(version.to_string())
    }
}

fn init_logging(directive: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    // Keep whatever subscriber the host application installed first.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use ads_stub_service::FILE_DESCRIPTOR_SET;

    fn client(config: ClientConfig) -> AdsClient {
        let catalog = Catalog::from_descriptor_set(FILE_DESCRIPTOR_SET).unwrap();
        AdsClient::new(config, catalog).unwrap()
    }

    fn base_config() -> ClientConfig {
        ClientConfig {
            developer_token: Some("dev-token".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn effective_version_defaults_to_newest() {
        let client = client(base_config());
        assert_eq!(client.effective_version(None).unwrap(), "v2");
        assert_eq!(client.effective_version(Some("v1")).unwrap(), "v1");
    }

    #[test]
    fn pinned_version_wins_over_per_call_request() {
        let mut config = base_config();
        config.version = Some("v1".to_string());
        let client = client(config);
        assert_eq!(client.effective_version(Some("v2")).unwrap(), "v1");
    }

    #[test]
    fn unknown_versions_are_rejected_with_the_supported_list() {
        let client = client(base_config());
        let err = client.effective_version(Some("v99")).unwrap_err();
        let ResolveError::UnknownVersion { version, supported } = err else {
            panic!("expected UnknownVersion");
        };
        assert_eq!(version, "v99");
        assert_eq!(supported, ["v2", "v1"]);
    }

    #[test]
    fn endpoint_override_wins_over_the_default() {
        assert_eq!(client(base_config()).endpoint(), DEFAULT_ENDPOINT);

        let mut config = base_config();
        config.endpoint = Some("https://sandbox.adsapi.example.com".to_string());
        assert_eq!(
            client(config).endpoint(),
            "https://sandbox.adsapi.example.com"
        );
    }

    #[test]
    fn raw_module_references_are_refused() {
        let client = client(base_config());
        let err = client.get_type("campaign_pb2").unwrap_err();
        assert!(matches!(err, TypeError::RawModuleReference { .. }));
    }

    #[test]
    fn service_and_transport_names_are_refused() {
        let client = client(base_config());
        assert!(matches!(
            client.get_type("CampaignServiceClient").unwrap_err(),
            TypeError::ServiceOrTransportName { .. }
        ));
        assert!(matches!(
            client.get_type("CampaignServiceTransport").unwrap_err(),
            TypeError::ServiceOrTransportName { .. }
        ));
    }

    #[test]
    fn resolves_types_in_the_default_representation() {
        let client = client(base_config());
        let message = client.get_type_in_version("Campaign", Some("v1")).unwrap();
        assert_eq!(
            message.descriptor().full_name(),
            "adsapi.v1.resources.Campaign"
        );
        assert!(matches!(message, ResolvedMessage::Dynamic(_)));
    }

    #[tokio::test]
    async fn unknown_service_names_resolve_to_an_error() {
        let client = client(base_config());
        let err = client
            .get_service_in_version("BiddingService", "v1")
            .unwrap_err();
        assert!(matches!(err, ResolveError::ServiceNotFound { .. }));
    }

    #[tokio::test]
    async fn resolution_is_synchronous_and_lazy() {
        // No server behind the endpoint; resolution must still succeed.
        let mut config = base_config();
        config.endpoint = Some("http://localhost:1".to_string());
        let client = client(config);
        let service = client.get_service("CampaignService").unwrap();
        assert_eq!(service.full_name(), "adsapi.v2.services.CampaignService");
    }
}
