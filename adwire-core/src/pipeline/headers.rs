//! # Identity Headers
//!
//! Attaches the fixed set of identity headers to every outbound call:
//! the developer token (or the organization-access marker when that mode is
//! configured), the optional login/linked customer ids, a bearer token when
//! credentials carry one, and the client-identification header. The payload
//! is never inspected or altered.
use crate::config::ClientConfig;
use tonic::metadata::errors::InvalidMetadataValue;
use tonic::metadata::{Ascii, MetadataMap, MetadataValue};
use tonic::Status;

pub const DEVELOPER_TOKEN_KEY: &str = "developer-token";
pub const LOGIN_CUSTOMER_ID_KEY: &str = "login-customer-id";
pub const LINKED_CUSTOMER_ID_KEY: &str = "linked-customer-id";
pub const CLOUD_ORG_ACCESS_KEY: &str = "use-cloud-org-for-api-access";
pub const AUTHORIZATION_KEY: &str = "authorization";
pub const CLIENT_INFO_KEY: &str = "x-api-client";

/// Library identification sent on every call, e.g. `adwire/0.1.0`.
pub fn client_info_value() -> String {
    format!("adwire/{}", env!("CARGO_PKG_VERSION"))
}

/// A caller-supplied hook run on every outbound call's metadata, before the
/// mandatory identity headers are attached.
///
/// NOTE: this extension point is intended for request tagging and debugging,
/// not for replacing the mandatory pipeline.
pub trait RequestInterceptor: Send + Sync {
    fn call(&self, metadata: &mut MetadataMap) -> Result<(), Status>;
}

impl<F> RequestInterceptor for F
where
    F: Fn(&mut MetadataMap) -> Result<(), Status> + Send + Sync,
{
    fn call(&self, metadata: &mut MetadataMap) -> Result<(), Status> {
        self(metadata)
    }
}

/// The mandatory metadata step, built from the client configuration at
/// service-resolution time. Header values are parsed once here so every call
/// is a plain insert.
#[derive(Debug, Clone)]
pub struct HeaderInterceptor {
    developer_token: Option<MetadataValue<Ascii>>,
    login_customer_id: Option<MetadataValue<Ascii>>,
    linked_customer_id: Option<MetadataValue<Ascii>>,
    bearer: Option<MetadataValue<Ascii>>,
    use_cloud_org: bool,
    client_info: MetadataValue<Ascii>,
}

impl HeaderInterceptor {
    pub(crate) fn from_config(
        config: &ClientConfig,
    ) -> Result<Self, (&'static str, InvalidMetadataValue)> {
        Ok(Self {
            developer_token: parse_value(DEVELOPER_TOKEN_KEY, config.developer_token.as_deref())?,
            login_customer_id: parse_value(
                LOGIN_CUSTOMER_ID_KEY,
                config.login_customer_id.as_deref(),
            )?,
            linked_customer_id: parse_value(
                LINKED_CUSTOMER_ID_KEY,
                config.linked_customer_id.as_deref(),
            )?,
            bearer: parse_value(
                AUTHORIZATION_KEY,
                config
                    .credentials
                    .access_token
                    .as_deref()
                    .map(|token| format!("Bearer {token}"))
                    .as_deref(),
            )?,
            use_cloud_org: config.use_cloud_org_for_api_access,
            client_info: client_info_value()
                .parse()
                .map_err(|source| (CLIENT_INFO_KEY, source))?,
        })
    }

    /// Inserts the identity headers into an outbound call's metadata.
    pub(crate) fn apply(&self, metadata: &mut MetadataMap) {
        if self.use_cloud_org {
            metadata.insert(CLOUD_ORG_ACCESS_KEY, MetadataValue::from_static("true"));
        } else if let Some(token) = &self.developer_token {
            metadata.insert(DEVELOPER_TOKEN_KEY, token.clone());
        }
        if let Some(id) = &self.login_customer_id {
            metadata.insert(LOGIN_CUSTOMER_ID_KEY, id.clone());
        }
        if let Some(id) = &self.linked_customer_id {
            metadata.insert(LINKED_CUSTOMER_ID_KEY, id.clone());
        }
        if let Some(bearer) = &self.bearer {
            metadata.insert(AUTHORIZATION_KEY, bearer.clone());
        }
        metadata.insert(CLIENT_INFO_KEY, self.client_info.clone());
    }
}

fn parse_value(
    key: &'static str,
    value: Option<&str>,
) -> Result<Option<MetadataValue<Ascii>>, (&'static str, InvalidMetadataValue)> {
    value
        .map(|v| v.parse().map_err(|source| (key, source)))
        .transpose()
}
