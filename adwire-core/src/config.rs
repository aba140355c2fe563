//! # Client Configuration
//!
//! The structured bag of settings an [`crate::client::AdsClient`] is built
//! from. The core only reads these values; acquiring them is the caller's
//! concern, so loaders exist for the usual sources: a YAML file, a YAML
//! string, prefixed environment variables and an in-memory value.
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment-variable configuration, e.g.
/// `ADWIRE_DEVELOPER_TOKEN`. Nested fields use a double underscore:
/// `ADWIRE_CREDENTIALS__ACCESS_TOKEN`.
pub const ENV_PREFIX: &str = "ADWIRE_";

/// Errors produced while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: '{0}'")]
    Load(#[from] figment::Error),
    #[error(
        "A required field in the configuration data was not found: 'developer_token'. \
         It may only be omitted when 'use_cloud_org_for_api_access' is enabled."
    )]
    MissingDeveloperToken,
    #[error(
        "The specified {field} is invalid: '{value}'. It must be a string of digits with \
         no hyphens or other punctuation, e.g. '1234567890'."
    )]
    InvalidCustomerId { field: &'static str, value: String },
}

/// Which in-memory representation resolved messages take.
///
/// Exactly one mode is active per client; the conversion between the two
/// forms is pure and lossless in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageMode {
    /// Rich reflective form backed by `prost_reflect::DynamicMessage`.
    #[default]
    Dynamic,
    /// Raw protobuf form: encoded bytes plus the message descriptor.
    Encoded,
}

/// Credential material for the remote API.
///
/// Token acquisition and refresh are external collaborators' responsibilities;
/// the core only attaches an `authorization` header when an access token is
/// present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub access_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
}

/// Settings consumed by [`crate::client::AdsClient`].
///
/// Immutable for the client's lifetime except `version`,
/// `login_customer_id` and `linked_customer_id`, which the owning client may
/// mutate after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Developer-identity token attached to every call as `developer-token`.
    pub developer_token: Option<String>,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    /// Overrides the built-in default endpoint when set.
    pub endpoint: Option<String>,
    pub login_customer_id: Option<String>,
    pub linked_customer_id: Option<String>,
    /// Pins the API version; when set it overrides per-call versions.
    pub version: Option<String>,
    /// Outbound proxy URI for channel construction.
    pub http_proxy: Option<String>,
    #[serde(default)]
    pub message_mode: MessageMode,
    /// Optional `tracing` filter directive (e.g. `adwire_core=debug`),
    /// applied once when the client is constructed.
    pub logging: Option<String>,
    /// Alternate access-determination mode: signals the organization-level
    /// access header instead of the developer token.
    #[serde(default)]
    pub use_cloud_org_for_api_access: bool,
}

impl ClientConfig {
    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Figment::new().merge(Yaml::file(path)).extract()?;
        config.validated()
    }

    /// Loads configuration from a YAML document string.
    pub fn from_yaml_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new().merge(Yaml::string(document)).extract()?;
        config.validated()
    }

    /// Loads configuration from `ADWIRE_`-prefixed environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validated()
    }

    /// Loads configuration from an in-memory value, e.g. `serde_json::json!`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(value))
            .extract()?;
        config.validated()
    }

    /// Checks cross-field requirements. Called by every loader and again by
    /// the client constructor for configs assembled by hand.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.developer_token.is_none() && !self.use_cloud_org_for_api_access {
            return Err(ConfigError::MissingDeveloperToken);
        }
        validate_customer_id("login_customer_id", self.login_customer_id.as_deref())?;
        validate_customer_id("linked_customer_id", self.linked_customer_id.as_deref())?;
        Ok(self)
    }
}

fn validate_customer_id(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), ConfigError> {
    match value {
        Some(id) if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) => {
            Err(ConfigError::InvalidCustomerId {
                field,
                value: id.to_string(),
            })
        }
        _ => Ok(()),
    }
}
