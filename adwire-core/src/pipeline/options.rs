//! # Channel Options
//!
//! The transport-level tuning applied to every channel this crate builds.
//! Built as a pure function of the client configuration and returned as an
//! immutable value; nothing here mutates process-global state.

use crate::config::ClientConfig;
use std::time::Duration;

/// Outbound metadata (header-list) ceiling, larger than the HTTP/2 default to
/// make room for trailer-encoded failure details.
pub const MAX_METADATA_SIZE: u32 = 16 * 1024 * 1024;

/// Inbound message-size ceiling; large report responses exceed tonic's 4 MiB
/// default.
pub const MAX_RECEIVE_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// How long the first connection attempt may take.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport tuning for one resolved service's channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOptions {
    pub max_metadata_size: u32,
    pub max_receive_message_size: usize,
    pub connect_timeout: Duration,
    pub http_proxy: Option<String>,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            max_metadata_size: MAX_METADATA_SIZE,
            max_receive_message_size: MAX_RECEIVE_MESSAGE_SIZE,
            connect_timeout: CONNECT_TIMEOUT,
            http_proxy: None,
        }
    }
}

impl ChannelOptions {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            http_proxy: config.http_proxy.clone(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_raise_both_ceilings() {
        let options = ChannelOptions::default();
        assert_eq!(options.max_metadata_size, 16 * 1024 * 1024);
        assert_eq!(options.max_receive_message_size, 64 * 1024 * 1024);
        assert_eq!(options.connect_timeout, Duration::from_secs(30));
        assert!(options.http_proxy.is_none());
    }

    #[test]
    fn proxy_is_taken_from_config() {
        let config = ClientConfig {
            developer_token: Some("token".to_string()),
            http_proxy: Some("http://proxy.internal:3128".to_string()),
            ..Default::default()
        };
        let options = ChannelOptions::from_config(&config);
        assert_eq!(
            options.http_proxy.as_deref(),
            Some("http://proxy.internal:3128")
        );
    }
}
