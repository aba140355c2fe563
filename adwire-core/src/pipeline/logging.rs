//! # Call Logging
//!
//! Structured logging for every RPC a resolved service client issues, one
//! event per call (streaming calls log once per call, not per item). The
//! detail/summary level split mirrors what operators expect: successes are
//! summarized at `info` with the full exchange at `debug`; failures are
//! summarized at `warn` with the full exchange at `info`.
use tonic::metadata::MetadataMap;

use super::headers::DEVELOPER_TOKEN_KEY;

const SENSITIVE_INFO_MASK: &str = "REDACTED";

/// Flattens ascii metadata entries for logging, masking the developer token.
pub(crate) fn redact_metadata(metadata: &MetadataMap) -> Vec<(String, String)> {
    metadata
        .iter()
        .filter_map(|entry| match entry {
            tonic::metadata::KeyAndValueRef::Ascii(key, value) => {
                let rendered = if key.as_str() == DEVELOPER_TOKEN_KEY {
                    SENSITIVE_INFO_MASK.to_string()
                } else {
                    value.to_str().unwrap_or(SENSITIVE_INFO_MASK).to_string()
                };
                Some((key.as_str().to_string(), rendered))
            }
            tonic::metadata::KeyAndValueRef::Binary(..) => None,
        })
        .collect()
}

pub(crate) fn log_success(
    version: &str,
    endpoint: &str,
    method: &str,
    metadata: &[(String, String)],
) {
    tracing::debug!(
        version,
        endpoint,
        method,
        ?metadata,
        "request sent"
    );
    tracing::info!(
        version,
        endpoint,
        method,
        is_fault = false,
        "request made"
    );
}

pub(crate) fn log_failure(
    version: &str,
    endpoint: &str,
    method: &str,
    request_id: Option<&str>,
    fault_message: &str,
) {
    tracing::info!(
        version,
        endpoint,
        method,
        request_id,
        fault_message,
        "request failed"
    );
    tracing::warn!(
        version,
        endpoint,
        method,
        request_id,
        is_fault = true,
        fault_message,
        "request made"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::metadata::MetadataValue;

    #[test]
    fn developer_token_is_masked() {
        let mut metadata = MetadataMap::new();
        metadata.insert(DEVELOPER_TOKEN_KEY, "secret".parse().unwrap());
        metadata.insert("login-customer-id", "123".parse().unwrap());

        let redacted = redact_metadata(&metadata);
        assert!(redacted.contains(&(DEVELOPER_TOKEN_KEY.to_string(), "REDACTED".to_string())));
        assert!(redacted.contains(&("login-customer-id".to_string(), "123".to_string())));
    }

    #[test]
    fn binary_entries_are_skipped() {
        let mut metadata = MetadataMap::new();
        metadata.insert_bin("details-bin", MetadataValue::from_bytes(b"\x01\x02"));

        assert!(redact_metadata(&metadata).is_empty());
    }
}
