//! # Failure Translation
//!
//! The outermost pipeline step. When a call fails, the transport status'
//! trailing metadata may carry encoded failure details under the version's
//! failure key (see [`crate::catalog::Catalog::failure_trailer_key`]). Those
//! are decoded against the catalog's failure descriptor and surfaced as a
//! single [`DomainFailure`], so every caller sees one uniform error shape.
//!
//! Statuses with `Internal` or `ResourceExhausted` codes are handed back
//! untouched: the surrounding API tier treats them as retryable transport
//! conditions, not domain rejections. The same applies to statuses without
//! decodable failure details, e.g. when the endpoint itself is wrong.
use crate::catalog::Catalog;
use prost_reflect::{DynamicMessage, MessageDescriptor, Value};
use std::fmt;
use tonic::metadata::MetadataMap;
use tonic::{Code, Status};

/// Trailing-metadata key carrying the request identifier.
pub const REQUEST_ID_KEY: &str = "request-id";

const PASSTHROUGH_CODES: [Code; 2] = [Code::Internal, Code::ResourceExhausted];

/// One error entry of a [`DomainFailure`]: a message plus the field path it
/// refers to, when the API reported one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub message: String,
    pub location: Vec<String>,
}

/// The normalized error value every API-level rejection is translated into.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainFailure {
    pub request_id: Option<String>,
    pub code: Code,
    pub errors: Vec<ErrorDetail>,
}

impl fmt::Display for DomainFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Request (id: {}) failed with status '{:?}'",
            self.request_id.as_deref().unwrap_or("unknown"),
            self.code,
        )?;
        for error in &self.errors {
            write!(f, "\n\t{}", error.message)?;
            if !error.location.is_empty() {
                write!(f, " (at {})", error.location.join("."))?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for DomainFailure {}

/// Decodes trailer-encoded failure details for one API version.
#[derive(Debug, Clone)]
pub(crate) struct FailureTranslator {
    descriptor: Option<MessageDescriptor>,
    trailer_key: Option<String>,
}

impl FailureTranslator {
    pub(crate) fn for_version(catalog: &Catalog, version: &str) -> Self {
        Self {
            descriptor: catalog.failure_descriptor(version),
            trailer_key: catalog.failure_trailer_key(version),
        }
    }

    /// Translates a failed status. `Err` hands the raw status back to the
    /// caller untouched.
    pub(crate) fn translate(&self, status: Status) -> Result<DomainFailure, Status> {
        if PASSTHROUGH_CODES.contains(&status.code()) {
            return Err(status);
        }
        let (Some(descriptor), Some(key)) = (&self.descriptor, &self.trailer_key) else {
            return Err(status);
        };
        let Some(failure) = decode_failure(status.metadata(), key, descriptor) else {
            return Err(status);
        };

        let request_id = request_id_from_metadata(status.metadata())
            .or_else(|| string_field(&failure, "request_id"));

        Ok(DomainFailure {
            request_id,
            code: status.code(),
            errors: collect_errors(&failure),
        })
    }
}

pub(crate) fn request_id_from_metadata(metadata: &MetadataMap) -> Option<String> {
    metadata
        .get(REQUEST_ID_KEY)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn decode_failure(
    metadata: &MetadataMap,
    key: &str,
    descriptor: &MessageDescriptor,
) -> Option<DynamicMessage> {
    let bytes = metadata.get_bin(key)?.to_bytes().ok()?;
    DynamicMessage::decode(descriptor.clone(), bytes).ok()
}

fn collect_errors(failure: &DynamicMessage) -> Vec<ErrorDetail> {
    let Some(errors) = failure.get_field_by_name("errors") else {
        return Vec::new();
    };
    let Some(entries) = errors.as_list() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_message)
        .map(|entry| ErrorDetail {
            message: string_field(entry, "message").unwrap_or_default(),
            location: field_path(entry),
        })
        .collect()
}

fn string_field(message: &DynamicMessage, field: &str) -> Option<String> {
    let value = message.get_field_by_name(field)?;
    let text = value.as_str()?;
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

// Flattens `location.field_path_elements[].field_name` into a path list.
fn field_path(error: &DynamicMessage) -> Vec<String> {
    let Some(location) = error.get_field_by_name("location") else {
        return Vec::new();
    };
    let Some(location) = location.as_message() else {
        return Vec::new();
    };
    let Some(elements) = location.get_field_by_name("field_path_elements") else {
        return Vec::new();
    };
    let Some(elements) = elements.as_list() else {
        return Vec::new();
    };

    elements
        .iter()
        .filter_map(Value::as_message)
        .filter_map(|element| string_field(element, "field_name"))
        .collect()
}
