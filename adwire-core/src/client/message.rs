//! # Resolved Message Representation
//!
//! A resolved message takes exactly one of two mutually exclusive forms,
//! selected once per client by [`MessageMode`]: the rich reflective form
//! backed by `DynamicMessage`, or the raw form of encoded Protobuf bytes
//! plus the descriptor. The internal canonical representation is always
//! `DynamicMessage`; the raw adapter is applied only at the resolution and
//! call boundaries, and the conversion is pure and lossless both ways.
use crate::config::MessageMode;
use prost::Message;
use prost_reflect::{DynamicMessage, MessageDescriptor, ReflectMessage};

/// A message instance in the representation the owning client is configured
/// for.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedMessage {
    /// Rich reflective form.
    Dynamic(DynamicMessage),
    /// Raw Protobuf form: encoded bytes plus the schema they decode against.
    Encoded {
        descriptor: MessageDescriptor,
        bytes: Vec<u8>,
    },
}

impl ResolvedMessage {
    /// A default-valued instance of `descriptor` in the requested mode.
    pub(crate) fn empty(descriptor: MessageDescriptor, mode: MessageMode) -> Self {
        Self::from_dynamic(DynamicMessage::new(descriptor), mode)
    }

    /// Wraps a canonical `DynamicMessage` in the requested mode.
    pub(crate) fn from_dynamic(message: DynamicMessage, mode: MessageMode) -> Self {
        match mode {
            MessageMode::Dynamic => Self::Dynamic(message),
            MessageMode::Encoded => Self::Encoded {
                bytes: message.encode_to_vec(),
                descriptor: message.descriptor(),
            },
        }
    }

    pub fn descriptor(&self) -> MessageDescriptor {
        match self {
            Self::Dynamic(message) => message.descriptor(),
            Self::Encoded { descriptor, .. } => descriptor.clone(),
        }
    }

    /// Converts into the rich form. For the raw form this decodes the bytes
    /// against their descriptor; a decode failure means the bytes were
    /// tampered with, since both forms originate from the same canonical
    /// message.
    pub fn into_dynamic(self) -> Result<DynamicMessage, prost::DecodeError> {
        match self {
            Self::Dynamic(message) => Ok(message),
            Self::Encoded { descriptor, bytes } => {
                DynamicMessage::decode(descriptor, bytes.as_slice())
            }
        }
    }

    /// Converts into the raw form.
    pub fn into_encoded(self) -> (MessageDescriptor, Vec<u8>) {
        match self {
            Self::Dynamic(message) => (message.descriptor(), message.encode_to_vec()),
            Self::Encoded { descriptor, bytes } => (descriptor, bytes),
        }
    }
}

impl From<DynamicMessage> for ResolvedMessage {
    fn from(message: DynamicMessage) -> Self {
        Self::Dynamic(message)
    }
}
