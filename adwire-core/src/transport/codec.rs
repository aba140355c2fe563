//! # Dynamic Message Codec
//!
//! An implementation of `tonic::codec::Codec` that sends and receives
//! `prost_reflect::DynamicMessage` values, bypassing the need for generated
//! Rust structs. The codec holds the descriptors (schemas) for both the
//! request and the response messages of one method, allowing it to perform
//! dynamic serialization.
use prost::Message;
use prost_reflect::{DynamicMessage, MessageDescriptor, ReflectMessage};
use tonic::{
    codec::{Codec, DecodeBuf, Decoder, EncodeBuf, Encoder},
    Status,
};

/// A codec bridging `DynamicMessage` values and the Protobuf wire format for
/// a single method's request/response pair.
pub struct DynamicCodec {
    /// Schema for the input message.
    req_desc: MessageDescriptor,
    /// Schema for the output message.
    res_desc: MessageDescriptor,
}

impl DynamicCodec {
    pub fn new(req_desc: MessageDescriptor, res_desc: MessageDescriptor) -> Self {
        Self { req_desc, res_desc }
    }
}

impl Codec for DynamicCodec {
    type Encode = DynamicMessage;
    type Decode = DynamicMessage;

    type Encoder = DynamicEncoder;
    type Decoder = DynamicDecoder;

    fn encoder(&mut self) -> Self::Encoder {
        DynamicEncoder(self.req_desc.clone())
    }

    fn decoder(&mut self) -> Self::Decoder {
        DynamicDecoder(self.res_desc.clone())
    }
}

/// Responsible for encoding a `DynamicMessage` into Protobuf bytes.
pub struct DynamicEncoder(MessageDescriptor);

impl Encoder for DynamicEncoder {
    type Item = DynamicMessage;
    type Error = Status;

    fn encode(&mut self, item: Self::Item, dst: &mut EncodeBuf<'_>) -> Result<(), Self::Error> {
        if item.descriptor() != self.0 {
            return Err(Status::invalid_argument(format!(
                "Request message is a '{}', the method expects a '{}'",
                item.descriptor().full_name(),
                self.0.full_name(),
            )));
        }
        item.encode_raw(dst);
        Ok(())
    }
}

/// Responsible for decoding Protobuf bytes into a `DynamicMessage`.
pub struct DynamicDecoder(MessageDescriptor);

impl Decoder for DynamicDecoder {
    type Item = DynamicMessage;
    type Error = Status;

    fn decode(&mut self, src: &mut DecodeBuf<'_>) -> Result<Option<Self::Item>, Self::Error> {
        let mut msg = DynamicMessage::new(self.0.clone());
        msg.merge(src)
            .map_err(|e| Status::internal(format!("Failed to decode Protobuf bytes: {}", e)))?;
        Ok(Some(msg))
    }
}
