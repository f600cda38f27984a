//! Property-list codec.
//!
//! [`decode`] turns XML property-list bytes into a [`DocumentValue`] tree and
//! [`encode`] writes one back. For every value `decode` can produce,
//! `decode(&encode(&v)) == v`: key order, sequence order and value kinds all
//! survive.
//!
//! Only the XML flavour is supported. Decoding is bounded by
//! [`LimitsConfig`] (payload size and nesting depth).

mod reader;
mod writer;

pub use reader::parse_integer;

use crate::config::LimitsConfig;
use crate::errors::{OcError, OcResult};
use crate::value::DocumentValue;

/// Decode with default limits.
pub fn decode(bytes: &[u8]) -> OcResult<DocumentValue> {
    decode_with(bytes, &LimitsConfig::default())
}

/// Decode with explicit limits.
pub fn decode_with(bytes: &[u8], limits: &LimitsConfig) -> OcResult<DocumentValue> {
    if bytes.len() > limits.max_document_bytes {
        return Err(OcError::format(format!(
            "document is {} bytes, limit is {}",
            bytes.len(),
            limits.max_document_bytes
        )));
    }

    let text = std::str::from_utf8(bytes).map_err(|e| {
        OcError::format(format!(
            "invalid UTF-8 at byte {}",
            e.valid_up_to()
        ))
    })?;

    reader::Reader::new(text, limits.max_depth).read_document()
}

/// Encode a tree as an XML property list.
pub fn encode(value: &DocumentValue) -> Vec<u8> {
    writer::write_document(value).into_bytes()
}

/// Encode as a `String`, for callers that print the document.
pub fn encode_to_string(value: &DocumentValue) -> String {
    writer::write_document(value)
}
