//! Byte codecs for entity documents.
//!
//! The storage layer hands raw bytes in and takes raw bytes out; these helpers
//! convert them to and from [`EntityDocument`]. JSON is the canonical format;
//! MessagePack is the compact binary alternative.

use std::path::Path;

use crate::document::EntityDocument;
use crate::error::CodecError;

/// On-disk encoding of an entity document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// UTF-8 JSON.
    Json,
    /// MessagePack with named fields.
    MessagePack,
}

impl DocumentFormat {
    /// Pick a format from a file extension: `.msgpack` and `.mpk` select
    /// MessagePack, anything else JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("msgpack" | "mpk") => Self::MessagePack,
            _ => Self::Json,
        }
    }

    /// Encode `doc` in this format.
    ///
    /// # Errors
    ///
    /// See [`encode_json_pretty`] and [`encode_msgpack`].
    pub fn encode(self, doc: &EntityDocument) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Json => encode_json_pretty(doc),
            Self::MessagePack => encode_msgpack(doc),
        }
    }

    /// Decode a document in this format.
    ///
    /// # Errors
    ///
    /// See [`decode_json`] and [`decode_msgpack`].
    pub fn decode(self, bytes: &[u8]) -> Result<EntityDocument, CodecError> {
        match self {
            Self::Json => decode_json(bytes),
            Self::MessagePack => decode_msgpack(bytes),
        }
    }
}

/// Encode a document to compact JSON bytes.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialisation fails.
pub fn encode_json(doc: &EntityDocument) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(doc).map_err(CodecError::Json)
}

/// Encode a document to indented JSON bytes.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialisation fails.
pub fn encode_json_pretty(doc: &EntityDocument) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec_pretty(doc).map_err(CodecError::Json)
}

/// Decode a document from JSON bytes.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if the bytes are not an entity document.
pub fn decode_json(bytes: &[u8]) -> Result<EntityDocument, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Json)
}

/// Encode a document to MessagePack bytes.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialisation fails.
pub fn encode_msgpack(doc: &EntityDocument) -> Result<Vec<u8>, CodecError> {
    rmp_serde::to_vec_named(doc).map_err(CodecError::Encode)
}

/// Decode a document from MessagePack bytes.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if the bytes are not an entity document.
pub fn decode_msgpack(bytes: &[u8]) -> Result<EntityDocument, CodecError> {
    rmp_serde::from_slice(bytes).map_err(CodecError::Decode)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> EntityDocument {
        EntityDocument::from_value(json!({ "components": [
            { "type": "Position", "x": 3.5, "y": -2.0 },
            { "type": "Name", "value": "crate" }
        ]}))
        .unwrap()
    }

    #[test]
    fn test_json_keeps_component_order() {
        let bytes = encode_json(&sample()).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.find("Position").unwrap() < text.find("Name").unwrap());
        assert_eq!(decode_json(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_msgpack_preserves_document() {
        let bytes = encode_msgpack(&sample()).unwrap();
        assert_eq!(decode_msgpack(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_decode_invalid_bytes() {
        assert!(matches!(decode_json(b"{ nope"), Err(CodecError::Json(_))));
        assert!(matches!(decode_msgpack(&[0xC1]), Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("level.msgpack")),
            DocumentFormat::MessagePack
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("level.mpk")),
            DocumentFormat::MessagePack
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("level.json")),
            DocumentFormat::Json
        );
        assert_eq!(DocumentFormat::from_path(Path::new("level")), DocumentFormat::Json);
    }
}
