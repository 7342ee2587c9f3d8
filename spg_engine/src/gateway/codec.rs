//! Deterministic payload encoding.
//!
//! A record is serialized as compact JSON (fields in declaration order, no whitespace) and then base64 encoded. The
//! gateway signs the encoded bytes, so identical records must always produce identical strings.
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Could not serialize payload. {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Payload is not valid base64. {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("Payload is not valid UTF-8. {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("Payload has an invalid structure. {0}")]
    InvalidStructure(#[from] serde_json::Error),
}

pub fn encode<T: Serialize>(fields: &T) -> Result<String, EncodeError> {
    let json = serde_json::to_string(fields)?;
    Ok(base64::encode(json.as_bytes()))
}

/// Decodes a payload into `T`. Fields that `T` does not know about are ignored.
pub fn decode<T: DeserializeOwned>(payload: &str) -> Result<T, DecodeError> {
    let bytes = base64::decode(payload)?;
    let json = String::from_utf8(bytes)?;
    let result = serde_json::from_str(&json)?;
    Ok(result)
}
