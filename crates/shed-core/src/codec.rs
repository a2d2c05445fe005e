//! Authenticated encoding of values handed to untrusted clients.
//!
//! An encoded value is `<hmac-sha256 hex>:<payload hex>`. Decoding verifies
//! the tag before looking at the payload.

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SEPARATOR: char = ':';

/// Failures decoding or keying the codec.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Codec secret must not be empty")]
    EmptySecret,

    #[error("Codec secret rejected: {reason}")]
    InvalidSecret { reason: String },

    #[error("Encoded value is malformed: {reason}")]
    Malformed { reason: String },

    #[error("Encoded value failed authentication")]
    Unauthenticated,
}

/// A verified decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Json(Value),
    Text(String),
}

/// Keyed-hash codec with an explicit secret.
#[derive(Clone)]
pub struct AuthenticatedCodec {
    keyed: HmacSha256,
}

impl std::fmt::Debug for AuthenticatedCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedCodec").finish_non_exhaustive()
    }
}

impl AuthenticatedCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, CodecError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(CodecError::EmptySecret);
        }
        let keyed = HmacSha256::new_from_slice(secret).map_err(|e| CodecError::InvalidSecret {
            reason: e.to_string(),
        })?;
        Ok(Self { keyed })
    }

    pub fn encode_json(&self, value: &Value) -> String {
        self.encode_bytes(value.to_string().as_bytes())
    }

    pub fn encode_text(&self, text: &str) -> String {
        self.encode_bytes(text.as_bytes())
    }

    fn encode_bytes(&self, payload: &[u8]) -> String {
        let mut mac = self.keyed.clone();
        mac.update(payload);
        let tag = mac.finalize().into_bytes();
        format!("{}{SEPARATOR}{}", hex::encode(tag), hex::encode(payload))
    }

    /// Verify and decode `encoded`.
    ///
    /// Payloads that parse as JSON come back as [`Decoded::Json`], anything
    /// else as [`Decoded::Text`].
    pub fn decode(&self, encoded: &str) -> Result<Decoded, CodecError> {
        let (tag_hex, payload_hex) =
            encoded
                .trim()
                .split_once(SEPARATOR)
                .ok_or_else(|| CodecError::Malformed {
                    reason: format!("missing '{SEPARATOR}' separator"),
                })?;
        let tag = hex::decode(tag_hex).map_err(|e| CodecError::Malformed {
            reason: format!("tag: {e}"),
        })?;
        let payload = hex::decode(payload_hex).map_err(|e| CodecError::Malformed {
            reason: format!("payload: {e}"),
        })?;

        let mut mac = self.keyed.clone();
        mac.update(&payload);
        mac.verify_slice(&tag)
            .map_err(|_| CodecError::Unauthenticated)?;

        let text = String::from_utf8(payload).map_err(|e| CodecError::Malformed {
            reason: e.to_string(),
        })?;
        Ok(match serde_json::from_str::<Value>(&text) {
            Ok(value) => Decoded::Json(value),
            Err(_) => Decoded::Text(text),
        })
    }
}
