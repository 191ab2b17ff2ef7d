//! Serde helpers for `Vec<u8>` fields that travel as base64url tokens.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Descriptor {
//!     #[serde(with = "passage_codec::serde_token")]
//!     id: Vec<u8>,
//! }
//!
//! let descriptor: Descriptor = serde_json::from_str(r#"{"id":"Qg"}"#).unwrap();
//! assert_eq!(descriptor.id, vec![0x42]);
//! ```

use std::fmt::Formatter;

use serde::{
    Deserializer, Serializer,
    de::{Error, Visitor},
};

use crate::{decode, encode};

/// Serialize bytes as an unpadded base64url string.
pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&encode(bytes))
}

/// Deserialize bytes from an unpadded base64url string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(TokenVisitor)
}

struct TokenVisitor;

impl Visitor<'_> for TokenVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("an unpadded base64url string")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        decode(value).map_err(E::custom)
    }
}
