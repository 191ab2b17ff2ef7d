//! Byte buffers that travel as base64url tokens.

use std::{
    fmt::{Display, Formatter},
    ops::Deref,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Base64UrlDecodeError, decode, encode};

/// A `Vec<u8>` that serializes as an unpadded base64url string.
///
/// Plain `Vec<u8>` serializes as a sequence of integers, which is not what a
/// relying party expects to find in a `challenge` or `id` field.
///
/// ```rust
/// use passage_codec::Base64UrlBytes;
///
/// let id: Base64UrlBytes = "Qg".parse().unwrap();
/// assert_eq!(id.as_slice(), &[0x42]);
/// assert_eq!(id.to_string(), "Qg");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Base64UrlBytes(Vec<u8>);

impl Base64UrlBytes {
    /// Get the inner bytes as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Convert into the inner `Vec<u8>`.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Base64UrlBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Base64UrlBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Base64UrlBytes {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for Base64UrlBytes {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl From<Base64UrlBytes> for Vec<u8> {
    fn from(value: Base64UrlBytes) -> Self {
        value.0
    }
}

impl Display for Base64UrlBytes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&encode(&self.0))
    }
}

impl FromStr for Base64UrlBytes {
    type Err = Base64UrlDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(Self)
    }
}

impl Serialize for Base64UrlBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        crate::serde_token::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Base64UrlBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        crate::serde_token::deserialize(deserializer).map(Self)
    }
}
