//! Reshaping relying-party challenges into credential capability requests.
//!
//! The relying party sends its challenge options as JSON, with every binary
//! field carried as a base64url token. The capability needs those fields as
//! bytes. Only the known binary paths are touched; everything else in the
//! descriptor reaches the capability exactly as the relying party sent it.
//!
//! | Ceremony       | Decoded paths                                          |
//! |----------------|--------------------------------------------------------|
//! | Registration   | `challenge`, `user.id`, `excludeCredentials[*].id`     |
//! | Authentication | `challenge`, `allowCredentials[*].id`                  |
//!
//! `excludeCredentials` is optional, and so is `allowCredentials` (a missing
//! list is the same as an empty one).

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::CredentialValue;

/// Which of the two ceremonies a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CeremonyKind {
    /// Creating a new credential (`navigator.credentials.create`)
    Registration,
    /// Asserting an existing credential (`navigator.credentials.get`)
    Authentication,
}

impl Display for CeremonyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CeremonyKind::Registration => f.write_str("Registration"),
            CeremonyKind::Authentication => f.write_str("Authentication"),
        }
    }
}

/// A challenge descriptor could not be reshaped into a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed challenge field '{field}': {reason}")]
pub struct MalformedChallengeError {
    /// Path of the offending field, e.g. `allowCredentials[1].id`
    pub field: String,
    /// What was wrong with it
    pub reason: String,
}

impl MalformedChallengeError {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// The `publicKey` options handed to the credential capability.
#[derive(Debug, Clone, PartialEq)]
pub struct CeremonyRequest {
    kind: CeremonyKind,
    options: CredentialValue,
}

impl CeremonyRequest {
    /// Which ceremony this request drives.
    pub fn kind(&self) -> CeremonyKind {
        self.kind
    }

    /// The options tree, with binary fields already decoded.
    pub fn options(&self) -> &CredentialValue {
        &self.options
    }

    /// Take the options tree.
    pub fn into_options(self) -> CredentialValue {
        self.options
    }

    /// The decoded challenge nonce.
    pub fn challenge(&self) -> Option<&[u8]> {
        self.options.get("challenge").and_then(CredentialValue::as_bytes)
    }
}

impl CeremonyKind {
    /// Reshape a descriptor according to this ceremony's binary paths.
    pub fn request_from_descriptor(
        self,
        descriptor: Value,
    ) -> Result<CeremonyRequest, MalformedChallengeError> {
        match self {
            CeremonyKind::Registration => creation_request_from_descriptor(descriptor),
            CeremonyKind::Authentication => assertion_request_from_descriptor(descriptor),
        }
    }
}

/// Decode `challenge`, `user.id` and every `excludeCredentials[*].id`.
pub fn creation_request_from_descriptor(
    descriptor: Value,
) -> Result<CeremonyRequest, MalformedChallengeError> {
    let mut options = into_record(descriptor)?;

    decode_token(&mut options, "challenge", || "challenge".into())?;

    let user = options
        .get_mut("user")
        .ok_or_else(|| MalformedChallengeError::new("user", "missing field"))?;
    let CredentialValue::Record(user) = user else {
        return Err(MalformedChallengeError::new("user", "expected an object"));
    };
    decode_token(user, "id", || "user.id".into())?;

    decode_descriptor_list(&mut options, "excludeCredentials")?;

    Ok(CeremonyRequest {
        kind: CeremonyKind::Registration,
        options: CredentialValue::Record(options),
    })
}

/// Decode `challenge` and every `allowCredentials[*].id`.
pub fn assertion_request_from_descriptor(
    descriptor: Value,
) -> Result<CeremonyRequest, MalformedChallengeError> {
    let mut options = into_record(descriptor)?;

    decode_token(&mut options, "challenge", || "challenge".into())?;
    decode_descriptor_list(&mut options, "allowCredentials")?;

    Ok(CeremonyRequest {
        kind: CeremonyKind::Authentication,
        options: CredentialValue::Record(options),
    })
}

fn into_record(
    descriptor: Value,
) -> Result<IndexMap<String, CredentialValue>, MalformedChallengeError> {
    match CredentialValue::from(descriptor) {
        CredentialValue::Record(entries) => Ok(entries),
        _ => Err(MalformedChallengeError::new(
            "(root)",
            "expected a JSON object",
        )),
    }
}

fn decode_descriptor_list(
    options: &mut IndexMap<String, CredentialValue>,
    key: &str,
) -> Result<(), MalformedChallengeError> {
    let Some(list) = options.get_mut(key) else {
        return Ok(());
    };
    let CredentialValue::Sequence(descriptors) = list else {
        return Err(MalformedChallengeError::new(key, "expected an array"));
    };

    for (index, descriptor) in descriptors.iter_mut().enumerate() {
        let CredentialValue::Record(descriptor) = descriptor else {
            return Err(MalformedChallengeError::new(
                format!("{key}[{index}]"),
                "expected an object",
            ));
        };
        decode_token(descriptor, "id", || format!("{key}[{index}].id"))?;
    }

    Ok(())
}

fn decode_token<P>(
    record: &mut IndexMap<String, CredentialValue>,
    key: &str,
    path: P,
) -> Result<(), MalformedChallengeError>
where
    P: Fn() -> String,
{
    let slot = record
        .get_mut(key)
        .ok_or_else(|| MalformedChallengeError::new(path(), "missing field"))?;
    let CredentialValue::String(token) = slot else {
        return Err(MalformedChallengeError::new(
            path(),
            "expected a base64url string",
        ));
    };
    let bytes = passage_codec::decode(token.as_str())
        .map_err(|error| MalformedChallengeError::new(path(), error.to_string()))?;
    *slot = CredentialValue::Bytes(bytes);
    Ok(())
}
