//! The shape of data exchanged with the credential capability.
//!
//! A [`CredentialValue`] is JSON with one extra leaf kind, raw bytes. Values
//! flowing *into* the capability carry bytes where the relying party sent
//! base64url tokens; values flowing *out* of it may carry bytes at any depth,
//! and [`CredentialValue::into_json`] turns every one of them back into a
//! token.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

/// A JSON-like tree whose leaves may also be byte buffers.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialValue {
    /// `null`
    Null,
    /// A boolean
    Bool(bool),
    /// A JSON number
    Number(Number),
    /// A string
    String(String),
    /// A raw byte buffer
    Bytes(Vec<u8>),
    /// An ordered sequence
    Sequence(Vec<CredentialValue>),
    /// String keys to values, in insertion order
    Record(IndexMap<String, CredentialValue>),
}

impl CredentialValue {
    /// Replace every [`CredentialValue::Bytes`] leaf with its base64url token,
    /// keeping sequence order, record keys and all other leaves as they are.
    pub fn into_json(self) -> Value {
        match self {
            CredentialValue::Null => Value::Null,
            CredentialValue::Bool(value) => Value::Bool(value),
            CredentialValue::Number(value) => Value::Number(value),
            CredentialValue::String(value) => Value::String(value),
            CredentialValue::Bytes(bytes) => Value::String(passage_codec::encode(bytes)),
            CredentialValue::Sequence(items) => {
                Value::Array(items.into_iter().map(CredentialValue::into_json).collect())
            }
            CredentialValue::Record(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    /// Look up `key` when this value is a record.
    pub fn get(&self, key: &str) -> Option<&CredentialValue> {
        match self {
            CredentialValue::Record(entries) => entries.get(key),
            _ => None,
        }
    }

    /// The bytes of a [`CredentialValue::Bytes`] leaf.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            CredentialValue::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The text of a [`CredentialValue::String`] leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CredentialValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// The items of a [`CredentialValue::Sequence`].
    pub fn as_sequence(&self) -> Option<&[CredentialValue]> {
        match self {
            CredentialValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The entries of a [`CredentialValue::Record`].
    pub fn as_record(&self) -> Option<&IndexMap<String, CredentialValue>> {
        match self {
            CredentialValue::Record(entries) => Some(entries),
            _ => None,
        }
    }
}

/// JSON carries no bytes, so strings stay strings.
impl From<Value> for CredentialValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CredentialValue::Null,
            Value::Bool(value) => CredentialValue::Bool(value),
            Value::Number(value) => CredentialValue::Number(value),
            Value::String(value) => CredentialValue::String(value),
            Value::Array(items) => {
                CredentialValue::Sequence(items.into_iter().map(CredentialValue::from).collect())
            }
            Value::Object(entries) => CredentialValue::Record(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, CredentialValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<CredentialValue> for Value {
    fn from(value: CredentialValue) -> Self {
        value.into_json()
    }
}

impl From<Vec<u8>> for CredentialValue {
    fn from(value: Vec<u8>) -> Self {
        CredentialValue::Bytes(value)
    }
}

impl From<&[u8]> for CredentialValue {
    fn from(value: &[u8]) -> Self {
        CredentialValue::Bytes(value.to_vec())
    }
}

impl From<String> for CredentialValue {
    fn from(value: String) -> Self {
        CredentialValue::String(value)
    }
}

impl From<&str> for CredentialValue {
    fn from(value: &str) -> Self {
        CredentialValue::String(value.to_owned())
    }
}

impl From<bool> for CredentialValue {
    fn from(value: bool) -> Self {
        CredentialValue::Bool(value)
    }
}

impl From<Vec<CredentialValue>> for CredentialValue {
    fn from(value: Vec<CredentialValue>) -> Self {
        CredentialValue::Sequence(value)
    }
}

impl<K> FromIterator<(K, CredentialValue)> for CredentialValue
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, CredentialValue)>>(iter: I) -> Self {
        CredentialValue::Record(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }
}
