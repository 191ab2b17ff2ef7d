//! How the ceremony client reaches the relying party.
//!
//! A [`Transport`] sends JSON to a path and hands back the raw status and
//! body; deciding what a status means is the ceremony client's job. The
//! bundled [`HttpTransport`] does this over HTTP with `reqwest`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::MaybeSync;

mod http;
pub use http::*;

/// Raised when a request could not be carried out at all.
///
/// A response with an error status is *not* a transport error; it arrives as
/// an ordinary [`TransportResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The configured origin is not an absolute URL.
    #[error("Invalid relying party origin '{origin}': {reason}")]
    InvalidOrigin {
        /// The configured origin
        origin: String,
        /// Why it could not be parsed
        reason: String,
    },

    /// The underlying HTTP client could not be built.
    #[error("Could not set up the HTTP client: {reason}")]
    ClientSetup {
        /// The builder's failure
        reason: String,
    },

    /// The path could not be resolved against the transport's origin.
    #[error("Invalid request URL for '{path}': {reason}")]
    InvalidUrl {
        /// The requested path
        path: String,
        /// Why it could not be resolved
        reason: String,
    },

    /// The request failed before a response was received.
    #[error("Request to '{path}' failed: {reason}")]
    RequestFailed {
        /// The requested path
        path: String,
        /// The underlying failure
        reason: String,
    },
}

/// A status code plus the unparsed response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    status: u16,
    body: Vec<u8>,
}

impl TransportResponse {
    /// Create a response from its parts.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Create a response whose body is the serialized `body`.
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Parse the body as JSON.
    pub fn parse<T>(&self) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(&self.body)
    }
}

/// Sends requests to the relying party.
///
/// Implementations must include credentials (cookies) with every request:
/// the relying party ties the challenge it issues to the session that
/// submits the response.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Transport: MaybeSync {
    /// `POST` `body` to `path` with `Content-Type: application/json`.
    async fn post_json(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<TransportResponse, TransportError>;

    /// `GET` `path` without a body.
    async fn get(&self, path: &str) -> Result<TransportResponse, TransportError>;
}
