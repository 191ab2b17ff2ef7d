//! The platform's credential API, seen from the ceremony client.
//!
//! In a browser this is `navigator.credentials` (see [`NavigatorCredentials`],
//! available on `wasm32-unknown-unknown`). Anywhere else it can be any
//! authenticator front-end that accepts decoded options and produces a
//! credential tree.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{CeremonyRequest, CredentialValue, MaybeSync};

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod navigator;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub use navigator::NavigatorCredentials;

/// The platform declined or failed to produce a credential.
///
/// The ceremony client carries this error to its caller untouched. `name`
/// mirrors the `DOMException` name a browser reports (`NotAllowedError` when
/// the user cancels, `InvalidStateError` for an excluded authenticator, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct CapabilityError {
    name: String,
    message: String,
}

impl CapabilityError {
    /// Create an error with a `DOMException`-style name and a message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The credential API is not present in this environment.
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::new("NotSupportedError", message)
    }

    /// The error name, e.g. `NotAllowedError`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Creates and asserts public-key credentials.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait CredentialCapability: MaybeSync {
    /// Create a new credential from registration options.
    async fn create(&self, request: CeremonyRequest) -> Result<CredentialValue, CapabilityError>;

    /// Produce an assertion from authentication options.
    async fn get(&self, request: CeremonyRequest) -> Result<CredentialValue, CapabilityError>;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<C> CredentialCapability for Arc<C>
where
    C: CredentialCapability + ?Sized,
{
    async fn create(&self, request: CeremonyRequest) -> Result<CredentialValue, CapabilityError> {
        (**self).create(request).await
    }

    async fn get(&self, request: CeremonyRequest) -> Result<CredentialValue, CapabilityError> {
        (**self).get(request).await
    }
}
