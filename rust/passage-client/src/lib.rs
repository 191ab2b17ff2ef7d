#![warn(missing_docs)]

//! Passage Client - WebAuthn ceremonies over a JSON relying party
//!
//! A relying party issues WebAuthn challenges as JSON, with every binary
//! field carried as an unpadded base64url token. The platform credential API
//! speaks only in buffers. The [`CeremonyClient`] sits between the two and
//! drives a whole ceremony:
//!
//! 1. POST the user's form to the challenge endpoint,
//! 2. decode the token fields into a [`CeremonyRequest`],
//! 3. hand it to a [`CredentialCapability`] (`create` or `get`),
//! 4. encode every buffer in the resulting [`CredentialValue`] back to a
//!    token,
//! 5. POST the result to the response endpoint and return the verdict.
//!
//! The relying party is reached through a [`Transport`] ([`HttpTransport`]
//! is provided), and endpoint paths come from a [`CeremonyConfig`].
//!
//! Every operation returns a [`Result`]; a failed ceremony is an
//! [`Err`] carrying a [`CeremonyError`], and is also logged with `tracing`.
//!
//! On `wasm32-unknown-unknown`, `NavigatorCredentials` implements the
//! capability with `navigator.credentials`, and the `web` module exposes the
//! client to JavaScript.

mod platform;
pub use platform::*;

mod value;
pub use value::*;

mod request;
pub use request::*;

mod capability;
pub use capability::*;

mod transport;
pub use transport::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod client;
pub use client::*;

mod random;
pub use random::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod web;
