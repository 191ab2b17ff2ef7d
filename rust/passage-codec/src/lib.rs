#![warn(missing_docs)]

//! Passage Codec - unpadded base64url for ceremony payloads
//!
//! WebAuthn relying parties speak JSON, while the browser's credential API
//! only accepts and produces raw buffers. This crate is the bridge between
//! the two: it encodes arbitrary bytes over the URL-safe alphabet
//! `A-Z a-z 0-9 - _` and never emits padding.
//!
//! ```rust
//! use passage_codec::{decode, encode};
//!
//! let token = encode(b"foobar");
//! assert_eq!(token, "Zm9vYmFy");
//! assert_eq!(decode(&token).unwrap(), b"foobar");
//!
//! // Partial trailing groups are emitted without `=` characters
//! assert_eq!(encode([0x41]), "QQ");
//! ```
//!
//! Decoding is validating: a token containing a symbol outside the alphabet
//! (padding included), or one whose final group holds a single symbol, is
//! rejected with a [`Base64UrlDecodeError`]. Unused low bits in a final
//! partial group are ignored.
//!
//! For types that carry binary fields over JSON, [`Base64UrlBytes`] and the
//! [`serde_token`] helper module serialize bytes as tokens.

mod error;
pub use error::*;

mod codec;
pub use codec::*;

mod bytes;
pub use bytes::*;

pub mod serde_token;
