//! Group-wise transcoding between bytes and the URL-safe alphabet.
//!
//! Every 3 input bytes become 4 six-bit symbols:
//!
//! ```text
//!  byte 0          byte 1          byte 2
//! +---------------+---------------+---------------+
//! |7 6 5 4 3 2 1 0|7 6 5 4 3 2 1 0|7 6 5 4 3 2 1 0|
//! +-----------+---+-------+-------+---+-----------+
//! | symbol 0  | symbol 1  | symbol 2  | symbol 3  |
//! +-----------+-----------+-----------+-----------+
//! ```
//!
//! A trailing group of 1 byte yields 2 symbols and a trailing group of 2
//! bytes yields 3; the symbols that would only hold zero bits are dropped
//! instead of being replaced by padding.
//!
//! The bit work is done by a `base64` engine configured for exactly this
//! dialect; this module adds the alphabet checks and error positions the
//! ceremony client reports.

use base64::{
    DecodeError, Engine,
    alphabet::URL_SAFE,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

use crate::Base64UrlDecodeError;

/// The 64 symbols, indexed by their six-bit value.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// URL-safe alphabet, no padding on either side, unused trailing bits
/// tolerated.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Length of the token that [`encode`] produces for `len` input bytes.
pub const fn encoded_len(len: usize) -> usize {
    let remainder = len % 3;
    let tail = if remainder == 0 { 0 } else { remainder + 1 };
    (len / 3) * 4 + tail
}

/// Number of bytes a token of `len` symbols decodes to, or [`None`] when no
/// byte count encodes to that length.
pub const fn decoded_len(len: usize) -> Option<usize> {
    let tail = match len % 4 {
        0 => 0,
        2 => 1,
        3 => 2,
        _ => return None,
    };
    Some((len / 4) * 3 + tail)
}

/// Returns true when `symbol` belongs to the URL-safe alphabet.
pub const fn is_alphabet_symbol(symbol: u8) -> bool {
    matches!(symbol, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_')
}

/// Encode bytes as an unpadded base64url token.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    ENGINE.encode(bytes)
}

/// Decode an unpadded base64url token.
///
/// # Errors
///
/// Fails with [`Base64UrlDecodeError::InvalidSymbol`] when the token contains
/// a byte outside the alphabet, and otherwise with
/// [`Base64UrlDecodeError::InvalidLength`] when the final group holds a
/// single symbol. A bad symbol is reported even when the length is also
/// wrong, so padding always surfaces as a symbol error.
pub fn decode(token: impl AsRef<[u8]>) -> Result<Vec<u8>, Base64UrlDecodeError> {
    let token = token.as_ref();

    if let Some(position) = token.iter().position(|symbol| !is_alphabet_symbol(*symbol)) {
        return Err(Base64UrlDecodeError::InvalidSymbol {
            position,
            symbol: token[position],
        });
    }

    if decoded_len(token.len()).is_none() {
        return Err(Base64UrlDecodeError::InvalidLength {
            length: token.len(),
        });
    }

    ENGINE.decode(token).map_err(|error| match error {
        DecodeError::InvalidByte(position, symbol) => {
            Base64UrlDecodeError::InvalidSymbol { position, symbol }
        }
        _ => Base64UrlDecodeError::InvalidLength {
            length: token.len(),
        },
    })
}
