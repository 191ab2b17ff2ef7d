use thiserror::Error;

/// Reasons a token can fail to decode.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base64UrlDecodeError {
    /// The byte at `position` is not part of the URL-safe alphabet.
    ///
    /// Padding (`=`) and the standard alphabet's `+` and `/` land here too.
    #[error("Invalid base64url symbol {symbol:#04x} at position {position}")]
    InvalidSymbol {
        /// Zero-based byte offset into the token
        position: usize,
        /// The offending byte
        symbol: u8,
    },

    /// The token ends in a group of a single symbol, which carries only six
    /// bits and so cannot describe a whole byte.
    #[error("Invalid base64url token length {length}")]
    InvalidLength {
        /// Length of the rejected token
        length: usize,
    },
}
