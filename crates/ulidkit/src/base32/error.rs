use thiserror::Error;

/// Errors produced while decoding Crockford base32 text.
#[derive(Error, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Base32Error {
    /// The input does not have the fixed length of the target field.
    #[error("invalid length: expected {expected} characters, got {len}")]
    InvalidLength { len: usize, expected: usize },

    /// The input contains a byte outside the Crockford alphabet.
    #[error("invalid base32 byte 0x{byte:02x} at index {index}")]
    InvalidAscii { byte: u8, index: usize },

    /// The padding bits of the character at `index` are set, so the value does
    /// not fit the field (anything above `7ZZZZZZZZZZZZZZZZZZZZZZZZZ`).
    #[error("base32 value overflows the field at index {index}")]
    Overflow { index: usize },
}
