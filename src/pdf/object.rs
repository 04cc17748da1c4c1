//! String, stream and object-id types handled by the decryptor

use super::Dictionary;

/// Identifier of an indirect object: object number and generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    /// Object number
    pub number: u32,
    /// Generation number
    pub generation: u16,
}

impl ObjectId {
    /// Create new object id
    pub fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }
}

/// Whether a string was written in literal or hexadecimal form.
///
/// The flag only affects serialization; decryption preserves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Literal,
    Hexadecimal,
}

/// A PDF string value as raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfString {
    /// Raw string bytes (ciphertext or plaintext)
    pub data: Vec<u8>,
    /// Literal/hex form of the source string
    pub format: StringFormat,
}

impl PdfString {
    /// Create new literal string
    pub fn literal(data: Vec<u8>) -> Self {
        Self {
            data,
            format: StringFormat::Literal,
        }
    }

    /// Create new hexadecimal string
    pub fn hexadecimal(data: Vec<u8>) -> Self {
        Self {
            data,
            format: StringFormat::Hexadecimal,
        }
    }
}

/// A PDF stream: its dictionary plus the raw body bytes.
///
/// The body is still filter-encoded; decryption replaces only the body and
/// leaves the dictionary (including its Filter chain) untouched for the
/// downstream filter pipeline.
#[derive(Debug, Clone)]
pub struct PdfStream {
    /// Stream dictionary
    pub dictionary: Dictionary,
    /// Raw stream body
    pub data: Vec<u8>,
}

impl PdfStream {
    /// Create new stream
    pub fn new(dictionary: Dictionary, data: Vec<u8>) -> Self {
        Self { dictionary, data }
    }
}
