//! Error types for PDF security operations

use thiserror::Error;

/// Main error type for PDF security operations
#[derive(Error, Debug)]
pub enum PdfCryptoError {
    /// Missing required dictionary entry
    #[error("Missing required dictionary entry: {0}")]
    MissingDictionaryEntry(String),

    /// Malformed encryption dictionary
    #[error("Malformed encryption dictionary: {0}")]
    MalformedDictionary(String),

    /// Empty file encryption key supplied to a decryptor
    #[error("File encryption key must not be empty")]
    EmptyFileKey,

    /// Empty RC4 key (the key schedule modulus is the key length)
    #[error("RC4 key must not be empty")]
    EmptyRc4Key,

    /// Invalid key length for a cipher
    #[error("Invalid key length for {cipher}: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        cipher: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Unsupported key length
    #[error("Unsupported key length: {0}")]
    UnsupportedKeyLength(usize),

    /// AES ciphertext too short to hold an IV, or not block aligned
    #[error("Invalid AES ciphertext length: {0}")]
    InvalidCiphertextLength(usize),

    /// Invalid PKCS#7 padding after decryption
    #[error("Invalid PKCS#7 padding")]
    InvalidPadding,

    /// Stored dictionary value has the wrong length for its revision
    #[error("Invalid length for {field}: expected {expected} bytes, got {actual}")]
    InvalidValueLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Decryptor requested for a document that is not encrypted
    #[error("Document is not encrypted")]
    NotEncrypted,

    /// Decryptor requested before a password authentication succeeded
    #[error("No decryption key established: password authentication has not succeeded")]
    NoDecryptionKey,

    /// Unsupported encryption filter
    #[error("Unsupported encryption filter: {0}")]
    UnsupportedFilter(String),

    /// Unsupported algorithm version
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u8),

    /// Unsupported encryption revision
    #[error("Unsupported revision: {0}")]
    UnsupportedRevision(u8),

    /// StmF/StrF names a crypt filter that is absent from CF
    #[error("Unknown crypt filter: {0}")]
    UnknownCryptFilter(String),

    /// Unknown CFM method name in a crypt filter
    #[error("Unsupported crypt filter method: {0}")]
    UnsupportedCryptFilterMethod(String),
}

/// Result type for PDF security operations
pub type PdfCryptoResult<T> = Result<T, PdfCryptoError>;

impl PdfCryptoError {
    /// Check if error reports a missing or degenerate input
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::MissingDictionaryEntry(_)
                | Self::MalformedDictionary(_)
                | Self::EmptyFileKey
                | Self::EmptyRc4Key
        )
    }

    /// Check if error is a dedicated encryption failure
    pub fn is_encryption_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidKeyLength { .. }
                | Self::UnsupportedKeyLength(_)
                | Self::InvalidCiphertextLength(_)
                | Self::InvalidPadding
                | Self::InvalidValueLength { .. }
                | Self::NotEncrypted
                | Self::NoDecryptionKey
                | Self::UnsupportedFilter(_)
                | Self::UnsupportedVersion(_)
                | Self::UnsupportedRevision(_)
                | Self::UnknownCryptFilter(_)
                | Self::UnsupportedCryptFilterMethod(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categorization() {
        let arg_err = PdfCryptoError::EmptyRc4Key;
        assert!(arg_err.is_invalid_argument());
        assert!(!arg_err.is_encryption_error());

        let enc_err = PdfCryptoError::InvalidCiphertextLength(8);
        assert!(enc_err.is_encryption_error());
        assert!(!enc_err.is_invalid_argument());
    }

    #[test]
    fn test_error_display() {
        let err = PdfCryptoError::InvalidKeyLength {
            cipher: "AES-128",
            expected: 16,
            actual: 24,
        };
        assert_eq!(
            err.to_string(),
            "Invalid key length for AES-128: expected 16 bytes, got 24"
        );

        let err = PdfCryptoError::NotEncrypted;
        assert!(err.to_string().contains("not encrypted"));

        let err = PdfCryptoError::NoDecryptionKey;
        assert!(err.to_string().contains("No decryption key"));
    }
}
