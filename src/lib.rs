//! PDF Standard Security Handler for Rust
//!
//! Password-based PDF encryption and decryption covering security handler
//! revisions 2 through 6: RC4 with 40 to 128 bit keys, AES-128-CBC and
//! AES-256-CBC, user and owner password authentication, and per-object
//! string and stream decryption.
//!
//! ```no_run
//! use pdf_security::{AccessLevel, EncryptionDictionary, StandardSecurityHandler};
//!
//! # fn main() -> Result<(), pdf_security::PdfCryptoError> {
//! # let dict = EncryptionDictionary::default();
//! # let file_id = Vec::new();
//! let handler = StandardSecurityHandler::new(dict, file_id)?;
//! let result = handler.authenticate(b"password")?;
//! if result.is_authenticated() {
//!     let decryptor = result.get_decryptor()?;
//!     // decrypt strings and streams with `decryptor`
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;

mod decrypt;
mod error;
mod handlers;
mod permissions;

pub mod crypto;
pub mod pdf;
pub mod security;

pub use decrypt::{AccessLevel, DecryptionResult, PasswordDecryptor};
pub use error::{PdfCryptoError, PdfCryptoResult};
pub use handlers::StandardSecurityHandler;
pub use pdf::{
    CryptFilter, Dictionary, EncryptionDictionary, ObjectId, PdfStream, PdfString, StringFormat,
    Value,
};
pub use permissions::Permissions;

/// Cipher a crypt filter resolves to for strings or streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionMethod {
    /// Identity filter: data passes through unchanged.
    None,
    /// RC4 with a per-object key of 40 to 128 bits.
    Rc4,
    /// AES in CBC mode: 128-bit per-object keys up to revision 4,
    /// the 256-bit file key from revision 5 on.
    Aes,
}

impl fmt::Display for EncryptionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptionMethod::None => write!(f, "None"),
            EncryptionMethod::Rc4 => write!(f, "RC4"),
            EncryptionMethod::Aes => write!(f, "AES"),
        }
    }
}
