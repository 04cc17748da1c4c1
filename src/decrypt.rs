//! Authentication outcomes and per-object string/stream decryption.

use log::debug;
use zeroize::Zeroizing;

use crate::crypto::{decrypt_aes128, decrypt_aes256, encrypt_aes128, encrypt_aes256, rc4};
use crate::error::{PdfCryptoError, PdfCryptoResult};
use crate::pdf::{EncryptionDictionary, ObjectId, PdfStream, PdfString};
use crate::permissions::Permissions;
use crate::security::compute_object_key;
use crate::EncryptionMethod;

/// How far password authentication got on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// The document carries no encryption dictionary.
    NotEncrypted,
    /// Encrypted, and no supplied password was accepted.
    Encrypted,
    /// The user password was accepted.
    UserAccess,
    /// The owner password was accepted.
    OwnerAccess,
}

/// Outcome of an authentication attempt, carrying the established file key
/// when a password was accepted.
///
/// A wrong password is a value, not an error: it yields a result with
/// [`AccessLevel::Encrypted`] and no key.
#[derive(Debug, Clone)]
pub struct DecryptionResult {
    access_level: AccessLevel,
    key_length: usize,
    permissions: Permissions,
    string_method: EncryptionMethod,
    stream_method: EncryptionMethod,
    encryption_key: Option<Zeroizing<Vec<u8>>>,
    dictionary: Option<EncryptionDictionary>,
}

impl DecryptionResult {
    /// Result for a document with no encryption dictionary: full
    /// permissions, no key material.
    pub fn not_encrypted() -> Self {
        DecryptionResult {
            access_level: AccessLevel::NotEncrypted,
            key_length: 0,
            // Every defined permission bit, reserved bits 6 and 7 included.
            permissions: Permissions::from_bits_retain(0b1111_1111_1100),
            string_method: EncryptionMethod::None,
            stream_method: EncryptionMethod::None,
            encryption_key: None,
            dictionary: None,
        }
    }

    /// Result for an encrypted document no supplied password unlocked.
    pub(crate) fn failed(dict: &EncryptionDictionary) -> Self {
        DecryptionResult {
            access_level: AccessLevel::Encrypted,
            key_length: dict.key_length_bits() as usize,
            permissions: Permissions::empty(),
            string_method: EncryptionMethod::None,
            stream_method: EncryptionMethod::None,
            encryption_key: None,
            dictionary: None,
        }
    }

    pub(crate) fn granted(
        access_level: AccessLevel,
        dict: &EncryptionDictionary,
        key: Zeroizing<Vec<u8>>,
    ) -> PdfCryptoResult<Self> {
        Ok(DecryptionResult {
            access_level,
            key_length: dict.key_length_bits() as usize,
            permissions: Permissions::from_p_value(dict.p),
            string_method: dict.string_method()?,
            stream_method: dict.stream_method()?,
            encryption_key: Some(key),
            dictionary: Some(dict.clone()),
        })
    }

    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    /// True when a password was accepted and a file key is available.
    pub fn is_authenticated(&self) -> bool {
        matches!(
            self.access_level,
            AccessLevel::UserAccess | AccessLevel::OwnerAccess
        )
    }

    /// File encryption key length in bits; 0 for an unencrypted document.
    pub fn key_length(&self) -> usize {
        self.key_length
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Cipher applied to strings, per the dictionary's StrF filter.
    pub fn string_method(&self) -> EncryptionMethod {
        self.string_method
    }

    /// Cipher applied to streams, per the dictionary's StmF filter.
    pub fn stream_method(&self) -> EncryptionMethod {
        self.stream_method
    }

    pub fn encryption_key(&self) -> Option<&[u8]> {
        self.encryption_key.as_deref().map(Vec::as_slice)
    }

    /// Build a decryptor from the established key.
    ///
    /// Fails with [`PdfCryptoError::NotEncrypted`] when the document is not
    /// encrypted and with [`PdfCryptoError::NoDecryptionKey`] when no
    /// password was accepted.
    pub fn get_decryptor(&self) -> PdfCryptoResult<PasswordDecryptor> {
        match self.access_level {
            AccessLevel::NotEncrypted => Err(PdfCryptoError::NotEncrypted),
            AccessLevel::Encrypted => Err(PdfCryptoError::NoDecryptionKey),
            AccessLevel::UserAccess | AccessLevel::OwnerAccess => {
                let dict = self
                    .dictionary
                    .as_ref()
                    .ok_or(PdfCryptoError::NoDecryptionKey)?;
                let key = self
                    .encryption_key
                    .as_ref()
                    .ok_or(PdfCryptoError::NoDecryptionKey)?;
                PasswordDecryptor::new(dict, key)
            }
        }
    }
}

/// Decrypts and encrypts strings and streams under an established file key,
/// deriving per-object keys where the revision calls for them.
#[derive(Debug, Clone)]
pub struct PasswordDecryptor {
    revision: u8,
    string_method: EncryptionMethod,
    stream_method: EncryptionMethod,
    file_key: Zeroizing<Vec<u8>>,
}

impl PasswordDecryptor {
    /// Build a decryptor from a validated dictionary and a non-empty file
    /// key. Crypt filter methods are resolved once here.
    pub fn new(dict: &EncryptionDictionary, file_key: &[u8]) -> PdfCryptoResult<Self> {
        if file_key.is_empty() {
            return Err(PdfCryptoError::EmptyFileKey);
        }
        let string_method = dict.string_method()?;
        let stream_method = dict.stream_method()?;
        debug!(
            "Decryptor ready: revision {}, strings {}, streams {}",
            dict.r, string_method, stream_method
        );
        Ok(PasswordDecryptor {
            revision: dict.r,
            string_method,
            stream_method,
            file_key: Zeroizing::new(file_key.to_vec()),
        })
    }

    pub fn string_method(&self) -> EncryptionMethod {
        self.string_method
    }

    pub fn stream_method(&self) -> EncryptionMethod {
        self.stream_method
    }

    /// Decrypt a string belonging to the given object. The string format
    /// flag is preserved.
    pub fn decrypt_string(&self, string: &PdfString, id: ObjectId) -> PdfCryptoResult<PdfString> {
        let data = self.apply(&string.data, id, self.string_method, true)?;
        Ok(PdfString {
            data,
            format: string.format,
        })
    }

    /// Encrypt a string belonging to the given object.
    pub fn encrypt_string(&self, string: &PdfString, id: ObjectId) -> PdfCryptoResult<PdfString> {
        let data = self.apply(&string.data, id, self.string_method, false)?;
        Ok(PdfString {
            data,
            format: string.format,
        })
    }

    /// Decrypt a stream's data. The stream dictionary passes through
    /// untouched.
    pub fn decrypt_stream(&self, stream: &PdfStream, id: ObjectId) -> PdfCryptoResult<PdfStream> {
        let data = self.apply(&stream.data, id, self.stream_method, true)?;
        Ok(PdfStream {
            dictionary: stream.dictionary.clone(),
            data,
        })
    }

    /// Encrypt a stream's data.
    pub fn encrypt_stream(&self, stream: &PdfStream, id: ObjectId) -> PdfCryptoResult<PdfStream> {
        let data = self.apply(&stream.data, id, self.stream_method, false)?;
        Ok(PdfStream {
            dictionary: stream.dictionary.clone(),
            data,
        })
    }

    fn apply(
        &self,
        data: &[u8],
        id: ObjectId,
        method: EncryptionMethod,
        decrypt: bool,
    ) -> PdfCryptoResult<Vec<u8>> {
        if data.is_empty() || method == EncryptionMethod::None {
            return Ok(data.to_vec());
        }
        match method {
            EncryptionMethod::None => Ok(data.to_vec()),
            EncryptionMethod::Rc4 => {
                if self.revision >= 5 {
                    rc4(&self.file_key, data)
                } else {
                    let object_key =
                        compute_object_key(&self.file_key, id.number, id.generation, false);
                    rc4(&object_key, data)
                }
            }
            EncryptionMethod::Aes => {
                // Revision 5 and 6 use the file key for every object.
                if self.revision >= 5 {
                    if decrypt {
                        decrypt_aes256(&self.file_key, data)
                    } else {
                        encrypt_aes256(&self.file_key, data)
                    }
                } else {
                    let object_key =
                        compute_object_key(&self.file_key, id.number, id.generation, true);
                    if decrypt {
                        decrypt_aes128(&object_key, data)
                    } else {
                        encrypt_aes128(&object_key, data)
                    }
                }
            }
        }
    }
}
