//! Password verification against stored encryption dictionary values.
//!
//! Each routine returns `Ok(Some(key))` when the password checks out,
//! `Ok(None)` when it does not, and an error only for malformed inputs.
//! Wrong passwords are an expected outcome, not a failure.

use log::warn;
use md5::{Digest, Md5};
use zeroize::Zeroizing;

use crate::crypto::rc4;
use crate::error::{PdfCryptoError, PdfCryptoResult};
use crate::pdf::EncryptionDictionary;
use crate::security::key_derivation::{
    compute_encryption_key, compute_owner_encryption_key_r6, compute_owner_password_hash_r6,
    compute_user_encryption_key_r6, compute_user_password_hash_r6, compute_user_value,
    pad_password, validate_permissions_value,
};

/// Constant-time byte comparison for password verification values.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Algorithm 6: verify a user password for revisions 2 through 4.
///
/// Revision 2 compares the full 32-byte U value; revision 3 and 4 compare
/// only the first 16 bytes.
pub(crate) fn authenticate_user_r4(
    dict: &EncryptionDictionary,
    file_id: &[u8],
    password: &[u8],
) -> PdfCryptoResult<Option<Zeroizing<Vec<u8>>>> {
    let key_length = dict.key_length_bytes();
    let key = compute_encryption_key(
        password,
        &dict.o,
        dict.p,
        file_id,
        dict.r,
        key_length,
        dict.encrypt_metadata,
    )?;
    let expected = compute_user_value(
        password,
        &dict.o,
        dict.p,
        file_id,
        dict.r,
        key_length,
        dict.encrypt_metadata,
    )?;

    let compare_len = if dict.r == 2 { 32 } else { 16 };
    if dict.u.len() >= compare_len
        && constant_time_eq(&expected[..compare_len], &dict.u[..compare_len])
    {
        Ok(Some(key))
    } else {
        Ok(None)
    }
}

/// Algorithm 7: verify an owner password for revisions 2 through 4 by
/// recovering the user password from the O value, then running the user
/// check on it.
pub(crate) fn authenticate_owner_r4(
    dict: &EncryptionDictionary,
    file_id: &[u8],
    password: &[u8],
) -> PdfCryptoResult<Option<Zeroizing<Vec<u8>>>> {
    let key_length = dict.key_length_bytes();
    if key_length > 16 {
        return Err(PdfCryptoError::UnsupportedKeyLength(key_length * 8));
    }

    let mut hash = Md5::digest(pad_password(password));
    if dict.r >= 3 {
        for _ in 0..50 {
            hash = Md5::digest(hash);
        }
    }
    let rc4_key = &hash[..key_length];

    // Undo the encryption rounds of Algorithm 3 in reverse order.
    let mut user_password = Zeroizing::new(dict.o.clone());
    if dict.r >= 3 {
        let mut round_key = vec![0u8; key_length];
        for i in (1..=19u8).rev() {
            for (key_byte, round_byte) in rc4_key.iter().zip(round_key.iter_mut()) {
                *round_byte = key_byte ^ i;
            }
            *user_password = rc4(&round_key, &user_password)?;
        }
    }
    *user_password = rc4(rc4_key, &user_password)?;

    authenticate_user_r4(dict, file_id, &user_password)
}

/// Algorithm 11: verify a user password for revisions 5 and 6 and unwrap
/// the file key from UE.
pub(crate) fn authenticate_user_r6(
    dict: &EncryptionDictionary,
    password: &[u8],
) -> PdfCryptoResult<Option<Zeroizing<Vec<u8>>>> {
    let hash = compute_user_password_hash_r6(password, &dict.u, dict.r)?;
    if !constant_time_eq(&hash, &dict.u[..32]) {
        return Ok(None);
    }

    let user_encrypted = dict
        .ue
        .as_deref()
        .ok_or_else(|| PdfCryptoError::MissingDictionaryEntry("UE".to_string()))?;
    let key = compute_user_encryption_key_r6(password, &dict.u, user_encrypted, dict.r)?;

    check_perms(dict, &key)?;
    Ok(Some(key))
}

/// Algorithm 12: verify an owner password for revisions 5 and 6 and unwrap
/// the file key from OE.
pub(crate) fn authenticate_owner_r6(
    dict: &EncryptionDictionary,
    password: &[u8],
) -> PdfCryptoResult<Option<Zeroizing<Vec<u8>>>> {
    let hash = compute_owner_password_hash_r6(password, &dict.o, &dict.u, dict.r)?;
    if !constant_time_eq(&hash, &dict.o[..32]) {
        return Ok(None);
    }

    let owner_encrypted = dict
        .oe
        .as_deref()
        .ok_or_else(|| PdfCryptoError::MissingDictionaryEntry("OE".to_string()))?;
    let key =
        compute_owner_encryption_key_r6(password, &dict.o, &dict.u, owner_encrypted, dict.r)?;

    check_perms(dict, &key)?;
    Ok(Some(key))
}

/// A Perms mismatch is logged but does not reject the password; tampering
/// with P does not deny access to someone who knows the password.
fn check_perms(dict: &EncryptionDictionary, key: &[u8]) -> PdfCryptoResult<()> {
    if let Some(perms) = dict.perms.as_deref() {
        if !validate_permissions_value(perms, dict.p, dict.encrypt_metadata, key)? {
            warn!("Perms entry does not match P and EncryptMetadata; continuing");
        }
    }
    Ok(())
}
