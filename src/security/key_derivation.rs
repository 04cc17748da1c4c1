//! Key derivation for the Standard Security Handler
//!
//! Implements the password-padding and MD5-based derivation used by
//! revisions 2 through 4 (Algorithms 1 through 5), the iterative SHA-2 hash
//! of revisions 5 and 6 (Algorithms 2.A/2.B), the writer-side value builders
//! (Algorithms 8 through 10) and the Perms validation (Algorithm 13). All
//! functions are pure; derived keys are returned in zeroizing buffers.

use md5::{Digest, Md5};
use rand::{thread_rng, RngCore};
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use crate::crypto::{
    aes128_cbc_encrypt_no_pad, aes256_cbc_zero_iv_decrypt, aes256_cbc_zero_iv_encrypt,
    aes256_ecb_decrypt, aes256_ecb_encrypt, rc4,
};
use crate::error::{PdfCryptoError, PdfCryptoResult};

/// Standard 32-byte password padding string from the format.
pub const PAD_BYTES: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01,
    0x08, 0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53,
    0x69, 0x7A,
];

/// Fixed salt appended to the per-object key input when AES is in use.
const AES_OBJECT_SALT: &[u8; 4] = b"sAlT";

/// Pad or truncate a password to exactly 32 bytes. An empty password yields
/// the padding string itself.
pub fn pad_password(password: &[u8]) -> [u8; 32] {
    let len = password.len().min(32);
    let mut padded = [0u8; 32];
    padded[..len].copy_from_slice(&password[..len]);
    padded[len..].copy_from_slice(&PAD_BYTES[..32 - len]);
    padded
}

/// Algorithm 2: derive the file encryption key from a user password.
///
/// `key_length` is in bytes and is capped at 16 by the MD5 output size.
/// Flipping `encrypt_metadata` changes the result for revision 4 and later.
pub fn compute_encryption_key(
    password: &[u8],
    owner_value: &[u8],
    p: i32,
    file_id: &[u8],
    revision: u8,
    key_length: usize,
    encrypt_metadata: bool,
) -> PdfCryptoResult<Zeroizing<Vec<u8>>> {
    if key_length > 16 {
        return Err(PdfCryptoError::UnsupportedKeyLength(key_length * 8));
    }

    let mut hasher = Md5::new();
    hasher.update(pad_password(password));
    hasher.update(owner_value);
    hasher.update((p as u32).to_le_bytes());
    hasher.update(file_id);
    if revision >= 4 && !encrypt_metadata {
        hasher.update(b"\xff\xff\xff\xff");
    }
    let mut hash = hasher.finalize();

    if revision >= 3 {
        for _ in 0..50 {
            hash = Md5::digest(&hash[..key_length]);
        }
    }

    Ok(Zeroizing::new(hash[..key_length].to_vec()))
}

/// Algorithm 3: compute the 32-byte O value.
///
/// An empty owner password falls back to the user password, so both then
/// derive the same value.
pub fn compute_owner_value(
    owner_password: &[u8],
    user_password: &[u8],
    revision: u8,
    key_length: usize,
) -> PdfCryptoResult<Vec<u8>> {
    if key_length > 16 {
        return Err(PdfCryptoError::UnsupportedKeyLength(key_length * 8));
    }

    let password = if owner_password.is_empty() {
        user_password
    } else {
        owner_password
    };

    let mut hash = Md5::digest(pad_password(password));
    if revision >= 3 {
        for _ in 0..50 {
            hash = Md5::digest(hash);
        }
    }
    let rc4_key = &hash[..key_length];

    let mut value = rc4(rc4_key, &pad_password(user_password))?;
    if revision >= 3 {
        let mut round_key = vec![0u8; key_length];
        for i in 1..=19u8 {
            for (key_byte, round_byte) in rc4_key.iter().zip(round_key.iter_mut()) {
                *round_byte = key_byte ^ i;
            }
            value = rc4(&round_key, &value)?;
        }
    }

    Ok(value)
}

/// Algorithms 4 and 5: compute the 32-byte U value.
///
/// For revision 3 and later only the first 16 bytes carry the verification
/// hash; the trailing 16 bytes are deterministic zero filler, which verifiers
/// never read.
pub fn compute_user_value(
    user_password: &[u8],
    owner_value: &[u8],
    p: i32,
    file_id: &[u8],
    revision: u8,
    key_length: usize,
    encrypt_metadata: bool,
) -> PdfCryptoResult<Vec<u8>> {
    let key = compute_encryption_key(
        user_password,
        owner_value,
        p,
        file_id,
        revision,
        key_length,
        encrypt_metadata,
    )?;

    if revision == 2 {
        return rc4(&key, &PAD_BYTES);
    }

    let mut hasher = Md5::new();
    hasher.update(PAD_BYTES);
    hasher.update(file_id);
    let hash = hasher.finalize();

    let mut encrypted = rc4(&key, &hash[..])?;
    let mut round_key = vec![0u8; key.len()];
    for i in 1..=19u8 {
        for (key_byte, round_byte) in key.iter().zip(round_key.iter_mut()) {
            *round_byte = key_byte ^ i;
        }
        encrypted = rc4(&round_key, &encrypted)?;
    }

    encrypted.resize(32, 0);
    Ok(encrypted)
}

/// Algorithm 1: derive the per-object key from the file key and an object's
/// number and generation. The `aes` flag appends the fixed 4-byte salt.
pub fn compute_object_key(
    file_key: &[u8],
    object_number: u32,
    generation: u16,
    aes: bool,
) -> Zeroizing<Vec<u8>> {
    let mut hasher = Md5::new();
    hasher.update(file_key);
    hasher.update(&object_number.to_le_bytes()[..3]);
    hasher.update(generation.to_le_bytes());
    if aes {
        hasher.update(AES_OBJECT_SALT);
    }
    let hash = hasher.finalize();

    let key_len = (file_key.len() + 5).min(16);
    Zeroizing::new(hash[..key_len].to_vec())
}

/// Normalize a revision 5/6 password: SASLprep for valid UTF-8 input,
/// raw bytes otherwise, truncated to 127 bytes either way.
pub fn sanitize_password_r6(password: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut bytes = match std::str::from_utf8(password) {
        Ok(text) => match stringprep::saslprep(text) {
            Ok(prepared) => prepared.as_bytes().to_vec(),
            Err(_) => password.to_vec(),
        },
        Err(_) => password.to_vec(),
    };
    bytes.truncate(127);
    Zeroizing::new(bytes)
}

/// Algorithm 2.B: the iterative hash of revisions 5 and 6.
///
/// Revision 5 stops after the initial SHA-256. Revision 6 loops: each round
/// AES-128-CBC encrypts 64 repetitions of (password + digest [+ U]) keyed by
/// the previous digest, picks the next hash function from the encrypted
/// block modulo 3, and terminates once at least 64 rounds have run and the
/// block's last byte is small enough.
pub(crate) fn compute_hash_r6(
    password: &[u8],
    salt: &[u8],
    user_value: Option<&[u8]>,
    revision: u8,
) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(password);
    hasher.update(salt);
    if let Some(user_value) = user_value {
        hasher.update(user_value);
    }
    let mut k = hasher.finalize().to_vec();

    if revision == 5 {
        return k;
    }

    let user_len = user_value.map(<[u8]>::len).unwrap_or(0);
    let mut round: u32 = 0;
    loop {
        round += 1;

        let mut k1 = Vec::with_capacity(64 * (password.len() + k.len() + user_len));
        for _ in 0..64 {
            k1.extend_from_slice(password);
            k1.extend_from_slice(&k);
            if let Some(user_value) = user_value {
                k1.extend_from_slice(user_value);
            }
        }

        // 64 repetitions keep K1 block aligned, so no padding is needed.
        aes128_cbc_encrypt_no_pad(&k[..16], &k[16..32], &mut k1);
        let e = k1;

        k = match e[..16].iter().map(|&b| b as u32).sum::<u32>() % 3 {
            0 => Sha256::digest(&e).to_vec(),
            1 => Sha384::digest(&e).to_vec(),
            _ => Sha512::digest(&e).to_vec(),
        };

        let last = *e.last().unwrap_or(&0) as u32;
        if round >= 64 && last <= round - 32 {
            break;
        }
    }

    k.truncate(32);
    k
}

fn r6_salts<'a>(
    value: &'a [u8],
    field: &'static str,
) -> PdfCryptoResult<(&'a [u8], &'a [u8])> {
    if value.len() != 48 {
        return Err(PdfCryptoError::InvalidValueLength {
            field,
            expected: 48,
            actual: value.len(),
        });
    }
    Ok((&value[32..40], &value[40..48]))
}

/// Revision 5/6 user validation hash over the salt embedded in the stored
/// 48-byte U value. Matches the first 32 bytes of U for the right password.
pub fn compute_user_password_hash_r6(
    password: &[u8],
    user_value: &[u8],
    revision: u8,
) -> PdfCryptoResult<Vec<u8>> {
    let (validation_salt, _) = r6_salts(user_value, "U")?;
    let password = sanitize_password_r6(password);
    Ok(compute_hash_r6(&password, validation_salt, None, revision))
}

/// Revision 5/6 owner validation hash; additionally binds the 48-byte U
/// value. Matches the first 32 bytes of O for the right password.
pub fn compute_owner_password_hash_r6(
    password: &[u8],
    owner_value: &[u8],
    user_value: &[u8],
    revision: u8,
) -> PdfCryptoResult<Vec<u8>> {
    let (validation_salt, _) = r6_salts(owner_value, "O")?;
    if user_value.len() != 48 {
        return Err(PdfCryptoError::InvalidValueLength {
            field: "U",
            expected: 48,
            actual: user_value.len(),
        });
    }
    let password = sanitize_password_r6(password);
    Ok(compute_hash_r6(
        &password,
        validation_salt,
        Some(user_value),
        revision,
    ))
}

fn check_wrapped_key(field: &'static str, wrapped: &[u8]) -> PdfCryptoResult<()> {
    if wrapped.len() != 32 {
        return Err(PdfCryptoError::InvalidValueLength {
            field,
            expected: 32,
            actual: wrapped.len(),
        });
    }
    Ok(())
}

/// Unwrap the file encryption key from UE using the user password's key-salt
/// hash as the key-encryption key.
pub fn compute_user_encryption_key_r6(
    password: &[u8],
    user_value: &[u8],
    user_encrypted: &[u8],
    revision: u8,
) -> PdfCryptoResult<Zeroizing<Vec<u8>>> {
    let (_, key_salt) = r6_salts(user_value, "U")?;
    check_wrapped_key("UE", user_encrypted)?;

    let password = sanitize_password_r6(password);
    let kek = Zeroizing::new(compute_hash_r6(&password, key_salt, None, revision));
    Ok(Zeroizing::new(aes256_cbc_zero_iv_decrypt(
        &kek,
        user_encrypted,
    )))
}

/// Unwrap the file encryption key from OE using the owner password's
/// key-salt hash as the key-encryption key.
pub fn compute_owner_encryption_key_r6(
    password: &[u8],
    owner_value: &[u8],
    user_value: &[u8],
    owner_encrypted: &[u8],
    revision: u8,
) -> PdfCryptoResult<Zeroizing<Vec<u8>>> {
    let (_, key_salt) = r6_salts(owner_value, "O")?;
    if user_value.len() != 48 {
        return Err(PdfCryptoError::InvalidValueLength {
            field: "U",
            expected: 48,
            actual: user_value.len(),
        });
    }
    check_wrapped_key("OE", owner_encrypted)?;

    let password = sanitize_password_r6(password);
    let kek = Zeroizing::new(compute_hash_r6(
        &password,
        key_salt,
        Some(user_value),
        revision,
    ));
    Ok(Zeroizing::new(aes256_cbc_zero_iv_decrypt(
        &kek,
        owner_encrypted,
    )))
}

/// Algorithm 8: build the U and UE values for a fresh revision 5/6 document
/// from the chosen file key and user password. Salts are drawn at random, so
/// each call yields different values that all validate.
pub fn compute_user_values_r6(
    file_key: &[u8],
    user_password: &[u8],
    revision: u8,
) -> PdfCryptoResult<(Vec<u8>, Vec<u8>)> {
    if file_key.len() != 32 {
        return Err(PdfCryptoError::InvalidKeyLength {
            cipher: "AES-256",
            expected: 32,
            actual: file_key.len(),
        });
    }

    let password = sanitize_password_r6(user_password);
    let mut user_value = vec![0u8; 48];
    thread_rng().fill_bytes(&mut user_value[32..]);

    let hash = compute_hash_r6(&password, &user_value[32..40], None, revision);
    user_value[..32].copy_from_slice(&hash);

    let kek = Zeroizing::new(compute_hash_r6(&password, &user_value[40..48], None, revision));
    let user_encrypted = aes256_cbc_zero_iv_encrypt(&kek, file_key);

    Ok((user_value, user_encrypted))
}

/// Algorithm 9: build the O and OE values for a fresh revision 5/6 document.
/// Requires the U value produced by [`compute_user_values_r6`] first.
pub fn compute_owner_values_r6(
    file_key: &[u8],
    owner_password: &[u8],
    user_value: &[u8],
    revision: u8,
) -> PdfCryptoResult<(Vec<u8>, Vec<u8>)> {
    if file_key.len() != 32 {
        return Err(PdfCryptoError::InvalidKeyLength {
            cipher: "AES-256",
            expected: 32,
            actual: file_key.len(),
        });
    }
    if user_value.len() != 48 {
        return Err(PdfCryptoError::InvalidValueLength {
            field: "U",
            expected: 48,
            actual: user_value.len(),
        });
    }

    let password = sanitize_password_r6(owner_password);
    let mut owner_value = vec![0u8; 48];
    thread_rng().fill_bytes(&mut owner_value[32..]);

    let hash = compute_hash_r6(&password, &owner_value[32..40], Some(user_value), revision);
    owner_value[..32].copy_from_slice(&hash);

    let kek = Zeroizing::new(compute_hash_r6(
        &password,
        &owner_value[40..48],
        Some(user_value),
        revision,
    ));
    let owner_encrypted = aes256_cbc_zero_iv_encrypt(&kek, file_key);

    Ok((owner_value, owner_encrypted))
}

/// Algorithm 10: build the encrypted 16-byte Perms block from the P mask,
/// the EncryptMetadata flag and the file key.
pub fn compute_permissions_value(
    p: i32,
    encrypt_metadata: bool,
    file_key: &[u8],
) -> PdfCryptoResult<Vec<u8>> {
    if file_key.len() != 32 {
        return Err(PdfCryptoError::InvalidKeyLength {
            cipher: "AES-256",
            expected: 32,
            actual: file_key.len(),
        });
    }

    let mut block = [0u8; 16];
    // P is sign extended to 64 bits, low-order byte first.
    block[..8].copy_from_slice(&(p as i64 as u64).to_le_bytes());
    block[8] = if encrypt_metadata { b'T' } else { b'F' };
    block[9..12].copy_from_slice(b"adb");
    thread_rng().fill_bytes(&mut block[12..]);

    Ok(aes256_ecb_encrypt(file_key, &block))
}

/// Algorithm 13: decrypt a stored Perms block and check that it agrees with
/// the P mask and the EncryptMetadata flag.
pub fn validate_permissions_value(
    perms: &[u8],
    p: i32,
    encrypt_metadata: bool,
    file_key: &[u8],
) -> PdfCryptoResult<bool> {
    if file_key.len() != 32 {
        return Err(PdfCryptoError::InvalidKeyLength {
            cipher: "AES-256",
            expected: 32,
            actual: file_key.len(),
        });
    }
    if perms.len() != 16 {
        return Err(PdfCryptoError::InvalidValueLength {
            field: "Perms",
            expected: 16,
            actual: perms.len(),
        });
    }

    let block = aes256_ecb_decrypt(file_key, perms);

    let valid = &block[9..12] == b"adb"
        && block[..4] == (p as u32).to_le_bytes()
        && block[8] == if encrypt_metadata { b'T' } else { b'F' };
    Ok(valid)
}
