//! AES-CBC wrappers for PDF content encryption
//!
//! The public functions implement the format's framing: a fresh random
//! 16-byte IV prepended to the ciphertext and PKCS#7 padding. The
//! crate-private no-padding CBC and ECB primitives serve the revision 5/6
//! key-derivation internals, which define their own framing.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use aes::{Aes128, Aes256};
use rand::{thread_rng, RngCore};

use crate::error::{PdfCryptoError, PdfCryptoResult};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256EcbEnc = ecb::Encryptor<Aes256>;
type Aes256EcbDec = ecb::Decryptor<Aes256>;

const BLOCK_SIZE: usize = 16;

/// Encrypt with AES-128 in CBC mode; output is IV followed by the
/// PKCS#7-padded ciphertext. The key must be exactly 16 bytes.
pub fn encrypt_aes128(key: &[u8], plaintext: &[u8]) -> PdfCryptoResult<Vec<u8>> {
    check_key_length(key, 16, "AES-128")?;

    let (iv, mut buf) = pad_with_iv(plaintext);
    let mut cipher = Aes128CbcEnc::new(
        GenericArray::from_slice(key),
        GenericArray::from_slice(&iv),
    );
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }

    Ok(join_iv(iv, buf))
}

/// Encrypt with AES-256 in CBC mode; same framing as [`encrypt_aes128`].
/// The key must be exactly 32 bytes.
pub fn encrypt_aes256(key: &[u8], plaintext: &[u8]) -> PdfCryptoResult<Vec<u8>> {
    check_key_length(key, 32, "AES-256")?;

    let (iv, mut buf) = pad_with_iv(plaintext);
    let mut cipher = Aes256CbcEnc::new(
        GenericArray::from_slice(key),
        GenericArray::from_slice(&iv),
    );
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }

    Ok(join_iv(iv, buf))
}

/// Decrypt AES-128-CBC data framed as IV followed by ciphertext, stripping
/// the PKCS#7 padding. An IV-only input decrypts to empty.
pub fn decrypt_aes128(key: &[u8], data: &[u8]) -> PdfCryptoResult<Vec<u8>> {
    check_key_length(key, 16, "AES-128")?;

    let (iv, ciphertext) = split_iv(data)?;
    let mut buf = ciphertext.to_vec();
    let mut cipher = Aes128CbcDec::new(
        GenericArray::from_slice(key),
        GenericArray::from_slice(iv),
    );
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }

    strip_pkcs7(buf)
}

/// Decrypt AES-256-CBC data framed as IV followed by ciphertext.
pub fn decrypt_aes256(key: &[u8], data: &[u8]) -> PdfCryptoResult<Vec<u8>> {
    check_key_length(key, 32, "AES-256")?;

    let (iv, ciphertext) = split_iv(data)?;
    let mut buf = ciphertext.to_vec();
    let mut cipher = Aes256CbcDec::new(
        GenericArray::from_slice(key),
        GenericArray::from_slice(iv),
    );
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }

    strip_pkcs7(buf)
}

/// AES-128-CBC, no padding, caller-supplied IV. `data` must be a multiple
/// of the block size; used by the revision 6 iterative hash rounds.
pub(crate) fn aes128_cbc_encrypt_no_pad(key: &[u8], iv: &[u8], data: &mut [u8]) {
    let mut cipher = Aes128CbcEnc::new(
        GenericArray::from_slice(key),
        GenericArray::from_slice(iv),
    );
    for block in data.chunks_exact_mut(BLOCK_SIZE) {
        cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }
}

/// AES-256-CBC, no padding, zero IV; wraps a file key into UE/OE.
pub(crate) fn aes256_cbc_zero_iv_encrypt(key: &[u8], data: &[u8]) -> Vec<u8> {
    let iv = [0u8; BLOCK_SIZE];
    let mut buf = data.to_vec();
    let mut cipher = Aes256CbcEnc::new(
        GenericArray::from_slice(key),
        GenericArray::from_slice(&iv),
    );
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }
    buf
}

/// AES-256-CBC, no padding, zero IV; unwraps UE/OE into the file key.
pub(crate) fn aes256_cbc_zero_iv_decrypt(key: &[u8], data: &[u8]) -> Vec<u8> {
    let iv = [0u8; BLOCK_SIZE];
    let mut buf = data.to_vec();
    let mut cipher = Aes256CbcDec::new(
        GenericArray::from_slice(key),
        GenericArray::from_slice(&iv),
    );
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }
    buf
}

/// AES-256-ECB encryption of the 16-byte Perms block.
pub(crate) fn aes256_ecb_encrypt(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut buf = data.to_vec();
    let mut cipher = Aes256EcbEnc::new(GenericArray::from_slice(key));
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }
    buf
}

/// AES-256-ECB decryption of the 16-byte Perms block.
pub(crate) fn aes256_ecb_decrypt(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut buf = data.to_vec();
    let mut cipher = Aes256EcbDec::new(GenericArray::from_slice(key));
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }
    buf
}

fn check_key_length(key: &[u8], expected: usize, cipher: &'static str) -> PdfCryptoResult<()> {
    if key.len() != expected {
        return Err(PdfCryptoError::InvalidKeyLength {
            cipher,
            expected,
            actual: key.len(),
        });
    }
    Ok(())
}

/// Generate a fresh IV and a PKCS#7-padded copy of the plaintext.
fn pad_with_iv(plaintext: &[u8]) -> ([u8; BLOCK_SIZE], Vec<u8>) {
    let mut iv = [0u8; BLOCK_SIZE];
    thread_rng().fill_bytes(&mut iv);

    let pad_len = BLOCK_SIZE - (plaintext.len() % BLOCK_SIZE);
    let mut buf = Vec::with_capacity(plaintext.len() + pad_len);
    buf.extend_from_slice(plaintext);
    buf.extend(std::iter::repeat(pad_len as u8).take(pad_len));

    (iv, buf)
}

fn join_iv(iv: [u8; BLOCK_SIZE], ciphertext: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    out
}

fn split_iv(data: &[u8]) -> PdfCryptoResult<(&[u8], &[u8])> {
    if data.len() < BLOCK_SIZE || (data.len() - BLOCK_SIZE) % BLOCK_SIZE != 0 {
        return Err(PdfCryptoError::InvalidCiphertextLength(data.len()));
    }
    Ok(data.split_at(BLOCK_SIZE))
}

fn strip_pkcs7(mut buf: Vec<u8>) -> PdfCryptoResult<Vec<u8>> {
    let Some(&pad_len) = buf.last() else {
        // IV-only input carries no blocks at all.
        return Ok(buf);
    };

    let pad_len = pad_len as usize;
    if pad_len == 0 || pad_len > BLOCK_SIZE || pad_len > buf.len() {
        return Err(PdfCryptoError::InvalidPadding);
    }
    if buf[buf.len() - pad_len..].iter().any(|&b| b as usize != pad_len) {
        return Err(PdfCryptoError::InvalidPadding);
    }

    buf.truncate(buf.len() - pad_len);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aes128_round_trip() {
        let key = [1u8; 16];
        let plaintext = b"Attack at dawn. Bring the umbrella.";

        let ciphertext = encrypt_aes128(&key, plaintext).unwrap();
        assert_ne!(&ciphertext[16..], &plaintext[..]);
        assert_eq!(decrypt_aes128(&key, &ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn test_aes256_round_trip() {
        let key = [7u8; 32];
        let plaintext = b"sixteen byte blk";

        let ciphertext = encrypt_aes256(&key, plaintext).unwrap();
        assert_eq!(decrypt_aes256(&key, &ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn test_empty_plaintext_round_trip() {
        let key = [9u8; 16];
        let ciphertext = encrypt_aes128(&key, b"").unwrap();
        // One full padding block after the IV.
        assert_eq!(ciphertext.len(), 32);
        assert_eq!(decrypt_aes128(&key, &ciphertext).unwrap(), b"");

        let key = [9u8; 32];
        let ciphertext = encrypt_aes256(&key, b"").unwrap();
        assert_eq!(decrypt_aes256(&key, &ciphertext).unwrap(), b"");
    }

    #[test]
    fn test_output_length_formula() {
        let key = [0u8; 16];
        for len in [0usize, 1, 15, 16, 17, 31, 32, 100] {
            let ciphertext = encrypt_aes128(&key, &vec![0xAB; len]).unwrap();
            assert_eq!(ciphertext.len(), 16 + (len / 16 + 1) * 16);
        }
    }

    #[test]
    fn test_key_length_enforced() {
        assert!(matches!(
            encrypt_aes128(&[0u8; 24], b"data"),
            Err(PdfCryptoError::InvalidKeyLength { cipher: "AES-128", expected: 16, actual: 24 })
        ));
        assert!(matches!(
            decrypt_aes256(&[0u8; 16], &[0u8; 32]),
            Err(PdfCryptoError::InvalidKeyLength { cipher: "AES-256", expected: 32, actual: 16 })
        ));
    }

    #[test]
    fn test_undersized_ciphertext() {
        assert!(matches!(
            decrypt_aes128(&[0u8; 16], &[0u8; 8]),
            Err(PdfCryptoError::InvalidCiphertextLength(8))
        ));
        // Misaligned tail after the IV.
        assert!(matches!(
            decrypt_aes128(&[0u8; 16], &[0u8; 20]),
            Err(PdfCryptoError::InvalidCiphertextLength(20))
        ));
    }

    #[test]
    fn test_iv_only_decrypts_to_empty() {
        let out = decrypt_aes128(&[3u8; 16], &[0u8; 16]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_iv_freshness() {
        let key = [5u8; 16];
        let a = encrypt_aes128(&key, b"same plaintext").unwrap();
        let b = encrypt_aes128(&key, b"same plaintext").unwrap();
        assert_ne!(a, b);
        assert_eq!(
            decrypt_aes128(&key, &a).unwrap(),
            decrypt_aes128(&key, &b).unwrap()
        );
    }

    #[test]
    fn test_invalid_padding_detected() {
        let key = [5u8; 16];
        // Random blocks will almost surely not decrypt to valid padding
        // under a mismatched key.
        let ciphertext = encrypt_aes128(&key, b"some plaintext bytes").unwrap();
        let result = decrypt_aes128(&[6u8; 16], &ciphertext);
        if let Err(err) = result {
            assert!(matches!(err, PdfCryptoError::InvalidPadding));
        }
    }

    #[test]
    fn test_no_pad_cbc_zero_iv_round_trip() {
        let key = [2u8; 32];
        let data = [0x5Au8; 32];
        let wrapped = aes256_cbc_zero_iv_encrypt(&key, &data);
        assert_eq!(wrapped.len(), 32);
        assert_ne!(wrapped, data);
        assert_eq!(aes256_cbc_zero_iv_decrypt(&key, &wrapped), data);
    }

    #[test]
    fn test_ecb_round_trip() {
        let key = [4u8; 32];
        let block = [0xC3u8; 16];
        let enc = aes256_ecb_encrypt(&key, &block);
        assert_eq!(aes256_ecb_decrypt(&key, &enc), block);
    }

    #[test]
    fn test_cbc_no_pad_in_place() {
        let key = [1u8; 16];
        let iv = [2u8; 16];
        let mut data = [0u8; 64];
        aes128_cbc_encrypt_no_pad(&key, &iv, &mut data);
        assert_ne!(data, [0u8; 64]);
        // Identical inputs give identical output.
        let mut again = [0u8; 64];
        aes128_cbc_encrypt_no_pad(&key, &iv, &mut again);
        assert_eq!(data, again);
    }
}
