//! RC4 stream cipher
//!
//! Hand-rolled because PDF derives RC4 keys of arbitrary length (5 to 16
//! bytes per object) while the ecosystem RC4 implementations fix the key
//! size at the type level. The same operation encrypts and decrypts.

use crate::error::{PdfCryptoError, PdfCryptoResult};

/// RC4 cipher state
pub struct Rc4 {
    state: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4 {
    /// Run the key schedule. An empty key is rejected: the schedule indexes
    /// the key modulo its length.
    pub fn new(key: &[u8]) -> PdfCryptoResult<Self> {
        if key.is_empty() {
            return Err(PdfCryptoError::EmptyRc4Key);
        }

        let mut state = [0u8; 256];
        for (i, byte) in state.iter_mut().enumerate() {
            *byte = i as u8;
        }

        let mut j: u8 = 0;
        for i in 0..256 {
            j = j
                .wrapping_add(state[i])
                .wrapping_add(key[i % key.len()]);
            state.swap(i, j as usize);
        }

        Ok(Self { state, i: 0, j: 0 })
    }

    /// XOR the keystream over `data`. Symmetric: a second pass with a fresh
    /// cipher under the same key restores the input.
    pub fn process(&mut self, data: &[u8]) -> Vec<u8> {
        let mut output = Vec::with_capacity(data.len());

        for &byte in data {
            self.i = self.i.wrapping_add(1);
            self.j = self.j.wrapping_add(self.state[self.i as usize]);
            self.state.swap(self.i as usize, self.j as usize);
            let k = self.state
                [self.state[self.i as usize].wrapping_add(self.state[self.j as usize]) as usize];
            output.push(byte ^ k);
        }

        output
    }
}

/// One-shot RC4: key schedule plus keystream XOR over `data`.
pub fn rc4(key: &[u8], data: &[u8]) -> PdfCryptoResult<Vec<u8>> {
    Ok(Rc4::new(key)?.process(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_vector() {
        // Classic test vector: key "Key", plaintext "Plaintext".
        let out = rc4(b"Key", b"Plaintext").unwrap();
        assert_eq!(out, hex::decode("bbf316e8d940af0ad3").unwrap());
    }

    #[test]
    fn test_known_vector_binary_key() {
        // RFC 6229 keystream for key 0102030405 XORed over the data.
        let key = hex::decode("0102030405").unwrap();
        let data = hex::decode("00112233445566778899").unwrap();
        let expected = hex::decode("b2284136b468a650445a").unwrap();
        assert_eq!(rc4(&key, &data).unwrap(), expected);
    }

    #[test]
    fn test_empty_data() {
        assert_eq!(rc4(b"key", b"").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(rc4(b"", b"data"), Err(PdfCryptoError::EmptyRc4Key)));
        assert!(matches!(Rc4::new(b""), Err(PdfCryptoError::EmptyRc4Key)));
    }

    proptest! {
        #[test]
        fn prop_involution(key in proptest::collection::vec(any::<u8>(), 1..64),
                           data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let once = rc4(&key, &data).unwrap();
            let twice = rc4(&key, &once).unwrap();
            prop_assert_eq!(twice, data);
        }

        #[test]
        fn prop_deterministic(key in proptest::collection::vec(any::<u8>(), 1..64),
                              data in proptest::collection::vec(any::<u8>(), 1..512)) {
            prop_assert_eq!(rc4(&key, &data).unwrap(), rc4(&key, &data).unwrap());
        }

        #[test]
        fn prop_key_sensitivity(key in proptest::collection::vec(any::<u8>(), 1..64),
                                data in proptest::collection::vec(any::<u8>(), 16..512)) {
            let mut other = key.clone();
            other[0] ^= 0x01;
            prop_assert_ne!(rc4(&key, &data).unwrap(), rc4(&other, &data).unwrap());
        }

        #[test]
        fn prop_data_sensitivity(key in proptest::collection::vec(any::<u8>(), 1..64),
                                 data in proptest::collection::vec(any::<u8>(), 1..512)) {
            let mut other = data.clone();
            other[0] ^= 0x01;
            prop_assert_ne!(rc4(&key, &data).unwrap(), rc4(&key, &other).unwrap());
        }
    }
}
