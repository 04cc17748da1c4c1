//! Cipher primitives: RC4 and the AES-CBC wrappers

mod aes;
mod rc4;

pub use aes::{decrypt_aes128, decrypt_aes256, encrypt_aes128, encrypt_aes256};
pub use rc4::{rc4, Rc4};

pub(crate) use aes::{
    aes128_cbc_encrypt_no_pad, aes256_cbc_zero_iv_decrypt, aes256_cbc_zero_iv_encrypt,
    aes256_ecb_decrypt, aes256_ecb_encrypt,
};
