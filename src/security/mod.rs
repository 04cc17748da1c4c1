//! Standard Security Handler primitives: key derivation and password
//! authentication.

pub mod authentication;
pub mod key_derivation;

pub use key_derivation::{
    compute_encryption_key, compute_object_key, compute_owner_encryption_key_r6,
    compute_owner_password_hash_r6, compute_owner_value, compute_owner_values_r6,
    compute_permissions_value, compute_user_encryption_key_r6, compute_user_password_hash_r6,
    compute_user_value, compute_user_values_r6, pad_password, sanitize_password_r6,
    validate_permissions_value, PAD_BYTES,
};
