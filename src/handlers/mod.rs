//! Security handlers. Only the password-based Standard handler is
//! implemented; public-key handlers are out of scope.

mod standard;

pub use standard::StandardSecurityHandler;
