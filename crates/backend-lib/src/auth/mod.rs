// ============================
// carebridge-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module: password hashing, token signing, the durable
//! revocation record, and the credential/session service.

pub mod password;
pub mod revocation;
mod service;
mod service_impl;
pub mod token;

pub use password::{hash_password, hash_password_secure, verify_password};
pub use revocation::{FlatFileRevocations, RevocationStore};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token::{Claims, TokenKind, TokenSigner};
