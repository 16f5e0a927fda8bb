// ============================
// carebridge-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Scrypt,
};
use zeroize::Zeroize;

/// Hash a password using scrypt
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hash a password and zeroize the plaintext buffer.
pub fn hash_password_secure(plain: &mut String) -> anyhow::Result<String> {
    let hash = hash_password(plain)?;
    plain.zeroize();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("password123").unwrap();
        assert!(verify_password(&hash, "password123"));
        assert!(!verify_password(&hash, "wrong_password"));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("not-a-phc-string", "password123"));
    }

    #[test]
    fn secure_hash_wipes_plaintext() {
        let mut plain = "password123".to_string();
        let hash = hash_password_secure(&mut plain).unwrap();
        assert!(plain.is_empty());
        assert!(verify_password(&hash, "password123"));
    }
}
