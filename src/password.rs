//! Salted one-way password hashing, delegated to argon2id.

use anyhow::{anyhow, Result};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

/// Hash a plaintext password with a fresh random salt.
///
/// Returns a PHC string embedding algorithm, parameters, salt, and digest.
/// Two calls with the same input produce different strings.
pub fn hash(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// True iff `password`, hashed with the salt embedded in `digest`, matches.
/// A malformed digest verifies as false rather than erroring.
#[must_use]
pub fn verify(password: &str, digest: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(digest) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}
