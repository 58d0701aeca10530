//! Password hashing.
//!
//! New hashes are argon2id PHC strings unless the legacy scheme is switched
//! on. Verification looks at the stored value, so rows written under either
//! scheme keep working.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(String);

impl From<argon2::password_hash::Error> for PasswordError {
    fn from(e: argon2::password_hash::Error) -> Self {
        Self(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordScheme {
    /// Salted argon2id with the crate's default cost parameters.
    Argon2,
    /// Unsalted single SHA-256, lowercase hex. Insecure; compatibility only.
    LegacySha256,
}

impl PasswordScheme {
    pub fn hash(self, password: &str) -> Result<String, PasswordError> {
        match self {
            PasswordScheme::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Ok(Argon2::default()
                    .hash_password(password.as_bytes(), &salt)?
                    .to_string())
            }
            PasswordScheme::LegacySha256 => Ok(legacy_digest(password)),
        }
    }
}

/// Check `password` against a stored hash of either scheme.
///
/// A stored `$argon2` value that is not a complete PHC string is an error,
/// not a mismatch. Legacy digests are compared byte for byte.
pub fn verify(password: &str, stored: &str) -> Result<bool, PasswordError> {
    if stored.starts_with("$argon2") {
        let parsed = PasswordHash::new(stored)?;
        if parsed.hash.is_none() {
            return Err(PasswordError("stored argon2 value has no hash output".into()));
        }
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    } else {
        Ok(stored == legacy_digest(password))
    }
}

fn legacy_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
