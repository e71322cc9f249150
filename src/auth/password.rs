//! Password digests stored in the `password_hash` column.
//!
//! Two formats coexist in one table:
//!
//! - `sha256`: lowercase hex of a single unsalted SHA-256 pass. This is the
//!   historical format of the `users` table and remains the default, so
//!   existing databases keep working. It is open to precomputation attacks.
//! - `argon2`: a PHC string (`$argon2id$v=19$...`) with a random per-record
//!   salt.
//!
//! [`matches`] picks the format from the stored value, so switching the
//! configured scheme only affects accounts created afterwards.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

const PHC_PREFIX: &str = "$argon2";

/// Digest used for newly created accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    #[default]
    Sha256,
    Argon2,
}

/// Compute the stored form of `password` under `scheme`.
pub fn digest(scheme: PasswordScheme, password: &str) -> Result<String, AuthError> {
    match scheme {
        PasswordScheme::Sha256 => Ok(sha256_hex(password)),
        PasswordScheme::Argon2 => {
            let salt = SaltString::generate(&mut OsRng);
            let hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| AuthError::Hash(e.to_string()))?;
            Ok(hash.to_string())
        }
    }
}

/// Check `password` against a stored digest of either format.
/// A malformed PHC string never matches.
pub fn matches(password: &str, stored: &str) -> bool {
    if stored.starts_with(PHC_PREFIX) {
        match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                log::warn!("Unparseable password hash in store: {e}");
                false
            }
        }
    } else {
        sha256_hex(password) == stored
    }
}

fn sha256_hex(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_is_plain_hex_digest() {
        let d = digest(PasswordScheme::Sha256, "secret123").unwrap();
        assert_eq!(
            d,
            "fcf730b6d95236ecd3c9fc2d92d7b6b2bb061514961aec041d6c7a7192f592e4"
        );
        assert!(matches("secret123", &d));
        assert!(!matches("secret124", &d));
    }

    #[test]
    fn argon2_is_salted_and_verifiable() {
        let a = digest(PasswordScheme::Argon2, "secret123").unwrap();
        let b = digest(PasswordScheme::Argon2, "secret123").unwrap();
        assert!(a.starts_with("$argon2id$"));
        assert_ne!(a, b);
        assert!(matches("secret123", &a));
        assert!(!matches("wrong", &a));
    }

    #[test]
    fn malformed_phc_never_matches() {
        assert!(!matches("anything", "$argon2id$garbage"));
    }
}
