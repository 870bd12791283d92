//! Argon2 implementation of the credential hashing port.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
};

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialHashError, CredentialHasher};

/// Hashes credentials with Argon2id and a per-password random salt.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2CredentialHasher;

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|error| CredentialHashError::hash(error.to_string()))?;
        PasswordHash::new(phc.to_string())
            .map_err(|error| CredentialHashError::hash(error.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        PhcString::new(hash.as_str())
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn hash_verifies_the_original_password() {
        let hasher = Argon2CredentialHasher;
        let hash = hasher.hash("correct horse battery staple").expect("hashing succeeds");
        assert!(hasher.verify("correct horse battery staple", &hash));
    }

    #[test]
    fn hash_rejects_a_different_password() {
        let hasher = Argon2CredentialHasher;
        let hash = hasher.hash("secret").expect("hashing succeeds");
        assert!(!hasher.verify("not the secret", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = Argon2CredentialHasher;
        let first = hasher.hash("secret").expect("hashing succeeds");
        let second = hasher.hash("secret").expect("hashing succeeds");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[test]
    fn unparseable_stored_hash_fails_verification() {
        let hasher = Argon2CredentialHasher;
        let corrupt = PasswordHash::new("not-a-phc-string").expect("non-empty");
        assert!(!hasher.verify("secret", &corrupt));
    }
}
