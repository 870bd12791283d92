//! Port abstraction for credential hashing.
//!
//! Registration and login never see the hashing algorithm; they talk to this
//! port and the outbound adapter decides the scheme.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised while deriving a credential hash.
    pub enum CredentialHashError {
        /// The hashing backend rejected the input or its parameters.
        Hash { message: String } => "credential hashing failed: {message}",
    }
}

pub trait CredentialHasher: Send + Sync {
    /// Derive a storable hash from a plaintext password.
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Unparseable stored hashes verify as `false` rather than erroring, so a
    /// corrupt record reads as a failed login instead of a server fault.
    fn verify(&self, password: &str, hash: &PasswordHash) -> bool;
}
