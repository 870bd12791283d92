//! Store-backed implementation of the login port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CredentialHasher, LoginService, UserPersistenceError, UserRepository};
use crate::domain::{Error, LoginCredentials, User};

/// Authenticates credentials against the user collection.
///
/// Lookup failures and hash mismatches produce the same unauthorized error
/// so callers cannot probe which usernames exist.
#[derive(Clone)]
pub struct StoreLoginService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl StoreLoginService {
    /// Compose the service from its collaborating ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid username or password")
}

#[async_trait]
impl LoginService for StoreLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(invalid_credentials)?;

        if self.hasher.verify(credentials.password(), user.password_hash()) {
            Ok(user)
        } else {
            Err(invalid_credentials())
        }
    }
}
