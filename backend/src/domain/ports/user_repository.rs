//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserId, UserParams};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Store connection could not be established.
        Connection { message: String } => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}",
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a freshly registered user.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch all users for the index page.
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by handle, for authentication and uniqueness checks.
    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, UserPersistenceError>;

    /// Overwrite the fixed field-set of an existing user.
    async fn update(&self, id: UserId, params: &UserParams) -> Result<(), UserPersistenceError>;

    /// Remove a user by identifier.
    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError>;
}
