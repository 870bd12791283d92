//! MongoDB persistence adapters.
//!
//! This module provides concrete implementations of the domain repository
//! ports backed by a MongoDB document store.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   BSON documents and domain types. No business logic resides here.
//! - **Internal models**: document structs (`documents.rs`) are internal
//!   implementation details, never exposed to the domain layer.
//! - **Strongly typed errors**: all driver errors are mapped to domain
//!   persistence error types.

mod documents;
mod mongo_comment_repository;
mod mongo_discussion_repository;
mod mongo_user_repository;

pub use mongo_comment_repository::MongoCommentRepository;
pub use mongo_discussion_repository::MongoDiscussionRepository;
pub use mongo_user_repository::MongoUserRepository;

use mongodb::{Client, Collection, Database};

use documents::{CommentDocument, DiscussionDocument, UserDocument};

pub(crate) const USERS_COLLECTION: &str = "users";
pub(crate) const DISCUSSIONS_COLLECTION: &str = "discussions";
pub(crate) const COMMENTS_COLLECTION: &str = "comments";

/// Errors raised while establishing the store connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The connection string was rejected or the server is unreachable.
    #[error("failed to connect to document store: {message}")]
    Connect { message: String },
}

impl StoreError {
    /// Create a connect error with the given message.
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }
}

/// Configuration for the document store connection.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    url: String,
    database: String,
}

impl StoreConfig {
    /// Create a new configuration with the given connection string.
    ///
    /// The database name defaults to `discussion_board`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: "discussion_board".into(),
        }
    }

    /// Select a different database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Connection string.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Database name.
    pub fn database(&self) -> &str {
        self.database.as_str()
    }
}

/// Handle to the backing database, shared by the repository adapters.
#[derive(Clone)]
pub struct DocumentStore {
    db: Database,
}

impl DocumentStore {
    /// Connect to the store and select the configured database.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(config.url())
            .await
            .map_err(|error| StoreError::connect(error.to_string()))?;
        Ok(Self {
            db: client.database(config.database()),
        })
    }

    pub(crate) fn users(&self) -> Collection<UserDocument> {
        self.db.collection(USERS_COLLECTION)
    }

    pub(crate) fn discussions(&self) -> Collection<DiscussionDocument> {
        self.db.collection(DISCUSSIONS_COLLECTION)
    }

    pub(crate) fn comments(&self) -> Collection<CommentDocument> {
        self.db.collection(COMMENTS_COLLECTION)
    }
}
