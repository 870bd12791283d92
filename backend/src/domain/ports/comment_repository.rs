//! Port abstraction for comment persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Comment, CommentId, CommentView};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Store connection could not be established.
        Connection { message: String } => "comment store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment store query failed: {message}",
    }
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment and register its reference on the parent discussion.
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError>;

    /// Fetch one comment with its author resolved.
    async fn find_view(&self, id: CommentId)
    -> Result<Option<CommentView>, CommentPersistenceError>;

    /// Remove a comment by identifier.
    ///
    /// The parent discussion's reference list is left untouched; thread reads
    /// resolve comments through the back-reference, so the dangling id never
    /// surfaces.
    async fn delete(&self, id: CommentId) -> Result<(), CommentPersistenceError>;
}
