//! Port abstraction for discussion persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Discussion, DiscussionId, DiscussionParams, DiscussionThread};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by discussion repository adapters.
    pub enum DiscussionPersistenceError {
        /// Store connection could not be established.
        Connection { message: String } => "discussion store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "discussion store query failed: {message}",
    }
}

#[async_trait]
pub trait DiscussionRepository: Send + Sync {
    /// Insert a freshly created discussion.
    async fn insert(&self, discussion: &Discussion) -> Result<(), DiscussionPersistenceError>;

    /// Fetch all discussions for the index page.
    async fn find_all(&self) -> Result<Vec<Discussion>, DiscussionPersistenceError>;

    /// Fetch one discussion by identifier.
    async fn find_by_id(
        &self,
        id: DiscussionId,
    ) -> Result<Option<Discussion>, DiscussionPersistenceError>;

    /// Fetch one discussion with its comments and their authors resolved.
    ///
    /// Handlers issue this as their single store operation for the detail
    /// page; any joins happen inside the adapter.
    async fn find_thread(
        &self,
        id: DiscussionId,
    ) -> Result<Option<DiscussionThread>, DiscussionPersistenceError>;

    /// Overwrite the fixed field-set of an existing discussion.
    async fn update(
        &self,
        id: DiscussionId,
        params: &DiscussionParams,
    ) -> Result<(), DiscussionPersistenceError>;

    /// Remove a discussion by identifier. Comments are not cascaded.
    async fn delete(&self, id: DiscussionId) -> Result<(), DiscussionPersistenceError>;
}
