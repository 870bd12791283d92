//! MongoDB-backed `CommentRepository` adapter.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::error::ErrorKind;

use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::{Comment, CommentId, CommentView};

use super::DocumentStore;
use super::documents::CommentDocument;

/// Repository over the `comments` collection.
#[derive(Clone)]
pub struct MongoCommentRepository {
    store: DocumentStore,
}

impl MongoCommentRepository {
    /// Create a new adapter over the shared store handle.
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }
}

fn map_driver_error(error: mongodb::error::Error) -> CommentPersistenceError {
    match error.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(..) => {
            CommentPersistenceError::connection(error.to_string())
        }
        _ => CommentPersistenceError::query(error.to_string()),
    }
}

#[async_trait]
impl CommentRepository for MongoCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError> {
        self.store
            .comments()
            .insert_one(CommentDocument::from_domain(comment), None)
            .await
            .map_err(map_driver_error)?;

        // Register the reference on the parent so the discussion keeps an
        // ordered list of the comments it owns.
        self.store
            .discussions()
            .update_one(
                doc! { "_id": comment.discussion.to_object_id() },
                doc! { "$push": { "comments": comment.id.to_object_id() } },
                None,
            )
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }

    async fn find_view(
        &self,
        id: CommentId,
    ) -> Result<Option<CommentView>, CommentPersistenceError> {
        let Some(document) = self
            .store
            .comments()
            .find_one(doc! { "_id": id.to_object_id() }, None)
            .await
            .map_err(map_driver_error)?
        else {
            return Ok(None);
        };
        let comment = document.into_domain();

        let author = self
            .store
            .users()
            .find_one(doc! { "_id": comment.author.to_object_id() }, None)
            .await
            .map_err(map_driver_error)?
            .map(|user_document| {
                user_document.into_domain().map_err(|error| {
                    CommentPersistenceError::query(format!("corrupt user document: {error}"))
                })
            })
            .transpose()?;

        Ok(Some(CommentView { comment, author }))
    }

    async fn delete(&self, id: CommentId) -> Result<(), CommentPersistenceError> {
        self.store
            .comments()
            .delete_one(doc! { "_id": id.to_object_id() }, None)
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }
}
