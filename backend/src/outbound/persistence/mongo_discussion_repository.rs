//! MongoDB-backed `DiscussionRepository` adapter.
//!
//! `find_thread` performs the related-entity resolution the detail page
//! needs (comments by back-reference, authors by one `$in` query) so handler
//! steps stay a single port operation.

use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::error::ErrorKind;

use crate::domain::ports::{DiscussionPersistenceError, DiscussionRepository};
use crate::domain::{
    Discussion, DiscussionId, DiscussionParams, DiscussionThread, ThreadComment, User, UserId,
};

use super::DocumentStore;
use super::documents::DiscussionDocument;

/// Repository over the `discussions` collection.
#[derive(Clone)]
pub struct MongoDiscussionRepository {
    store: DocumentStore,
}

impl MongoDiscussionRepository {
    /// Create a new adapter over the shared store handle.
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    async fn load_authors(
        &self,
        ids: Vec<ObjectId>,
    ) -> Result<HashMap<UserId, User>, DiscussionPersistenceError> {
        let mut cursor = self
            .store
            .users()
            .find(doc! { "_id": { "$in": ids } }, None)
            .await
            .map_err(map_driver_error)?;

        let mut authors = HashMap::new();
        while let Some(document) = cursor.try_next().await.map_err(map_driver_error)? {
            let user = document.into_domain().map_err(|error| {
                DiscussionPersistenceError::query(format!("corrupt user document: {error}"))
            })?;
            authors.insert(user.id(), user);
        }
        Ok(authors)
    }
}

fn map_driver_error(error: mongodb::error::Error) -> DiscussionPersistenceError {
    match error.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(..) => {
            DiscussionPersistenceError::connection(error.to_string())
        }
        _ => DiscussionPersistenceError::query(error.to_string()),
    }
}

#[async_trait]
impl DiscussionRepository for MongoDiscussionRepository {
    async fn insert(&self, discussion: &Discussion) -> Result<(), DiscussionPersistenceError> {
        self.store
            .discussions()
            .insert_one(DiscussionDocument::from_domain(discussion), None)
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Discussion>, DiscussionPersistenceError> {
        let mut cursor = self
            .store
            .discussions()
            .find(None, None)
            .await
            .map_err(map_driver_error)?;

        let mut discussions = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(map_driver_error)? {
            discussions.push(document.into_domain());
        }
        Ok(discussions)
    }

    async fn find_by_id(
        &self,
        id: DiscussionId,
    ) -> Result<Option<Discussion>, DiscussionPersistenceError> {
        let document = self
            .store
            .discussions()
            .find_one(doc! { "_id": id.to_object_id() }, None)
            .await
            .map_err(map_driver_error)?;
        Ok(document.map(DiscussionDocument::into_domain))
    }

    async fn find_thread(
        &self,
        id: DiscussionId,
    ) -> Result<Option<DiscussionThread>, DiscussionPersistenceError> {
        let Some(document) = self
            .store
            .discussions()
            .find_one(doc! { "_id": id.to_object_id() }, None)
            .await
            .map_err(map_driver_error)?
        else {
            return Ok(None);
        };
        let discussion = document.into_domain();

        // Comments resolve through the back-reference, so ids left dangling
        // on the discussion's own list never surface.
        let mut cursor = self
            .store
            .comments()
            .find(doc! { "discussion": id.to_object_id() }, None)
            .await
            .map_err(map_driver_error)?;
        let mut comments = Vec::new();
        while let Some(comment_document) = cursor.try_next().await.map_err(map_driver_error)? {
            comments.push(comment_document.into_domain());
        }

        let mut author_ids: Vec<ObjectId> = comments
            .iter()
            .map(|comment| comment.author.to_object_id())
            .collect();
        author_ids.push(discussion.author.to_object_id());
        let authors = self.load_authors(author_ids).await?;

        let author = authors.get(&discussion.author).cloned();
        let comments = comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.author).cloned();
                ThreadComment { comment, author }
            })
            .collect();

        Ok(Some(DiscussionThread {
            discussion,
            author,
            comments,
        }))
    }

    async fn update(
        &self,
        id: DiscussionId,
        params: &DiscussionParams,
    ) -> Result<(), DiscussionPersistenceError> {
        let update = doc! {
            "$set": {
                "title": params.title(),
                "description": params.description(),
                "category": params.category(),
                "tags": params.tags().to_vec(),
                "author": params.author().to_object_id(),
            }
        };
        self.store
            .discussions()
            .update_one(doc! { "_id": id.to_object_id() }, update, None)
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }

    async fn delete(&self, id: DiscussionId) -> Result<(), DiscussionPersistenceError> {
        self.store
            .discussions()
            .delete_one(doc! { "_id": id.to_object_id() }, None)
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }
}
