//! MongoDB-backed `UserRepository` adapter.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::ErrorKind;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId, UserParams, UserValidationError};

use super::DocumentStore;
use super::documents::UserDocument;

/// Repository over the `users` collection.
#[derive(Clone)]
pub struct MongoUserRepository {
    store: DocumentStore,
}

impl MongoUserRepository {
    /// Create a new adapter over the shared store handle.
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }
}

fn map_driver_error(error: mongodb::error::Error) -> UserPersistenceError {
    match error.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(..) => {
            UserPersistenceError::connection(error.to_string())
        }
        _ => UserPersistenceError::query(error.to_string()),
    }
}

fn map_corrupt_document(error: UserValidationError) -> UserPersistenceError {
    UserPersistenceError::query(format!("corrupt user document: {error}"))
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.store
            .users()
            .insert_one(UserDocument::from_domain(user), None)
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut cursor = self
            .store
            .users()
            .find(None, None)
            .await
            .map_err(map_driver_error)?;

        let mut users = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(map_driver_error)? {
            users.push(document.into_domain().map_err(map_corrupt_document)?);
        }
        Ok(users)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let document = self
            .store
            .users()
            .find_one(doc! { "_id": id.to_object_id() }, None)
            .await
            .map_err(map_driver_error)?;

        document
            .map(|doc| doc.into_domain().map_err(map_corrupt_document))
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let document = self
            .store
            .users()
            .find_one(doc! { "username": username }, None)
            .await
            .map_err(map_driver_error)?;

        document
            .map(|doc| doc.into_domain().map_err(map_corrupt_document))
            .transpose()
    }

    async fn update(&self, id: UserId, params: &UserParams) -> Result<(), UserPersistenceError> {
        let update = doc! {
            "$set": {
                "username": params.username().as_ref(),
                "password_hash": params.password_hash().as_str(),
            }
        };
        self.store
            .users()
            .update_one(doc! { "_id": id.to_object_id() }, update, None)
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError> {
        self.store
            .users()
            .delete_one(doc! { "_id": id.to_object_id() }, None)
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }
}
