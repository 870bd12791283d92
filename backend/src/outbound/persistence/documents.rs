//! BSON document structs mirroring the three store collections.
//!
//! These are adapter-internal. Conversions to and from domain types happen
//! here so the repositories stay focused on queries.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Comment, CommentId, Discussion, DiscussionId, PasswordHash, User, UserId, UserValidationError,
    Username,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserDocument {
    pub fn from_domain(user: &User) -> Self {
        Self {
            id: user.id().to_object_id(),
            username: user.username().as_ref().to_owned(),
            password_hash: user.password_hash().as_str().to_owned(),
            created_at: user.created_at(),
        }
    }

    /// Rebuild the domain entity, re-validating stored fields.
    pub fn into_domain(self) -> Result<User, UserValidationError> {
        let username = Username::new(self.username)?;
        let password_hash = PasswordHash::new(self.password_hash)?;
        Ok(User::new(
            UserId::from(self.id),
            username,
            password_hash,
            self.created_at,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DiscussionDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub author: ObjectId,
    pub category: String,
    pub tags: Vec<String>,
    pub comments: Vec<ObjectId>,
    pub created_at: DateTime<Utc>,
}

impl DiscussionDocument {
    pub fn from_domain(discussion: &Discussion) -> Self {
        Self {
            id: discussion.id.to_object_id(),
            title: discussion.title.clone(),
            description: discussion.description.clone(),
            author: discussion.author.to_object_id(),
            category: discussion.category.clone(),
            tags: discussion.tags.clone(),
            comments: discussion
                .comments
                .iter()
                .map(|id| id.to_object_id())
                .collect(),
            created_at: discussion.created_at,
        }
    }

    pub fn into_domain(self) -> Discussion {
        Discussion {
            id: DiscussionId::from(self.id),
            title: self.title,
            description: self.description,
            author: UserId::from(self.author),
            category: self.category,
            tags: self.tags,
            comments: self.comments.into_iter().map(CommentId::from).collect(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CommentDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub content: String,
    pub author: ObjectId,
    pub discussion: ObjectId,
    pub created_at: DateTime<Utc>,
}

impl CommentDocument {
    pub fn from_domain(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_object_id(),
            content: comment.content.clone(),
            author: comment.author.to_object_id(),
            discussion: comment.discussion.to_object_id(),
            created_at: comment.created_at,
        }
    }

    pub fn into_domain(self) -> Comment {
        Comment {
            id: CommentId::from(self.id),
            content: self.content,
            author: UserId::from(self.author),
            discussion: DiscussionId::from(self.discussion),
            created_at: self.created_at,
        }
    }
}
