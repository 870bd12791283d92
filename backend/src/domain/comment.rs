//! Comment entity and parameter object.

use std::fmt;

use chrono::{DateTime, Utc};

use super::discussion::DiscussionId;
use super::id::define_object_id;
use super::user::{User, UserId};

/// Validation errors returned by [`CommentParams::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    EmptyContent,
    ContentTooLong { max: usize },
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "comment must not be empty"),
            Self::ContentTooLong { max } => {
                write!(f, "comment must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CommentValidationError {}

define_object_id! {
    /// Stable comment identifier.
    CommentId
}

/// Maximum allowed length for comment content.
pub const CONTENT_MAX: usize = 2000;

/// The fixed field-set extracted from a comment submission, plus the
/// authenticated author and the parent discussion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentParams {
    content: String,
    author: UserId,
    discussion: DiscussionId,
}

impl CommentParams {
    /// Validate the submitted content and build the parameter object.
    pub fn try_new(
        content: &str,
        author: UserId,
        discussion: DiscussionId,
    ) -> Result<Self, CommentValidationError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(CommentValidationError::EmptyContent);
        }
        if content.chars().count() > CONTENT_MAX {
            return Err(CommentValidationError::ContentTooLong { max: CONTENT_MAX });
        }

        Ok(Self {
            content: content.to_owned(),
            author,
            discussion,
        })
    }

    /// Submitted comment text.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Authenticated author the comment is attributed to.
    pub fn author(&self) -> UserId {
        self.author
    }

    /// Parent discussion the comment belongs to.
    pub fn discussion(&self) -> DiscussionId {
        self.discussion
    }
}

/// A comment document.
///
/// `discussion` is a shared back-reference to the parent, not ownership;
/// comments are created in a discussion's context but deleted independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub author: UserId,
    pub discussion: DiscussionId,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Materialise a new comment from validated parameters.
    pub fn from_params(id: CommentId, params: CommentParams, created_at: DateTime<Utc>) -> Self {
        let CommentParams {
            content,
            author,
            discussion,
        } = params;
        Self {
            id,
            content,
            author,
            discussion,
            created_at,
        }
    }
}

/// Detail read model: one comment with its author resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: Comment,
    pub author: Option<User>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn params_reject_blank_content(#[case] raw: &str) {
        let err = CommentParams::try_new(raw, UserId::random(), DiscussionId::random())
            .expect_err("blank content must fail");
        assert_eq!(err, CommentValidationError::EmptyContent);
    }

    #[test]
    fn params_reject_overlong_content() {
        let content = "c".repeat(CONTENT_MAX + 1);
        let err = CommentParams::try_new(&content, UserId::random(), DiscussionId::random())
            .expect_err("overlong content must fail");
        assert_eq!(err, CommentValidationError::ContentTooLong { max: CONTENT_MAX });
    }

    #[test]
    fn from_params_keeps_the_back_reference() {
        let discussion = DiscussionId::random();
        let params = CommentParams::try_new("hello", UserId::random(), discussion)
            .expect("valid content");
        let comment = Comment::from_params(CommentId::random(), params, chrono::Utc::now());
        assert_eq!(comment.discussion, discussion);
        assert_eq!(comment.content, "hello");
    }
}
