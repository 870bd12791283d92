//! Discussion entity, parameter object, and detail-page read models.

use std::fmt;

use chrono::{DateTime, Utc};

use super::comment::{Comment, CommentId};
use super::id::define_object_id;
use super::user::{User, UserId};

/// Validation errors returned by [`DiscussionParams::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscussionValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyDescription,
    EmptyCategory,
}

impl fmt::Display for DiscussionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::EmptyCategory => write!(f, "category must not be empty"),
        }
    }
}

impl std::error::Error for DiscussionValidationError {}

define_object_id! {
    /// Stable discussion identifier.
    DiscussionId
}

/// Maximum allowed length for a discussion title.
pub const TITLE_MAX: usize = 120;

/// The fixed field-set extracted from a discussion create or update
/// submission, plus the authenticated author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionParams {
    title: String,
    description: String,
    category: String,
    tags: Vec<String>,
    author: UserId,
}

impl DiscussionParams {
    /// Validate the submitted fields and build the parameter object.
    ///
    /// `tags` is the raw comma-separated form value; blank entries are
    /// dropped and the rest trimmed.
    pub fn try_new(
        title: &str,
        description: &str,
        category: &str,
        tags: &str,
        author: UserId,
    ) -> Result<Self, DiscussionValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DiscussionValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(DiscussionValidationError::TitleTooLong { max: TITLE_MAX });
        }

        let description = description.trim();
        if description.is_empty() {
            return Err(DiscussionValidationError::EmptyDescription);
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(DiscussionValidationError::EmptyCategory);
        }

        Ok(Self {
            title: title.to_owned(),
            description: description.to_owned(),
            category: category.to_owned(),
            tags: parse_tags(tags),
            author,
        })
    }

    /// Submitted title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Submitted description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Submitted category.
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Parsed tag list.
    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }

    /// Authenticated author the submission is attributed to.
    pub fn author(&self) -> UserId {
        self.author
    }
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// A discussion document.
///
/// `comments` holds the ordered comment references the discussion owns; the
/// comment documents themselves live independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discussion {
    pub id: DiscussionId,
    pub title: String,
    pub description: String,
    pub author: UserId,
    pub category: String,
    pub tags: Vec<String>,
    pub comments: Vec<CommentId>,
    pub created_at: DateTime<Utc>,
}

impl Discussion {
    /// Materialise a new discussion from validated parameters.
    pub fn from_params(id: DiscussionId, params: DiscussionParams, created_at: DateTime<Utc>) -> Self {
        let DiscussionParams {
            title,
            description,
            category,
            tags,
            author,
        } = params;
        Self {
            id,
            title,
            description,
            author,
            category,
            tags,
            comments: Vec::new(),
            created_at,
        }
    }
}

/// A comment joined with its resolved author for display.
///
/// `author` is `None` when the reference no longer resolves; the view skips
/// the attribution rather than failing the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadComment {
    pub comment: Comment,
    pub author: Option<User>,
}

/// Detail-page read model: one discussion with related entities resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionThread {
    pub discussion: Discussion,
    pub author: Option<User>,
    pub comments: Vec<ThreadComment>,
}
