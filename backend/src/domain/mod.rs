//! Domain entities, read models, and ports.
//!
//! Purpose: define the strongly typed resources of the discussion board
//! (users, discussions, comments) together with the validation rules their
//! constructors enforce. Inbound adapters parse requests into these types;
//! outbound adapters translate them to and from store documents.

pub mod auth;
pub mod comment;
pub mod discussion;
pub mod error;
pub mod id;
pub mod ports;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::comment::{Comment, CommentId, CommentParams, CommentValidationError, CommentView};
pub use self::discussion::{
    Discussion, DiscussionId, DiscussionParams, DiscussionThread, DiscussionValidationError,
    ThreadComment,
};
pub use self::error::{Error, ErrorCode};
pub use self::id::IdValidationError;
pub use self::user::{PasswordHash, User, UserId, UserParams, UserValidationError, Username};
