//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod comment_repository;
mod credential_hasher;
mod discussion_repository;
mod login_service;
mod user_repository;

pub use comment_repository::{CommentPersistenceError, CommentRepository};
pub use credential_hasher::{CredentialHashError, CredentialHasher};
pub use discussion_repository::{DiscussionPersistenceError, DiscussionRepository};
pub use login_service::LoginService;
pub use user_repository::{UserPersistenceError, UserRepository};
