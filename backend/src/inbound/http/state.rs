//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CommentRepository, CredentialHasher, DiscussionRepository, LoginService, UserRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRepository>,
    pub discussions: Arc<dyn DiscussionRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub login: Arc<dyn LoginService>,
    pub hasher: Arc<dyn CredentialHasher>,
}
