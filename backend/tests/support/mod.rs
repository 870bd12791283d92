//! In-memory doubles and app-assembly helpers shared by the integration
//! suites.

use std::sync::{Arc, Mutex};

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use async_trait::async_trait;
use chrono::Utc;

use backend::domain::ports::{
    CommentPersistenceError, CommentRepository, CredentialHashError, CredentialHasher,
    DiscussionPersistenceError, DiscussionRepository, UserPersistenceError, UserRepository,
};
use backend::domain::{
    Comment, CommentId, CommentParams, CommentView, Discussion, DiscussionId, DiscussionParams,
    DiscussionThread, PasswordHash, ThreadComment, User, UserId, UserParams, Username,
};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::security::StoreLoginService;
use backend::server::AppDependencies;

/// Shared backing state behind the three repository doubles.
#[derive(Default)]
pub struct BoardState {
    pub users: Vec<User>,
    pub discussions: Vec<Discussion>,
    pub comments: Vec<Comment>,
    pub fail_discussion_insert: bool,
    pub fail_discussion_delete: bool,
    pub fail_comment_insert: bool,
}

/// Handle to the shared state, cloned into each repository double.
#[derive(Clone, Default)]
pub struct InMemoryBoard {
    state: Arc<Mutex<BoardState>>,
}

impl InMemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a closure against the locked state.
    pub fn with<R>(&self, f: impl FnOnce(&mut BoardState) -> R) -> R {
        f(&mut self.state.lock().expect("board state lock"))
    }

    pub fn seed_user(&self, username: &str, password: &str) -> User {
        let user = User::new(
            UserId::random(),
            Username::new(username).expect("valid username"),
            PlainTextHasher.hash(password).expect("hashing succeeds"),
            Utc::now(),
        );
        self.with(|state| state.users.push(user.clone()));
        user
    }

    pub fn seed_discussion(&self, author: UserId, title: &str) -> Discussion {
        let params =
            DiscussionParams::try_new(title, "Share what you know.", "rust", "lifetimes", author)
                .expect("valid params");
        let discussion = Discussion::from_params(DiscussionId::random(), params, Utc::now());
        self.with(|state| state.discussions.push(discussion.clone()));
        discussion
    }

    pub fn seed_comment(&self, author: UserId, discussion: DiscussionId, content: &str) -> Comment {
        let params = CommentParams::try_new(content, author, discussion).expect("valid params");
        let comment = Comment::from_params(CommentId::random(), params, Utc::now());
        self.with(|state| {
            state.comments.push(comment.clone());
            if let Some(parent) = state
                .discussions
                .iter_mut()
                .find(|candidate| candidate.id == discussion)
            {
                parent.comments.push(comment.id);
            }
        });
        comment
    }
}

/// Hash double: the "hash" is the plaintext prefixed with `#`.
pub struct PlainTextHasher;

impl CredentialHasher for PlainTextHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError> {
        PasswordHash::new(format!("#{password}"))
            .map_err(|error| CredentialHashError::hash(error.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        hash.as_str() == format!("#{password}")
    }
}

pub struct InMemoryUsers(pub InMemoryBoard);

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.0.with(|state| state.users.push(user.clone()));
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.0.with(|state| state.users.clone()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.0.with(|state| {
            state
                .users
                .iter()
                .find(|user| user.id() == id)
                .cloned()
        }))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.0.with(|state| {
            state
                .users
                .iter()
                .find(|user| user.username().as_ref() == username)
                .cloned()
        }))
    }

    async fn update(&self, id: UserId, params: &UserParams) -> Result<(), UserPersistenceError> {
        self.0.with(|state| {
            if let Some(user) = state.users.iter_mut().find(|user| user.id() == id) {
                let created_at = user.created_at();
                *user = User::new(
                    id,
                    params.username().clone(),
                    params.password_hash().clone(),
                    created_at,
                );
            }
        });
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError> {
        self.0.with(|state| state.users.retain(|user| user.id() != id));
        Ok(())
    }
}

pub struct InMemoryDiscussions(pub InMemoryBoard);

#[async_trait]
impl DiscussionRepository for InMemoryDiscussions {
    async fn insert(&self, discussion: &Discussion) -> Result<(), DiscussionPersistenceError> {
        self.0.with(|state| {
            if state.fail_discussion_insert {
                return Err(DiscussionPersistenceError::query("injected insert failure"));
            }
            state.discussions.push(discussion.clone());
            Ok(())
        })
    }

    async fn find_all(&self) -> Result<Vec<Discussion>, DiscussionPersistenceError> {
        Ok(self.0.with(|state| state.discussions.clone()))
    }

    async fn find_by_id(
        &self,
        id: DiscussionId,
    ) -> Result<Option<Discussion>, DiscussionPersistenceError> {
        Ok(self.0.with(|state| {
            state
                .discussions
                .iter()
                .find(|discussion| discussion.id == id)
                .cloned()
        }))
    }

    async fn find_thread(
        &self,
        id: DiscussionId,
    ) -> Result<Option<DiscussionThread>, DiscussionPersistenceError> {
        Ok(self.0.with(|state| {
            let discussion = state
                .discussions
                .iter()
                .find(|discussion| discussion.id == id)
                .cloned()?;
            let find_author = |author: UserId| {
                state
                    .users
                    .iter()
                    .find(|user| user.id() == author)
                    .cloned()
            };
            let author = find_author(discussion.author);
            let comments = state
                .comments
                .iter()
                .filter(|comment| comment.discussion == id)
                .map(|comment| ThreadComment {
                    comment: comment.clone(),
                    author: find_author(comment.author),
                })
                .collect();
            Some(DiscussionThread {
                discussion,
                author,
                comments,
            })
        }))
    }

    async fn update(
        &self,
        id: DiscussionId,
        params: &DiscussionParams,
    ) -> Result<(), DiscussionPersistenceError> {
        self.0.with(|state| {
            if let Some(discussion) = state
                .discussions
                .iter_mut()
                .find(|discussion| discussion.id == id)
            {
                // Mirror the adapter's `$set`: only the fixed field-set moves.
                discussion.title = params.title().to_owned();
                discussion.description = params.description().to_owned();
                discussion.category = params.category().to_owned();
                discussion.tags = params.tags().to_vec();
                discussion.author = params.author();
            }
        });
        Ok(())
    }

    async fn delete(&self, id: DiscussionId) -> Result<(), DiscussionPersistenceError> {
        self.0.with(|state| {
            if state.fail_discussion_delete {
                return Err(DiscussionPersistenceError::query("injected delete failure"));
            }
            state.discussions.retain(|discussion| discussion.id != id);
            Ok(())
        })
    }
}

pub struct InMemoryComments(pub InMemoryBoard);

#[async_trait]
impl CommentRepository for InMemoryComments {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError> {
        self.0.with(|state| {
            if state.fail_comment_insert {
                return Err(CommentPersistenceError::query("injected insert failure"));
            }
            state.comments.push(comment.clone());
            if let Some(parent) = state
                .discussions
                .iter_mut()
                .find(|discussion| discussion.id == comment.discussion)
            {
                parent.comments.push(comment.id);
            }
            Ok(())
        })
    }

    async fn find_view(
        &self,
        id: CommentId,
    ) -> Result<Option<CommentView>, CommentPersistenceError> {
        Ok(self.0.with(|state| {
            let comment = state
                .comments
                .iter()
                .find(|comment| comment.id == id)
                .cloned()?;
            let author = state
                .users
                .iter()
                .find(|user| user.id() == comment.author)
                .cloned();
            Some(CommentView { comment, author })
        }))
    }

    async fn delete(&self, id: CommentId) -> Result<(), CommentPersistenceError> {
        self.0
            .with(|state| state.comments.retain(|comment| comment.id != id));
        Ok(())
    }
}

/// Build the handler state over the in-memory doubles.
pub fn test_state(board: &InMemoryBoard) -> HttpState {
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUsers(board.clone()));
    let hasher: Arc<dyn CredentialHasher> = Arc::new(PlainTextHasher);
    HttpState {
        users: users.clone(),
        discussions: Arc::new(InMemoryDiscussions(board.clone())),
        comments: Arc::new(InMemoryComments(board.clone())),
        login: Arc::new(StoreLoginService::new(users, hasher.clone())),
        hasher,
    }
}

/// Dependencies for `server::build_app` with relaxed cookie settings.
pub fn app_deps(board: &InMemoryBoard) -> AppDependencies {
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(test_state(board)),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

/// Extract the session cookie a response set.
pub fn session_cookie(res: &actix_web::dev::ServiceResponse) -> actix_web::cookie::Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Extract the redirect target of a response.
pub fn location(res: &actix_web::dev::ServiceResponse) -> &str {
    res.headers()
        .get(actix_web::http::header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
}

/// Log in through the full stack and hand back the session cookie.
pub async fn sign_in<S>(app: &S, username: &str, password: &str) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = actix_web::test::call_service(
        app,
        actix_web::test::TestRequest::post()
            .uri("/users/login")
            .set_form([("username", username), ("password", password)])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    session_cookie(&res)
}
