//! Users controller: registration, profile CRUD, and login/logout.
//!
//! Each route composes a small number of step functions with the shared
//! [`redirect_or_render`] terminal, mirroring the chain
//! `validate -> create -> redirect` the router declares per route.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::domain::ports::UserPersistenceError;
use crate::domain::{
    Error, ErrorCode, LoginCredentials, LoginValidationError, User, UserId, UserParams, Username,
};

use super::context::{PipelineContext, redirect_or_render};
use super::error::ApiResult;
use super::session::{FlashKind, SessionContext};
use super::state::HttpState;
use super::views::{self, PageChrome};

/// Form payload for registration and profile updates.
#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub username: String,
    pub password: String,
}

/// Form payload for login.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
    }
}

/// Validate the submitted field-set and hash the credential.
fn build_params(state: &HttpState, form: &UserForm) -> Result<UserParams, String> {
    if form.password.is_empty() {
        return Err(LoginValidationError::EmptyPassword.to_string());
    }
    let username = Username::new(&form.username).map_err(|error| error.to_string())?;
    let password_hash = state
        .hasher
        .hash(&form.password)
        .map_err(|error| error.to_string())?;
    Ok(UserParams::new(username, password_hash))
}

/// Create step: one store insert, then flash and mark the next location.
async fn create_user(
    state: &HttpState,
    session: &SessionContext,
    ctx: &mut PipelineContext<User>,
    form: &UserForm,
) -> ApiResult<()> {
    match build_params(state, form) {
        Ok(params) => {
            let user = params.into_user(UserId::random(), Utc::now());
            match state.users.insert(&user).await {
                Ok(()) => {
                    session.flash(
                        FlashKind::Success,
                        format!("{} created successfully!", user.username()),
                    )?;
                    ctx.set_next_location("/users");
                    ctx.record(user);
                }
                Err(error) => {
                    warn!(%error, "failed to create user");
                    session.flash(
                        FlashKind::Error,
                        format!("Failed to create user account because: {error}."),
                    )?;
                    ctx.set_next_location("/users/new");
                }
            }
        }
        Err(reason) => {
            session.flash(
                FlashKind::Error,
                format!("Failed to create user account because: {reason}."),
            )?;
            ctx.set_next_location("/users/new");
        }
    }
    Ok(())
}

/// Update step: failures are logged only and the redirect proceeds.
async fn update_user(
    state: &HttpState,
    ctx: &mut PipelineContext<()>,
    raw_id: &str,
    form: &UserForm,
) {
    ctx.set_next_location(format!("/users/{raw_id}"));
    let id = match UserId::new(raw_id) {
        Ok(id) => id,
        Err(error) => {
            warn!(%error, raw_id, "invalid user id in update");
            return;
        }
    };
    match build_params(state, form) {
        Ok(params) => {
            if let Err(error) = state.users.update(id, &params).await {
                warn!(%error, %id, "failed to update user");
            }
        }
        Err(reason) => warn!(%reason, %id, "invalid user update submission"),
    }
}

/// Delete step: failures are logged only and the redirect proceeds.
async fn delete_user(state: &HttpState, ctx: &mut PipelineContext<()>, raw_id: &str) {
    ctx.set_next_location("/users");
    match UserId::new(raw_id) {
        Ok(id) => {
            if let Err(error) = state.users.delete(id).await {
                warn!(%error, %id, "failed to delete user");
            }
        }
        Err(error) => warn!(%error, raw_id, "invalid user id in delete"),
    }
}

/// Login step: credential failures flash and bounce back to the form.
async fn authenticate(
    state: &HttpState,
    session: &SessionContext,
    ctx: &mut PipelineContext<User>,
    form: &LoginForm,
) -> ApiResult<()> {
    let credentials = match LoginCredentials::try_from_parts(&form.username, &form.password) {
        Ok(credentials) => credentials,
        Err(error) => {
            session.flash(FlashKind::Error, format!("Failed to log in because: {error}."))?;
            ctx.set_next_location("/users/login");
            return Ok(());
        }
    };

    match state.login.authenticate(&credentials).await {
        Ok(user) => {
            session.persist_user(&user)?;
            session.flash(
                FlashKind::Success,
                format!("Welcome back, {}!", user.username()),
            )?;
            ctx.set_next_location("/");
            ctx.record(user);
        }
        Err(error) if error.code() == ErrorCode::Unauthorized => {
            session.flash(FlashKind::Error, "Failed to log in: invalid username or password.")?;
            ctx.set_next_location("/users/login");
        }
        Err(error) => return Err(error),
    }
    Ok(())
}

/// `GET /users`
#[get("/users")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let users = state.users.find_all().await.map_err(map_persistence_error)?;
    let chrome = PageChrome::from_session(&session)?;
    Ok(views::html(views::users_index_page(&chrome, &users)))
}

/// `GET /users/new`
#[get("/users/new")]
pub async fn new_form(session: SessionContext) -> ApiResult<HttpResponse> {
    let chrome = PageChrome::from_session(&session)?;
    Ok(views::html(views::user_new_page(&chrome)))
}

/// `POST /users/create`
#[post("/users/create")]
pub async fn create(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<UserForm>,
) -> ApiResult<HttpResponse> {
    let mut ctx = PipelineContext::new();
    create_user(&state, &session, &mut ctx, &form).await?;
    Ok(redirect_or_render(&ctx, || {
        views::html(views::user_new_page(&PageChrome::default()))
    }))
}

/// `GET /users/login`
#[get("/users/login")]
pub async fn login_form(session: SessionContext) -> ApiResult<HttpResponse> {
    let chrome = PageChrome::from_session(&session)?;
    Ok(views::html(views::login_page(&chrome)))
}

/// `POST /users/login`
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let mut ctx = PipelineContext::new();
    authenticate(&state, &session, &mut ctx, &form).await?;
    Ok(redirect_or_render(&ctx, || {
        views::html(views::login_page(&PageChrome::default()))
    }))
}

/// `GET /users/logout`
#[get("/users/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    let mut ctx = PipelineContext::<()>::new();
    session.forget_user();
    session.flash(FlashKind::Success, "You have been logged out!")?;
    ctx.set_next_location("/");
    Ok(redirect_or_render(&ctx, || {
        views::html(views::home_page(&PageChrome::default()))
    }))
}

/// `GET /users/{id}`
#[get("/users/{id}")]
pub async fn show(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = UserId::new(path.as_str())
        .map_err(|error| Error::invalid_request(format!("invalid user id: {error}")))?;
    let user = state
        .users
        .find_by_id(id)
        .await
        .map_err(map_persistence_error)?;
    let chrome = PageChrome::from_session(&session)?;
    Ok(views::html(views::user_show_page(&chrome, user.as_ref())))
}

/// `GET /users/{id}/edit`
#[get("/users/{id}/edit")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = UserId::new(path.as_str())
        .map_err(|error| Error::invalid_request(format!("invalid user id: {error}")))?;
    let user = state
        .users
        .find_by_id(id)
        .await
        .map_err(map_persistence_error)?;
    let chrome = PageChrome::from_session(&session)?;
    Ok(views::html(views::user_edit_page(&chrome, user.as_ref())))
}

/// `PUT /users/{id}/update`
#[put("/users/{id}/update")]
pub async fn update(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    form: web::Form<UserForm>,
) -> ApiResult<HttpResponse> {
    let mut ctx = PipelineContext::<()>::new();
    update_user(&state, &mut ctx, path.as_str(), &form).await;
    Ok(redirect_or_render(&ctx, || {
        views::html(views::user_edit_page(&PageChrome::default(), None))
    }))
}

/// `DELETE /users/{id}/delete`
#[delete("/users/{id}/delete")]
pub async fn remove(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let mut ctx = PipelineContext::<()>::new();
    delete_user(&state, &mut ctx, path.as_str()).await;
    Ok(redirect_or_render(&ctx, || {
        views::html(views::users_index_page(&PageChrome::default(), &[]))
    }))
}
