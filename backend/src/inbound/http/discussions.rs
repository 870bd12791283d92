//! Discussions controller.
//!
//! Creation failures are surfaced to the user through flash messages and a
//! bounce back to the form; update and delete failures are logged server-side
//! only while the redirect proceeds regardless.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::domain::ports::DiscussionPersistenceError;
use crate::domain::{Discussion, DiscussionId, DiscussionParams, Error};

use super::context::{PipelineContext, redirect_or_render};
use super::error::ApiResult;
use super::session::{FlashKind, SessionContext};
use super::state::HttpState;
use super::views::{self, PageChrome};

/// Form payload shared by the create and update submissions.
#[derive(Debug, Deserialize)]
pub struct DiscussionForm {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: String,
}

fn map_persistence_error(error: DiscussionPersistenceError) -> Error {
    match error {
        DiscussionPersistenceError::Connection { message } => Error::service_unavailable(message),
        DiscussionPersistenceError::Query { message } => Error::internal(message),
    }
}

/// Create step: one store insert, then flash and mark the next location.
async fn create_discussion(
    state: &HttpState,
    session: &SessionContext,
    ctx: &mut PipelineContext<Discussion>,
    form: &DiscussionForm,
) -> ApiResult<()> {
    let Some(author) = session.user_id()? else {
        session.flash(FlashKind::Error, "You must be logged in to start a discussion.")?;
        ctx.set_next_location("/users/login");
        return Ok(());
    };

    match DiscussionParams::try_new(
        &form.title,
        &form.description,
        &form.category,
        &form.tags,
        author,
    ) {
        Ok(params) => {
            let discussion = Discussion::from_params(DiscussionId::random(), params, Utc::now());
            match state.discussions.insert(&discussion).await {
                Ok(()) => {
                    session.flash(
                        FlashKind::Success,
                        format!("{} created successfully!", discussion.title),
                    )?;
                    ctx.set_next_location("/discussions");
                    ctx.record(discussion);
                }
                Err(error) => {
                    warn!(%error, "failed to create discussion");
                    session.flash(
                        FlashKind::Error,
                        format!("Failed to create discussion because: {error}."),
                    )?;
                    ctx.set_next_location("/discussions/new");
                }
            }
        }
        Err(error) => {
            session.flash(
                FlashKind::Error,
                format!("Failed to create discussion because: {error}."),
            )?;
            ctx.set_next_location("/discussions/new");
        }
    }
    Ok(())
}

/// Update step: failures are logged only and the redirect proceeds.
async fn update_discussion(
    state: &HttpState,
    session: &SessionContext,
    ctx: &mut PipelineContext<()>,
    raw_id: &str,
    form: &DiscussionForm,
) -> ApiResult<()> {
    ctx.set_next_location(format!("/discussions/{raw_id}"));
    let Some(author) = session.user_id()? else {
        warn!(raw_id, "discussion update without a signed-in user");
        return Ok(());
    };
    let id = match DiscussionId::new(raw_id) {
        Ok(id) => id,
        Err(error) => {
            warn!(%error, raw_id, "invalid discussion id in update");
            return Ok(());
        }
    };
    match DiscussionParams::try_new(
        &form.title,
        &form.description,
        &form.category,
        &form.tags,
        author,
    ) {
        Ok(params) => {
            if let Err(error) = state.discussions.update(id, &params).await {
                warn!(%error, %id, "failed to update discussion");
            }
        }
        Err(error) => warn!(%error, %id, "invalid discussion update submission"),
    }
    Ok(())
}

/// Delete step: failures are logged only and the redirect proceeds.
async fn delete_discussion(state: &HttpState, ctx: &mut PipelineContext<()>, raw_id: &str) {
    ctx.set_next_location("/discussions");
    match DiscussionId::new(raw_id) {
        Ok(id) => {
            if let Err(error) = state.discussions.delete(id).await {
                warn!(%error, %id, "failed to delete discussion");
            }
        }
        Err(error) => warn!(%error, raw_id, "invalid discussion id in delete"),
    }
}

/// `GET /discussions`
#[get("/discussions")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let discussions = state
        .discussions
        .find_all()
        .await
        .map_err(map_persistence_error)?;
    let chrome = PageChrome::from_session(&session)?;
    Ok(views::html(views::discussions_index_page(
        &chrome,
        &discussions,
    )))
}

/// `GET /discussions/new`
#[get("/discussions/new")]
pub async fn new_form(session: SessionContext) -> ApiResult<HttpResponse> {
    let chrome = PageChrome::from_session(&session)?;
    Ok(views::html(views::discussion_new_page(&chrome)))
}

/// `POST /discussions/create`
#[post("/discussions/create")]
pub async fn create(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<DiscussionForm>,
) -> ApiResult<HttpResponse> {
    let mut ctx = PipelineContext::new();
    create_discussion(&state, &session, &mut ctx, &form).await?;
    Ok(redirect_or_render(&ctx, || {
        views::html(views::discussion_new_page(&PageChrome::default()))
    }))
}

/// `GET /discussions/{id}`
#[get("/discussions/{id}")]
pub async fn show(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = DiscussionId::new(path.as_str())
        .map_err(|error| Error::invalid_request(format!("invalid discussion id: {error}")))?;
    let thread = state
        .discussions
        .find_thread(id)
        .await
        .map_err(map_persistence_error)?;
    let chrome = PageChrome::from_session(&session)?;
    Ok(views::html(views::discussion_show_page(
        &chrome,
        thread.as_ref(),
    )))
}

/// `GET /discussions/{id}/edit`
#[get("/discussions/{id}/edit")]
pub async fn edit_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = DiscussionId::new(path.as_str())
        .map_err(|error| Error::invalid_request(format!("invalid discussion id: {error}")))?;
    let discussion = state
        .discussions
        .find_by_id(id)
        .await
        .map_err(map_persistence_error)?;
    let chrome = PageChrome::from_session(&session)?;
    Ok(views::html(views::discussion_edit_page(
        &chrome,
        discussion.as_ref(),
    )))
}

/// `PUT /discussions/{id}/update`
#[put("/discussions/{id}/update")]
pub async fn update(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<DiscussionForm>,
) -> ApiResult<HttpResponse> {
    let mut ctx = PipelineContext::<()>::new();
    update_discussion(&state, &session, &mut ctx, path.as_str(), &form).await?;
    Ok(redirect_or_render(&ctx, || {
        views::html(views::discussion_edit_page(&PageChrome::default(), None))
    }))
}

/// `DELETE /discussions/{id}/delete`
#[delete("/discussions/{id}/delete")]
pub async fn remove(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let mut ctx = PipelineContext::<()>::new();
    delete_discussion(&state, &mut ctx, path.as_str()).await;
    Ok(redirect_or_render(&ctx, || {
        views::html(views::discussions_index_page(&PageChrome::default(), &[]))
    }))
}
