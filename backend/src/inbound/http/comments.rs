//! Comments controller.
//!
//! Comments have no index of their own: both a successful and a failed
//! creation bounce back to the parent discussion page, where the form lives.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::domain::ports::CommentPersistenceError;
use crate::domain::{Comment, CommentId, CommentParams, DiscussionId, Error};

use super::context::{PipelineContext, redirect_or_render};
use super::error::ApiResult;
use super::session::{FlashKind, SessionContext};
use super::state::HttpState;
use super::views::{self, PageChrome};

/// Form payload for a comment submission. `discussion` is a hidden field on
/// the parent discussion's page.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub content: String,
    pub discussion: String,
}

fn map_persistence_error(error: CommentPersistenceError) -> Error {
    match error {
        CommentPersistenceError::Connection { message } => Error::service_unavailable(message),
        CommentPersistenceError::Query { message } => Error::internal(message),
    }
}

/// Create step: one store insert, then flash and mark the next location.
async fn create_comment(
    state: &HttpState,
    session: &SessionContext,
    ctx: &mut PipelineContext<Comment>,
    form: &CommentForm,
) -> ApiResult<()> {
    let Some(author) = session.user_id()? else {
        session.flash(FlashKind::Error, "You must be logged in to comment.")?;
        ctx.set_next_location("/users/login");
        return Ok(());
    };

    let discussion = match DiscussionId::new(&form.discussion) {
        Ok(discussion) => discussion,
        Err(error) => {
            session.flash(
                FlashKind::Error,
                format!("Failed to create comment because: {error}."),
            )?;
            ctx.set_next_location("/discussions");
            return Ok(());
        }
    };

    ctx.set_next_location(format!("/discussions/{discussion}"));
    match CommentParams::try_new(&form.content, author, discussion) {
        Ok(params) => {
            let comment = Comment::from_params(CommentId::random(), params, Utc::now());
            match state.comments.insert(&comment).await {
                Ok(()) => {
                    session.flash(FlashKind::Success, "Comment added!")?;
                    ctx.record(comment);
                }
                Err(error) => {
                    warn!(%error, "failed to create comment");
                    session.flash(
                        FlashKind::Error,
                        format!("Failed to create comment because: {error}."),
                    )?;
                }
            }
        }
        Err(error) => {
            session.flash(
                FlashKind::Error,
                format!("Failed to create comment because: {error}."),
            )?;
        }
    }
    Ok(())
}

/// Delete step: failures are logged only and the redirect proceeds.
async fn delete_comment(state: &HttpState, ctx: &mut PipelineContext<()>, raw_id: &str) {
    ctx.set_next_location("/discussions");
    match CommentId::new(raw_id) {
        Ok(id) => {
            if let Err(error) = state.comments.delete(id).await {
                warn!(%error, %id, "failed to delete comment");
            }
        }
        Err(error) => warn!(%error, raw_id, "invalid comment id in delete"),
    }
}

/// `POST /comments/create`
#[post("/comments/create")]
pub async fn create(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CommentForm>,
) -> ApiResult<HttpResponse> {
    let mut ctx = PipelineContext::new();
    create_comment(&state, &session, &mut ctx, &form).await?;
    Ok(redirect_or_render(&ctx, || {
        views::html(views::discussions_index_page(&PageChrome::default(), &[]))
    }))
}

/// `GET /comments/{id}`
#[get("/comments/{id}")]
pub async fn show(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = CommentId::new(path.as_str())
        .map_err(|error| Error::invalid_request(format!("invalid comment id: {error}")))?;
    let view = state
        .comments
        .find_view(id)
        .await
        .map_err(map_persistence_error)?;
    let chrome = PageChrome::from_session(&session)?;
    Ok(views::html(views::comment_show_page(&chrome, view.as_ref())))
}

/// `DELETE /comments/{id}/delete`
#[delete("/comments/{id}/delete")]
pub async fn remove(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let mut ctx = PipelineContext::<()>::new();
    delete_comment(&state, &mut ctx, path.as_str()).await;
    Ok(redirect_or_render(&ctx, || {
        views::html(views::discussions_index_page(&PageChrome::default(), &[]))
    }))
}
