//! Static page handlers.

use actix_web::{HttpResponse, get};

use super::error::ApiResult;
use super::session::SessionContext;
use super::views::{self, PageChrome};

/// Landing page.
#[get("/")]
pub async fn home(session: SessionContext) -> ApiResult<HttpResponse> {
    let chrome = PageChrome::from_session(&session)?;
    Ok(views::html(views::home_page(&chrome)))
}

/// About page.
#[get("/about")]
pub async fn about(session: SessionContext) -> ApiResult<HttpResponse> {
    let chrome = PageChrome::from_session(&session)?;
    Ok(views::html(views::about_page(&chrome)))
}
