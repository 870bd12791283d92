//! Per-request pipeline state shared between chained handler steps.
//!
//! Controller steps communicate through an explicit context object instead of
//! framework-attached request extensions, which keeps the coupling between a
//! mutating step and the terminal redirect step visible in the signatures.

use actix_web::HttpResponse;
use actix_web::http::header;

/// Mutable state a controller step hands to the next step in its chain.
///
/// `T` is the entity a creating step records for later steps in the same
/// chain; chains that never record anything use the `()` default.
#[derive(Debug)]
pub struct PipelineContext<T = ()> {
    next_location: Option<String>,
    entity: Option<T>,
}

impl<T> PipelineContext<T> {
    /// Fresh context at the start of a handler chain.
    pub fn new() -> Self {
        Self {
            next_location: None,
            entity: None,
        }
    }

    /// Mark where the terminal step should redirect to.
    pub fn set_next_location(&mut self, path: impl Into<String>) {
        self.next_location = Some(path.into());
    }

    /// Redirect target set by an earlier step, if any.
    pub fn next_location(&self) -> Option<&str> {
        self.next_location.as_deref()
    }

    /// Record an entity for potential use by the next step.
    pub fn record(&mut self, entity: T) {
        self.entity = Some(entity);
    }

    /// Entity recorded by an earlier step, if any.
    pub fn entity(&self) -> Option<&T> {
        self.entity.as_ref()
    }
}

impl<T> Default for PipelineContext<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared terminal step for every controller chain.
///
/// Redirects with `303 See Other` when an earlier step marked a next
/// location, so verbs submitted through the POST override re-fetch the
/// target with GET. Otherwise the supplied render fallback terminates the
/// chain.
pub fn redirect_or_render<T, F>(ctx: &PipelineContext<T>, render: F) -> HttpResponse
where
    F: FnOnce() -> HttpResponse,
{
    match ctx.next_location() {
        Some(path) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, path))
            .finish(),
        None => render(),
    }
}
