//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting or reading the authenticated
//! principal, and queueing flash messages for the next request.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, User, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USERNAME_KEY: &str = "username";
pub(crate) const FLASH_KEY: &str = "flash";

/// Category of a one-time notification, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

/// One-time notification stored for exactly one subsequent request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub message: String,
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's identity in the session cookie.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user.id().to_string())
            .and_then(|()| self.0.insert(USERNAME_KEY, user.username().as_ref()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop the authenticated identity, keeping the rest of the session.
    pub fn forget_user(&self) {
        self.0.remove(USER_ID_KEY);
        self.0.remove(USERNAME_KEY);
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Fetch the signed-in username for display, if present.
    pub fn username(&self) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(USERNAME_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Queue a flash message for the next rendered page.
    pub fn flash(&self, kind: FlashKind, message: impl Into<String>) -> Result<(), Error> {
        let mut messages = self.pending_flash()?;
        messages.push(FlashMessage {
            kind,
            message: message.into(),
        });
        self.0
            .insert(FLASH_KEY, messages)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drain queued flash messages; a second call returns nothing.
    pub fn take_flash(&self) -> Result<Vec<FlashMessage>, Error> {
        let messages = self.pending_flash()?;
        self.0.remove(FLASH_KEY);
        Ok(messages)
    }

    fn pending_flash(&self) -> Result<Vec<FlashMessage>, Error> {
        Ok(self
            .0
            .get::<Vec<FlashMessage>>(FLASH_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?
            .unwrap_or_default())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
