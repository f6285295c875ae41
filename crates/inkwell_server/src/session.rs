//! Session wrapper so handlers only deal with the logged-in user id.

use crate::error::ApiError;
use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use inkwell_core::UserId;
use log::warn;

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Higher-level view over the cookie session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Stores `user_id` under a fresh session id.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), ApiError> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|err| ApiError::internal(format!("failed to persist session: {err}")))
    }

    /// The session's user id, if any. A tampered value reads as logged out.
    pub fn user_id(&self) -> Result<Option<UserId>, ApiError> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|err| ApiError::internal(format!("failed to read session: {err}")))?;
        Ok(raw.and_then(|raw| match UserId::parse_str(&raw) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!("event=session_read module=http status=invalid_user_id error={err}");
                None
            }
        }))
    }

    /// Drops all session state and expires the cookie.
    pub fn clear(&self) {
        self.0.purge();
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
