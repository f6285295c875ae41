//! Registration, login and logout.

use crate::api::MessageBody;
use crate::error::ApiResult;
use crate::session::SessionContext;
use crate::state::AppState;
use actix_web::{post, web, HttpResponse};
use inkwell_core::{AccountService, Credentials, ServiceError};
use log::info;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    pub username: String,
    pub password: String,
}

impl CredentialsBody {
    fn into_credentials(self) -> Result<Credentials, ServiceError> {
        Ok(Credentials::try_from_parts(&self.username, &self.password)?)
    }

    /// Blank input on login is just a failed login.
    fn into_login_credentials(self) -> Result<Credentials, ServiceError> {
        Credentials::try_from_parts(&self.username, &self.password)
            .map_err(|_| ServiceError::InvalidCredentials)
    }
}

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<CredentialsBody>,
) -> ApiResult<HttpResponse> {
    let credentials = body.into_inner().into_credentials()?;
    state
        .run(move |conn| AccountService::new(conn).register(&credentials))
        .await?;
    Ok(HttpResponse::Created().json(MessageBody::new("user registered")))
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    session: SessionContext,
    body: web::Json<CredentialsBody>,
) -> ApiResult<HttpResponse> {
    let credentials = body.into_inner().into_login_credentials()?;
    let user = state
        .run(move |conn| AccountService::new(conn).login(&credentials))
        .await?;
    session.persist_user(user.id)?;
    Ok(HttpResponse::Ok().json(MessageBody::new("logged in")))
}

#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    if let Some(user_id) = session.user_id()? {
        info!("event=logout module=http status=ok user_id={user_id}");
    }
    session.clear();
    Ok(HttpResponse::Ok().json(MessageBody::new("logged out")))
}
