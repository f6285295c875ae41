//! HTTP adapter for inkwell.
//!
//! # Responsibility
//! - Map JSON requests onto `inkwell_core` services.
//! - Own the cookie session, CORS policy and error rendering.
//!
//! # Invariants
//! - Every page/block/stats route resolves the session user before calling a
//!   service; no handler reads another user's data.
//! - Error bodies are always `{"error", "message"}` JSON.

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod state;

use actix_cors::Cors;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Key, SameSite};
use actix_web::http::header;
use actix_web::web;

pub use config::{ConfigError, ServerConfig, ServerSettings};
pub use error::{ApiError, ApiResult};
pub use session::SessionContext;
pub use state::AppState;

pub const SESSION_COOKIE_NAME: &str = "session";

/// Registers every route plus the JSON/path extractor error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| ApiError::not_found("resource not found").into()),
    )
    .service(api::health::health)
    .service(api::auth::register)
    .service(api::auth::login)
    .service(api::auth::logout)
    .service(api::pages::list_pages)
    .service(api::pages::create_page)
    .service(api::pages::rename_page)
    .service(api::pages::delete_page)
    .service(api::blocks::list_blocks)
    .service(api::blocks::create_block)
    .service(api::blocks::update_block)
    .service(api::blocks::delete_block)
    .service(api::users::stats);
}

/// Encrypted cookie session holding only the user id.
///
/// Secure cookies use `SameSite=None` so a cross-origin frontend can send
/// them; plain-HTTP development cookies fall back to `Lax`.
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    let same_site = if secure {
        SameSite::None
    } else {
        SameSite::Lax
    };
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.into())
        .cookie_path("/".into())
        .cookie_secure(secure)
        .cookie_http_only(true)
        .cookie_same_site(same_site)
        .cookie_content_security(CookieContentSecurity::Private)
        .build()
}

/// CORS policy admitting only `origin`, with credentials.
pub fn cors_layer(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}
