//! HTTP mapping for service failures.
//!
//! Every failure renders as `{"error": "<kind>", "message": "<text>"}`.
//! Internal failures are logged in full and rendered with a fixed message.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use inkwell_core::{ErrorKind, ServiceError};
use log::error;
use serde::Serialize;
use std::fmt::{Display, Formatter};

pub type ApiResult<T> = Result<T, ApiError>;

const INTERNAL_MESSAGE: &str = "internal server error";

/// Client-facing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: &'a str,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Logs `detail` and returns a redacted internal error.
    pub fn internal(detail: impl Display) -> Self {
        error!("event=request_failed module=http status=error detail={detail}");
        Self::new(ErrorKind::Internal, INTERNAL_MESSAGE)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value.kind() {
            ErrorKind::Internal => Self::internal(&value),
            kind => Self::new(kind, value.to_string()),
        }
    }
}

/// Recovers the client error behind a failed extractor.
///
/// Handlers take their body and path as `Result<_, ApiError>` so the
/// session check can run first; the failure is surfaced afterwards.
impl From<actix_web::Error> for ApiError {
    fn from(err: actix_web::Error) -> Self {
        if let Some(api_error) = err.as_error::<ApiError>() {
            return api_error.clone();
        }
        match err.as_response_error().status_code() {
            StatusCode::NOT_FOUND => Self::not_found("resource not found"),
            status if status.is_client_error() => Self::validation(err.to_string()),
            _ => Self::internal(err),
        }
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(self.kind)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.kind.as_str(),
            message: &self.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::RepoError;
    use uuid::Uuid;

    #[test]
    fn service_errors_keep_their_kind() {
        let forbidden: ApiError = ServiceError::Forbidden {
            entity: "page",
            id: Uuid::nil(),
        }
        .into();
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

        let invalid: ApiError = ServiceError::InvalidCredentials.into();
        assert_eq!(invalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.message(), "invalid credentials");
    }

    #[test]
    fn extractor_errors_keep_their_api_error() {
        let wrapped: actix_web::Error = ApiError::not_found("resource not found").into();
        assert_eq!(ApiError::from(wrapped).kind(), ErrorKind::NotFound);

        let payload = actix_web::error::ErrorBadRequest("expected value at line 1");
        let err = ApiError::from(payload);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.message().contains("expected value"));
    }

    #[test]
    fn persistence_failures_are_redacted() {
        let err: ApiError =
            ServiceError::Repo(RepoError::InvalidData("blocks.content: bad json".into())).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), INTERNAL_MESSAGE);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
