//! Service error taxonomy shared by every use-case service.
//!
//! Adapters map `ErrorKind` to their own status vocabulary; the variants keep
//! enough detail for logs without leaking it through `kind()`.

use crate::model::content::ContentError;
use crate::model::page::PageValidationError;
use crate::model::user::CredentialError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Coarse failure class for adapter-level mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

/// Error returned by use-case services.
#[derive(Debug)]
pub enum ServiceError {
    /// No valid session, or the session user no longer exists.
    Unauthorized,
    /// Username/password pair did not match an account.
    InvalidCredentials,
    /// Resource exists but belongs to another user.
    Forbidden { entity: &'static str, id: Uuid },
    /// Resource does not exist (or is concealed from the caller).
    NotFound { entity: &'static str, id: Uuid },
    /// Request input is malformed.
    Validation(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Failure outside persistence, e.g. credential hashing.
    Internal(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => ErrorKind::Unauthorized,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Repo(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "authentication required"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::Forbidden { entity, id } => write!(f, "{entity} {id} belongs to another user"),
            Self::NotFound { entity, .. } => write!(f, "{entity} not found"),
            Self::Validation(message) => write!(f, "{message}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Internal(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::Conflict(message) => Self::Validation(message),
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

impl From<ContentError> for ServiceError {
    fn from(value: ContentError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<PageValidationError> for ServiceError {
    fn from(value: PageValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<CredentialError> for ServiceError {
    fn from(value: CredentialError) -> Self {
        Self::Validation(value.to_string())
    }
}
