//! User account model and login credentials.

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use uuid::Uuid;

/// Stable user identifier.
pub type UserId = Uuid;

/// Maximum username length in characters.
pub const USERNAME_MAX_CHARS: usize = 64;

/// Registered account.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// PHC-formatted credential digest.
    pub password_hash: String,
    /// Lifetime word count. Only adjusted through word accounting.
    pub word_count: u64,
}

impl User {
    /// Creates a fresh account with a zero word count.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            word_count: 0,
        }
    }
}

impl Debug for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("word_count", &self.word_count)
            .finish()
    }
}

/// Validated username/password pair.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

/// Credential validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    EmptyUsername,
    UsernameTooLong { max: usize },
    EmptyPassword,
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl Error for CredentialError {}

impl Credentials {
    /// Validates raw inputs. The username is trimmed; the password is kept verbatim.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CredentialError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX_CHARS {
            return Err(CredentialError::UsernameTooLong {
                max: USERNAME_MAX_CHARS,
            });
        }
        if password.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
