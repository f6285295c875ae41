//! Account use-case service: registration, login, session resolution.
//!
//! # Invariants
//! - Passwords are stored only as Argon2id PHC strings.
//! - Unknown usernames and wrong passwords are indistinguishable to callers.

use crate::auth::password::{hash_password, verify_password};
use crate::auth::scope::require_current_user;
use crate::model::user::{Credentials, User, UserId};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::service::error::ServiceError;
use log::{info, warn};
use rusqlite::Connection;

/// Account service over a migrated connection.
pub struct AccountService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> AccountService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Registers a new account with a zero word count.
    ///
    /// # Errors
    /// - `Validation` when the username is already taken.
    pub fn register(&self, credentials: &Credentials) -> Result<User, ServiceError> {
        let users = SqliteUserRepository::new(self.conn);
        if users.find_by_username(credentials.username())?.is_some() {
            return Err(ServiceError::Validation("user already exists".to_string()));
        }

        let password_hash = hash_password(credentials.password())?;
        let user = User::new(credentials.username(), password_hash);
        users.create_user(&user)?;

        info!(
            "event=user_register module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Checks credentials and returns the matching user.
    pub fn login(&self, credentials: &Credentials) -> Result<User, ServiceError> {
        let users = SqliteUserRepository::new(self.conn);
        let Some(user) = users.find_by_username(credentials.username())? else {
            warn!("event=user_login module=service status=denied reason=unknown_user");
            return Err(ServiceError::InvalidCredentials);
        };

        if !verify_password(credentials.password(), &user.password_hash)? {
            warn!(
                "event=user_login module=service status=denied reason=bad_password user_id={}",
                user.id
            );
            return Err(ServiceError::InvalidCredentials);
        }

        info!("event=user_login module=service status=ok user_id={}", user.id);
        Ok(user)
    }

    /// Resolves the session's user id into a live account or `Unauthorized`.
    pub fn current_user(&self, session_user: Option<UserId>) -> Result<User, ServiceError> {
        require_current_user(&SqliteUserRepository::new(self.conn), session_user)
    }
}
