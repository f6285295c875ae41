//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - Usernames are unique.
//! - `word_count` is only changed through `adjust_word_count`, which clamps
//!   at zero in the same statement.

use super::{is_unique_violation, parse_uuid, RepoError, RepoResult};
use crate::model::user::{User, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, username, password_hash, word_count FROM users";

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Inserts a new user. Returns `Conflict` when the username is taken.
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    /// Adds `delta` to the lifetime word count, clamped at zero, and returns
    /// the stored result.
    fn adjust_word_count(&self, id: UserId, delta: i64) -> RepoResult<u64>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        let word_count = i64::try_from(user.word_count)
            .map_err(|_| RepoError::InvalidData("word_count exceeds i64".to_string()))?;
        self.conn
            .execute(
                "INSERT INTO users (id, username, password_hash, word_count)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    user.id.to_string(),
                    user.username.as_str(),
                    user.password_hash.as_str(),
                    word_count,
                ],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::Conflict(format!("username `{}` already exists", user.username))
                } else {
                    RepoError::from(err)
                }
            })?;
        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE username = ?1;"))?;
        let mut rows = stmt.query([username])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }

    fn adjust_word_count(&self, id: UserId, delta: i64) -> RepoResult<u64> {
        let stored: Option<i64> = self
            .conn
            .query_row(
                "UPDATE users
                 SET word_count = MAX(word_count + ?2, 0)
                 WHERE id = ?1
                 RETURNING word_count;",
                params![id.to_string(), delta],
                |row| row.get(0),
            )
            .optional()?;

        let stored = stored.ok_or(RepoError::NotFound { entity: "user", id })?;
        u64::try_from(stored)
            .map_err(|_| RepoError::InvalidData(format!("negative word_count `{stored}`")))
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    let word_count: i64 = row.get("word_count")?;
    let word_count = u64::try_from(word_count).map_err(|_| {
        RepoError::InvalidData(format!("invalid word_count `{word_count}` in users.word_count"))
    })?;

    Ok(User {
        id: parse_uuid(&id_text, "users.id")?,
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
        word_count,
    })
}
