//! Route handlers.
//!
//! Handlers resolve the session user inside the same blocking job as the
//! service call, so a user deleted between requests reads as logged out.

pub mod auth;
pub mod blocks;
pub mod health;
pub mod pages;
pub mod users;

use inkwell_core::{AccountService, ServiceError, User, UserId};
use rusqlite::Connection;
use serde::Serialize;

fn current_user(conn: &Connection, session_user: Option<UserId>) -> Result<User, ServiceError> {
    AccountService::new(conn).current_user(session_user)
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

impl MessageBody {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}
