//! Core domain logic for inkwell.
//! This crate is the single source of truth for ownership, content-shape and
//! word-count invariants.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use auth::{
    authorize_block_access, authorize_page_access, resolve_current_user, Denial,
};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogSink,
};
pub use model::block::{Block, BlockId};
pub use model::content::{count_words, word_count, BlockContent, BlockKind, ContentError, TodoItem};
pub use model::page::{Page, PageId, PageValidationError, PAGE_TITLE_MAX_CHARS};
pub use model::user::{CredentialError, Credentials, User, UserId};
pub use repo::block_repo::{BlockRepository, SqliteBlockRepository};
pub use repo::page_repo::{PageRepository, SqlitePageRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::AccountService;
pub use service::block_service::{BlockEdit, BlockService, NewBlock};
pub use service::error::{ErrorKind, ServiceError};
pub use service::page_service::{PageDeletion, PageService};
pub use service::stats_service::{user_stats, UserStats};
pub use stats::{level_info, LevelInfo, WordChange};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
