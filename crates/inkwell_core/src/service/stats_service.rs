//! User statistics projection.

use crate::model::user::User;
use crate::stats::level::level_info;
use serde::Serialize;

/// Read model for the stats endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub username: String,
    pub word_count: u64,
    pub level: u32,
    pub progress: u64,
    pub next_level_words: u64,
}

/// Derives display statistics from a freshly resolved user.
pub fn user_stats(user: &User) -> UserStats {
    let info = level_info(user.word_count);
    UserStats {
        username: user.username.clone(),
        word_count: user.word_count,
        level: info.level,
        progress: info.progress,
        next_level_words: info.next_level_words,
    }
}
