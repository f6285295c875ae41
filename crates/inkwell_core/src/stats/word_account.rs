//! Incremental lifetime word-count bookkeeping.
//!
//! # Responsibility
//! - Translate one block mutation into a word-count delta.
//! - Apply the delta to the owner's stored total in O(1).
//!
//! # Invariants
//! - Creation adds the new block's words.
//! - Edits add only net additions; removing words never lowers the total.
//! - Deletion subtracts the block's words, clamped at zero.
//! - The total is never recomputed from a scan of the user's blocks.
//! - Callers record the change on the same transaction as the block write.

use crate::model::content::BlockContent;
use crate::model::user::UserId;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;
use log::debug;

/// One block mutation, as seen by word accounting.
#[derive(Debug, Clone, Copy)]
pub enum WordChange<'a> {
    Created(&'a BlockContent),
    Edited {
        before: &'a BlockContent,
        after: &'a BlockContent,
    },
    Removed(&'a BlockContent),
}

impl WordChange<'_> {
    /// Signed adjustment to apply to the lifetime total.
    pub fn delta(&self) -> i64 {
        match self {
            Self::Created(content) => words_as_delta(content.word_count()),
            Self::Edited { before, after } => {
                words_as_delta(after.word_count().saturating_sub(before.word_count()))
            }
            Self::Removed(content) => -words_as_delta(content.word_count()),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Edited { .. } => "edited",
            Self::Removed(_) => "removed",
        }
    }
}

/// Applies `change` to `owner`'s lifetime word count and returns the new total.
pub fn record_change(
    users: &impl UserRepository,
    owner: UserId,
    change: WordChange<'_>,
) -> RepoResult<u64> {
    let delta = change.delta();
    let total = users.adjust_word_count(owner, delta)?;
    debug!(
        "event=word_count_adjust module=stats status=ok change={} delta={delta} total={total}",
        change.label()
    );
    Ok(total)
}

/// Subtracts the words of several removed blocks in one adjustment.
pub fn record_removals<'a>(
    users: &impl UserRepository,
    owner: UserId,
    removed: impl IntoIterator<Item = &'a BlockContent>,
) -> RepoResult<u64> {
    let words = removed
        .into_iter()
        .map(BlockContent::word_count)
        .fold(0u64, u64::saturating_add);
    let total = users.adjust_word_count(owner, -words_as_delta(words))?;
    debug!(
        "event=word_count_adjust module=stats status=ok change=removed_many words={words} total={total}"
    );
    Ok(total)
}

fn words_as_delta(words: u64) -> i64 {
    i64::try_from(words).unwrap_or(i64::MAX)
}
