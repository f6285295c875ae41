//! Session-to-user resolution and ownership checks.
//!
//! # Invariants
//! - Every page/block operation runs against an explicitly resolved `User`.
//! - Page ownership is `page.owner_id == user.id`.
//! - Block ownership is always resolved through the parent page; blocks carry
//!   no owner field to check directly.
//! - Unknown resources are `NotFound`. Foreign resources are `Forbidden` or
//!   `NotFound` depending on the caller's `Denial` policy.

use crate::model::block::{Block, BlockId};
use crate::model::page::{Page, PageId};
use crate::model::user::{User, UserId};
use crate::repo::block_repo::BlockRepository;
use crate::repo::page_repo::PageRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;
use crate::service::error::ServiceError;
use log::warn;

/// How a wrong-owner lookup is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Report the resource as existing but off limits. Used by mutations.
    Forbidden,
    /// Report the resource as missing. Used by read-through-id lookups.
    Conceal,
}

/// Resolves the user referenced by a session.
///
/// Returns `None` when there is no session user or the user no longer exists.
pub fn resolve_current_user(
    users: &impl UserRepository,
    session_user: Option<UserId>,
) -> RepoResult<Option<User>> {
    match session_user {
        Some(id) => users.get_user(id),
        None => Ok(None),
    }
}

/// Like [`resolve_current_user`], but an absent user is `Unauthorized`.
pub fn require_current_user(
    users: &impl UserRepository,
    session_user: Option<UserId>,
) -> Result<User, ServiceError> {
    resolve_current_user(users, session_user)?.ok_or(ServiceError::Unauthorized)
}

/// True iff `page` exists and is owned by `user`.
pub fn authorize_page_access(user: &User, page: Option<&Page>) -> bool {
    page.is_some_and(|page| page.owner_id == user.id)
}

/// True iff the block's parent page exists and is owned by `user`.
pub fn authorize_block_access(
    user: &User,
    block: &Block,
    pages: &impl PageRepository,
) -> RepoResult<bool> {
    let page = pages.get_page(block.page_id)?;
    Ok(authorize_page_access(user, page.as_ref()))
}

/// Loads a page the user owns.
pub fn owned_page(
    pages: &impl PageRepository,
    user: &User,
    page_id: PageId,
    denial: Denial,
) -> Result<Page, ServiceError> {
    match pages.get_page(page_id)? {
        None => Err(ServiceError::NotFound {
            entity: "page",
            id: page_id,
        }),
        Some(page) if authorize_page_access(user, Some(&page)) => Ok(page),
        Some(_) => {
            warn!(
                "event=access_denied module=auth status=denied entity=page id={page_id} user_id={}",
                user.id
            );
            Err(deny("page", page_id, denial))
        }
    }
}

/// Loads a block whose parent page the user owns.
pub fn owned_block(
    blocks: &impl BlockRepository,
    pages: &impl PageRepository,
    user: &User,
    block_id: BlockId,
    denial: Denial,
) -> Result<Block, ServiceError> {
    let block = blocks.get_block(block_id)?.ok_or(ServiceError::NotFound {
        entity: "block",
        id: block_id,
    })?;
    if authorize_block_access(user, &block, pages)? {
        return Ok(block);
    }
    warn!(
        "event=access_denied module=auth status=denied entity=block id={block_id} user_id={}",
        user.id
    );
    Err(deny("block", block_id, denial))
}

fn deny(entity: &'static str, id: uuid::Uuid, denial: Denial) -> ServiceError {
    match denial {
        Denial::Forbidden => ServiceError::Forbidden { entity, id },
        Denial::Conceal => ServiceError::NotFound { entity, id },
    }
}
