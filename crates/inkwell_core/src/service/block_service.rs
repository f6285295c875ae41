//! Block use-case service.
//!
//! # Responsibility
//! - Create, list, edit and delete blocks on behalf of a resolved user.
//! - Keep the owner's lifetime word count in step with every content write.
//!
//! # Invariants
//! - Ownership is checked through the parent page before any write.
//! - Create normalizes content leniently; edit rejects malformed content.
//! - Each block write and its word-count adjustment commit in one
//!   transaction or not at all.

use crate::auth::scope::{owned_block, owned_page, Denial};
use crate::model::block::{Block, BlockId};
use crate::model::content::{BlockContent, BlockKind};
use crate::model::page::PageId;
use crate::model::user::User;
use crate::repo::block_repo::{BlockRepository, SqliteBlockRepository};
use crate::repo::page_repo::SqlitePageRepository;
use crate::repo::user_repo::SqliteUserRepository;
use crate::service::error::ServiceError;
use crate::stats::word_account::{record_change, WordChange};
use log::info;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde_json::Value;

/// Input for block creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlock {
    pub page_id: PageId,
    pub kind: BlockKind,
    /// Raw payload, normalized against `kind` before persistence.
    pub content: Value,
    pub order_index: i64,
}

/// Input for block edits.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEdit {
    /// Raw payload, validated strictly against the block's type.
    pub content: Value,
    /// New display position. `None` keeps the current one.
    pub order_index: Option<i64>,
}

/// Block service over a migrated connection.
pub struct BlockService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> BlockService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Lists a page's blocks ordered by `order_index`.
    ///
    /// Another user's page is reported as `NotFound`.
    pub fn list_blocks(&self, user: &User, page_id: PageId) -> Result<Vec<Block>, ServiceError> {
        let pages = SqlitePageRepository::new(self.conn);
        let page = owned_page(&pages, user, page_id, Denial::Conceal)?;
        Ok(SqliteBlockRepository::new(self.conn).list_blocks_for_page(page.id)?)
    }

    /// Creates a block and credits its words to the owner.
    ///
    /// Another user's page is reported as `NotFound`.
    pub fn create_block(&self, user: &User, input: NewBlock) -> Result<Block, ServiceError> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let pages = SqlitePageRepository::new(&tx);
        let blocks = SqliteBlockRepository::new(&tx);
        let users = SqliteUserRepository::new(&tx);

        let page = owned_page(&pages, user, input.page_id, Denial::Conceal)?;
        let content = BlockContent::normalize(input.kind, &input.content);
        let block = Block::new(page.id, content, input.order_index);
        blocks.create_block(&block)?;
        let total = record_change(&users, user.id, WordChange::Created(&block.content))?;

        tx.commit()?;
        info!(
            "event=block_create module=service status=ok block_id={} page_id={} words={} total={total}",
            block.id,
            page.id,
            block.word_count()
        );
        Ok(block)
    }

    /// Replaces a block's content and credits net word additions.
    ///
    /// # Errors
    /// - `NotFound` for an unknown block, `Forbidden` for another user's block.
    /// - `Validation` when `edit.content` does not fit the block's type.
    pub fn update_block(
        &self,
        user: &User,
        block_id: BlockId,
        edit: BlockEdit,
    ) -> Result<Block, ServiceError> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let pages = SqlitePageRepository::new(&tx);
        let blocks = SqliteBlockRepository::new(&tx);
        let users = SqliteUserRepository::new(&tx);

        let before = owned_block(&blocks, &pages, user, block_id, Denial::Forbidden)?;
        let content = BlockContent::parse_strict(before.kind(), &edit.content)?;
        let after = Block {
            content,
            order_index: edit.order_index.unwrap_or(before.order_index),
            ..before.clone()
        };
        blocks.update_block(&after)?;
        record_change(
            &users,
            user.id,
            WordChange::Edited {
                before: &before.content,
                after: &after.content,
            },
        )?;

        tx.commit()?;
        Ok(after)
    }

    /// Deletes a block and subtracts its words from the owner.
    pub fn delete_block(&self, user: &User, block_id: BlockId) -> Result<(), ServiceError> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let pages = SqlitePageRepository::new(&tx);
        let blocks = SqliteBlockRepository::new(&tx);
        let users = SqliteUserRepository::new(&tx);

        let block = owned_block(&blocks, &pages, user, block_id, Denial::Forbidden)?;
        blocks.delete_block(block.id)?;
        let total = record_change(&users, user.id, WordChange::Removed(&block.content))?;

        tx.commit()?;
        info!(
            "event=block_delete module=service status=ok block_id={} total={total}",
            block.id
        );
        Ok(())
    }
}
