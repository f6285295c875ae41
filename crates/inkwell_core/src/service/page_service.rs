//! Page use-case service.
//!
//! # Responsibility
//! - Create, list, rename and delete pages on behalf of a resolved user.
//! - Fan page deletion out to its blocks inside one transaction.
//!
//! # Invariants
//! - Listing returns only the caller's pages, ordered by title then id.
//! - Renaming or deleting another user's page is `Forbidden`.
//! - Deleting a page never leaves orphan blocks; cascaded blocks are
//!   subtracted from the owner's word count like individual deletions.

use crate::auth::scope::{owned_page, Denial};
use crate::model::page::{normalize_title, Page, PageId};
use crate::model::user::User;
use crate::repo::block_repo::{BlockRepository, SqliteBlockRepository};
use crate::repo::page_repo::{PageRepository, SqlitePageRepository};
use crate::repo::user_repo::SqliteUserRepository;
use crate::service::error::ServiceError;
use crate::stats::word_account::record_removals;
use log::info;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Outcome of a cascading page delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDeletion {
    pub page_id: PageId,
    pub removed_blocks: usize,
    pub word_count: u64,
}

/// Page service over a migrated connection.
pub struct PageService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> PageService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Lists the user's pages ordered by title.
    pub fn list_pages(&self, user: &User) -> Result<Vec<Page>, ServiceError> {
        Ok(SqlitePageRepository::new(self.conn).list_pages_for_owner(user.id)?)
    }

    /// Creates a page owned by `user`.
    pub fn create_page(&self, user: &User, title: &str) -> Result<Page, ServiceError> {
        let page = Page::new(user.id, title)?;
        SqlitePageRepository::new(self.conn).create_page(&page)?;
        info!(
            "event=page_create module=service status=ok page_id={} user_id={}",
            page.id, user.id
        );
        Ok(page)
    }

    /// Renames a page. `None` keeps the current title.
    pub fn rename_page(
        &self,
        user: &User,
        page_id: PageId,
        title: Option<&str>,
    ) -> Result<Page, ServiceError> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let pages = SqlitePageRepository::new(&tx);
        let mut page = owned_page(&pages, user, page_id, Denial::Forbidden)?;

        if let Some(title) = title {
            page.title = normalize_title(title)?;
            pages.rename_page(page.id, &page.title)?;
        }

        tx.commit()?;
        Ok(page)
    }

    /// Deletes a page and all of its blocks atomically.
    pub fn delete_page(&self, user: &User, page_id: PageId) -> Result<PageDeletion, ServiceError> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let pages = SqlitePageRepository::new(&tx);
        let blocks = SqliteBlockRepository::new(&tx);
        let users = SqliteUserRepository::new(&tx);

        let page = owned_page(&pages, user, page_id, Denial::Forbidden)?;
        let doomed = blocks.list_blocks_for_page(page.id)?;
        let removed_blocks = blocks.delete_blocks_for_page(page.id)?;
        pages.delete_page(page.id)?;
        let word_count = record_removals(&users, user.id, doomed.iter().map(|block| &block.content))?;

        tx.commit()?;
        info!(
            "event=page_delete module=service status=ok page_id={} removed_blocks={removed_blocks}",
            page.id
        );
        Ok(PageDeletion {
            page_id: page.id,
            removed_blocks,
            word_count,
        })
    }
}
