//! Page repository contract and SQLite implementation.
//!
//! # Invariants
//! - Owner listings are ordered by `title ASC, id ASC`.
//! - `delete_page` fails while blocks still reference the page; callers
//!   remove blocks first in the same transaction.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::page::{Page, PageId};
use crate::model::user::UserId;
use rusqlite::{params, Connection, Row};

const PAGE_SELECT_SQL: &str = "SELECT id, owner_id, title FROM pages";

/// Repository interface for pages.
pub trait PageRepository {
    fn create_page(&self, page: &Page) -> RepoResult<PageId>;
    fn get_page(&self, id: PageId) -> RepoResult<Option<Page>>;
    fn list_pages_for_owner(&self, owner_id: UserId) -> RepoResult<Vec<Page>>;
    fn rename_page(&self, id: PageId, title: &str) -> RepoResult<()>;
    fn delete_page(&self, id: PageId) -> RepoResult<()>;
}

/// SQLite-backed page repository.
pub struct SqlitePageRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePageRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PageRepository for SqlitePageRepository<'_> {
    fn create_page(&self, page: &Page) -> RepoResult<PageId> {
        self.conn.execute(
            "INSERT INTO pages (id, owner_id, title) VALUES (?1, ?2, ?3);",
            params![
                page.id.to_string(),
                page.owner_id.to_string(),
                page.title.as_str(),
            ],
        )?;
        Ok(page.id)
    }

    fn get_page(&self, id: PageId) -> RepoResult<Option<Page>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PAGE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_page_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_pages_for_owner(&self, owner_id: UserId) -> RepoResult<Vec<Page>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PAGE_SELECT_SQL}
             WHERE owner_id = ?1
             ORDER BY title ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut pages = Vec::new();
        while let Some(row) = rows.next()? {
            pages.push(parse_page_row(row)?);
        }
        Ok(pages)
    }

    fn rename_page(&self, id: PageId, title: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pages
             SET title = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id.to_string(), title],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "page", id });
        }
        Ok(())
    }

    fn delete_page(&self, id: PageId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM pages WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "page", id });
        }
        Ok(())
    }
}

fn parse_page_row(row: &Row<'_>) -> RepoResult<Page> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;
    Ok(Page {
        id: parse_uuid(&id_text, "pages.id")?,
        owner_id: parse_uuid(&owner_text, "pages.owner_id")?,
        title: row.get("title")?,
    })
}
