//! Block repository contract and SQLite implementation.
//!
//! # Invariants
//! - Page listings are ordered by `order_index ASC`, then insertion order.
//! - Content is stored as JSON text and re-validated against the stored type
//!   on every read.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::block::{Block, BlockId};
use crate::model::content::{BlockContent, BlockKind};
use crate::model::page::PageId;
use rusqlite::{params, Connection, Row};

const BLOCK_SELECT_SQL: &str = "SELECT id, page_id, type, content, order_index FROM blocks";

/// Repository interface for blocks.
pub trait BlockRepository {
    fn create_block(&self, block: &Block) -> RepoResult<BlockId>;
    fn get_block(&self, id: BlockId) -> RepoResult<Option<Block>>;
    fn list_blocks_for_page(&self, page_id: PageId) -> RepoResult<Vec<Block>>;
    /// Persists `content` and `order_index`. The parent page is never changed.
    fn update_block(&self, block: &Block) -> RepoResult<()>;
    fn delete_block(&self, id: BlockId) -> RepoResult<()>;
    /// Deletes every block of a page and returns how many rows went away.
    fn delete_blocks_for_page(&self, page_id: PageId) -> RepoResult<usize>;
}

/// SQLite-backed block repository.
pub struct SqliteBlockRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlockRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BlockRepository for SqliteBlockRepository<'_> {
    fn create_block(&self, block: &Block) -> RepoResult<BlockId> {
        self.conn.execute(
            "INSERT INTO blocks (id, page_id, type, content, order_index)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                block.id.to_string(),
                block.page_id.to_string(),
                block.kind().as_str(),
                block.content.to_stored(),
                block.order_index,
            ],
        )?;
        Ok(block.id)
    }

    fn get_block(&self, id: BlockId) -> RepoResult<Option<Block>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BLOCK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_block_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_blocks_for_page(&self, page_id: PageId) -> RepoResult<Vec<Block>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BLOCK_SELECT_SQL}
             WHERE page_id = ?1
             ORDER BY order_index ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([page_id.to_string()])?;
        let mut blocks = Vec::new();
        while let Some(row) = rows.next()? {
            blocks.push(parse_block_row(row)?);
        }
        Ok(blocks)
    }

    fn update_block(&self, block: &Block) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE blocks
             SET type = ?2,
                 content = ?3,
                 order_index = ?4,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                block.id.to_string(),
                block.kind().as_str(),
                block.content.to_stored(),
                block.order_index,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "block",
                id: block.id,
            });
        }
        Ok(())
    }

    fn delete_block(&self, id: BlockId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM blocks WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "block", id });
        }
        Ok(())
    }

    fn delete_blocks_for_page(&self, page_id: PageId) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM blocks WHERE page_id = ?1;",
            [page_id.to_string()],
        )?;
        Ok(removed)
    }
}

fn parse_block_row(row: &Row<'_>) -> RepoResult<Block> {
    let id_text: String = row.get("id")?;
    let page_text: String = row.get("page_id")?;

    let type_text: String = row.get("type")?;
    let kind: BlockKind = type_text.parse().map_err(|_| {
        RepoError::InvalidData(format!("invalid block type `{type_text}` in blocks.type"))
    })?;

    let stored: String = row.get("content")?;
    let content = BlockContent::from_stored(kind, &stored).map_err(|err| {
        RepoError::InvalidData(format!("blocks.content does not match type `{kind}`: {err}"))
    })?;

    Ok(Block {
        id: parse_uuid(&id_text, "blocks.id")?,
        page_id: parse_uuid(&page_text, "blocks.page_id")?,
        content,
        order_index: row.get("order_index")?,
    })
}
