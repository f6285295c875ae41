//! Block domain model.
//!
//! # Invariants
//! - `page_id` never changes after creation.
//! - The block type is derived from `content`, so shape and type cannot
//!   disagree.
//! - There is no owner field: ownership is inherited from the parent page.

use super::content::{BlockContent, BlockKind};
use super::page::PageId;
use uuid::Uuid;

/// Stable block identifier.
pub type BlockId = Uuid;

/// Typed content unit within a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub page_id: PageId,
    pub content: BlockContent,
    /// Display position within the page. Not required to be unique or contiguous.
    pub order_index: i64,
}

impl Block {
    /// Creates a block with a generated stable ID.
    pub fn new(page_id: PageId, content: BlockContent, order_index: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            page_id,
            content,
            order_index,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    pub fn word_count(&self) -> u64 {
        self.content.word_count()
    }
}
