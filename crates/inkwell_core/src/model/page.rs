//! Page domain model.
//!
//! # Invariants
//! - `owner_id` never changes after creation.
//! - `title` is non-blank and at most `PAGE_TITLE_MAX_CHARS` characters.

use super::user::UserId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable page identifier.
pub type PageId = Uuid;

/// Maximum title length in characters.
pub const PAGE_TITLE_MAX_CHARS: usize = 100;

/// User-owned container of ordered blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub owner_id: UserId,
    pub title: String,
}

/// Title validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageValidationError {
    EmptyTitle,
    TitleTooLong { max: usize, actual: usize },
}

impl Display for PageValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "page title must not be blank"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "page title must be at most {max} characters, got {actual}")
            }
        }
    }
}

impl Error for PageValidationError {}

impl Page {
    /// Creates a page with a generated ID and a normalized title.
    pub fn new(owner_id: UserId, title: &str) -> Result<Self, PageValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            title: normalize_title(title)?,
        })
    }
}

/// Trims `title` and checks it against the title rules.
pub fn normalize_title(title: &str) -> Result<String, PageValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(PageValidationError::EmptyTitle);
    }
    let actual = trimmed.chars().count();
    if actual > PAGE_TITLE_MAX_CHARS {
        return Err(PageValidationError::TitleTooLong {
            max: PAGE_TITLE_MAX_CHARS,
            actual,
        });
    }
    Ok(trimmed.to_string())
}
