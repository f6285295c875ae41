//! Word-count statistics: incremental accounting and leveling.

pub mod level;
pub mod word_account;

pub use level::{level_info, LevelInfo};
pub use word_account::{record_change, record_removals, WordChange};
