//! Level/progress derivation from a lifetime word count.
//!
//! Staged thresholds: level 1 is reached at `FIRST_LEVEL_WORDS`; the span
//! from level `L` to `L + 1` is `FIRST_LEVEL_WORDS + LEVEL_SPAN_GROWTH * L`
//! words. `progress` is the total word count and `next_level_words` is the
//! cumulative word count at which the next level is reached.

use serde::Serialize;

/// Words needed to reach level 1.
pub const FIRST_LEVEL_WORDS: u64 = 1000;
/// Extra words added to each successive level span.
pub const LEVEL_SPAN_GROWTH: u64 = 250;

/// Display metrics derived from a word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelInfo {
    pub level: u32,
    pub progress: u64,
    pub next_level_words: u64,
}

/// Computes the level reached with `word_count` words.
pub fn level_info(word_count: u64) -> LevelInfo {
    let mut level: u32 = 0;
    let mut threshold = FIRST_LEVEL_WORDS;
    while word_count >= threshold && threshold != u64::MAX {
        level += 1;
        threshold = threshold.saturating_add(level_span(level));
    }
    LevelInfo {
        level,
        progress: word_count,
        next_level_words: threshold,
    }
}

/// Words between reaching `level` and reaching `level + 1`.
fn level_span(level: u32) -> u64 {
    FIRST_LEVEL_WORDS.saturating_add(LEVEL_SPAN_GROWTH.saturating_mul(u64::from(level)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_follow_growing_spans() {
        assert_eq!(
            level_info(0),
            LevelInfo {
                level: 0,
                progress: 0,
                next_level_words: 1000,
            }
        );
        assert_eq!(level_info(999).level, 0);
        assert_eq!(level_info(1000).level, 1);
        assert_eq!(level_info(1000).next_level_words, 2250);
        assert_eq!(level_info(2249).level, 1);
        assert_eq!(level_info(2250).level, 2);
        assert_eq!(level_info(2250).next_level_words, 3750);
    }

    #[test]
    fn level_is_monotonic() {
        let mut previous = level_info(0);
        for words in (0..20_000).step_by(37) {
            let current = level_info(words);
            assert!(current.level >= previous.level);
            assert!(current.next_level_words > words);
            previous = current;
        }
    }

    #[test]
    fn progress_reports_the_total() {
        assert_eq!(level_info(1234).progress, 1234);
    }
}
