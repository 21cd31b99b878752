//! Hierarchical address space and sentinel resolution
//!
//! Verse and token numbers may be passed as the sentinel `-1`, meaning "the
//! last one in scope". Resolution consults the store for the relevant
//! counts; a missing chapter or verse resolves to 0, which no stored unit
//! ever occupies.

use crate::core::types::{chapter_in_range, SENTINEL_LAST};
use crate::storage::CorpusStore;
use std::sync::Arc;
use tracing::debug;

/// Sentinel resolver over a corpus store. Pure aside from read-only store
/// queries; cheap to clone.
#[derive(Clone)]
pub struct AddressSpace {
    store: Arc<dyn CorpusStore>,
}

impl AddressSpace {
    /// Create an address space over a store handle.
    pub fn new(store: Arc<dyn CorpusStore>) -> Self {
        Self { store }
    }

    /// Number of verses in a chapter; 0 when the chapter is absent or out of
    /// range.
    pub fn verse_count(&self, chapter_number: i32) -> i32 {
        if !chapter_in_range(chapter_number) {
            return 0;
        }
        self.store
            .chapter(chapter_number as u16)
            .map(|chapter| i32::from(chapter.verse_count))
            .unwrap_or(0)
    }

    /// Number of tokens in a verse; 0 when the verse is absent.
    pub fn token_count(&self, chapter_number: i32, verse_number: i32) -> i32 {
        if !chapter_in_range(chapter_number) || verse_number < 1 {
            return 0;
        }
        self.store
            .verse(chapter_number as u16, verse_number as u16)
            .map(|verse| i32::from(verse.token_count))
            .unwrap_or(0)
    }

    /// Resolve sentinel verse/token numbers to concrete values.
    ///
    /// Returns `None` when both components were requested as sentinels and
    /// neither resolved to anything stored; otherwise the concrete pair,
    /// where an unresolved component comes back as 0.
    pub fn resolve_sentinels(
        &self,
        chapter_number: i32,
        verse_number: i32,
        token_number: i32,
    ) -> Option<(i32, i32)> {
        let verse_requested_last = verse_number == SENTINEL_LAST;
        let token_requested_last = token_number == SENTINEL_LAST;

        let verse_number = if verse_requested_last {
            self.verse_count(chapter_number)
        } else {
            verse_number
        };
        let token_number = if token_requested_last {
            self.token_count(chapter_number, verse_number)
        } else {
            token_number
        };

        if verse_requested_last && token_requested_last && verse_number == 0 && token_number == 0 {
            debug!(
                chapter_number,
                "neither last-verse nor last-token sentinel resolved"
            );
            return None;
        }

        Some((verse_number, token_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::model::{Chapter, Verse};
    use crate::storage::MemStore;

    fn space_with_fixture() -> AddressSpace {
        let store = MemStore::new();
        store.save_chapter(Chapter::new(1, "opening", 7)).unwrap();
        let mut verse = Verse::new(1, 7);
        verse.token_count = 3;
        store.save_verse(verse).unwrap();
        AddressSpace::new(Arc::new(store))
    }

    #[test]
    fn test_counts() {
        let space = space_with_fixture();
        assert_eq!(space.verse_count(1), 7);
        assert_eq!(space.verse_count(2), 0);
        assert_eq!(space.verse_count(0), 0);
        assert_eq!(space.verse_count(115), 0);
        assert_eq!(space.token_count(1, 7), 3);
        assert_eq!(space.token_count(1, 8), 0);
        assert_eq!(space.token_count(1, 0), 0);
    }

    #[test]
    fn test_sentinel_resolution() {
        let space = space_with_fixture();
        // both sentinels resolve against chapter 1
        assert_eq!(space.resolve_sentinels(1, -1, -1), Some((7, 3)));
        // concrete numbers pass through untouched
        assert_eq!(space.resolve_sentinels(1, 3, 2), Some((3, 2)));
        // token sentinel alone resolves against the concrete verse
        assert_eq!(space.resolve_sentinels(1, 7, -1), Some((7, 3)));
    }

    #[test]
    fn test_double_sentinel_miss() {
        let space = space_with_fixture();
        // chapter 2 is absent: neither sentinel can resolve
        assert_eq!(space.resolve_sentinels(2, -1, -1), None);
        // a single unresolved sentinel still yields a concrete (0) component
        assert_eq!(space.resolve_sentinels(2, 1, -1), Some((1, 0)));
    }
}
