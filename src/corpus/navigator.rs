//! Logical token-sequence navigation across verse and chapter boundaries
//!
//! The corpus has no physical linked list: the successor of the last token
//! of a verse is the first token of the next verse, and the successor of the
//! last token of a chapter is the first token of the next chapter. The
//! navigator resolves both directions with an explicit bounded loop of
//! address retries, each of which strictly advances or retreats the
//! composite address.

use crate::core::types::{chapter_in_range, TokenAddress, SENTINEL_LAST};
use crate::corpus::address::AddressSpace;
use crate::corpus::model::Token;
use crate::storage::CorpusStore;
use crate::system::metrics::Metrics;
use std::sync::Arc;
use tracing::{debug, warn};

/// Traversal direction of a seek.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Upper bound on address retries per seek. Two boundary hops suffice in
/// practice; the larger budget covers backward walks across verses whose
/// token records were never ingested, and makes termination explicit.
const MAX_HOPS: usize = 512;

/// Resolver of logical next/previous tokens. Pure and side-effect-free;
/// safe to share across threads.
#[derive(Clone)]
pub struct TokenNavigator {
    store: Arc<dyn CorpusStore>,
    addresses: AddressSpace,
}

impl TokenNavigator {
    /// Create a navigator over a store handle.
    pub fn new(store: Arc<dyn CorpusStore>) -> Self {
        let addresses = AddressSpace::new(store.clone());
        Self { store, addresses }
    }

    /// The logical successor of `token`, crossing verse and chapter
    /// boundaries as needed. `None` once the corpus is exhausted.
    pub fn next(&self, token: &Token) -> Option<Token> {
        debug!(token = %token.display_name(), "finding next token");
        Metrics::global().navigator.lookups.inc();
        let result = self.seek(
            i32::from(token.chapter_number),
            i32::from(token.verse_number),
            i32::from(token.token_number) + 1,
            Direction::Forward,
        );
        debug!(
            token = %token.display_name(),
            next = result.as_ref().map(|t| t.display_name()),
            "next token resolved"
        );
        result
    }

    /// The logical predecessor of `token`, crossing verse and chapter
    /// boundaries as needed. `None` before the start of the corpus.
    pub fn previous(&self, token: &Token) -> Option<Token> {
        debug!(token = %token.display_name(), "finding previous token");
        Metrics::global().navigator.lookups.inc();
        let result = self.seek(
            i32::from(token.chapter_number),
            i32::from(token.verse_number),
            i32::from(token.token_number) - 1,
            Direction::Backward,
        );
        debug!(
            token = %token.display_name(),
            previous = result.as_ref().map(|t| t.display_name()),
            "previous token resolved"
        );
        result
    }

    /// Boundary-crossing address walk. Each iteration either finds the token
    /// at the current composite address or moves the address one hop in the
    /// seek direction; the chapter component is monotonic, so the walk
    /// cannot cycle.
    fn seek(
        &self,
        mut chapter_number: i32,
        mut verse_number: i32,
        mut token_number: i32,
        direction: Direction,
    ) -> Option<Token> {
        for _ in 0..MAX_HOPS {
            Metrics::global().navigator.hops.inc();

            if !chapter_in_range(chapter_number) {
                warn!(
                    chapter_number,
                    verse_number, token_number, "no token found: chapter out of range"
                );
                Metrics::global().navigator.misses.inc();
                return None;
            }

            let Some((verse, token)) =
                self.addresses
                    .resolve_sentinels(chapter_number, verse_number, token_number)
            else {
                warn!(
                    chapter_number,
                    verse_number, token_number, "no token found: sentinels did not resolve"
                );
                Metrics::global().navigator.misses.inc();
                return None;
            };
            verse_number = verse;
            token_number = token;

            if let Some(address) = TokenAddress::checked(chapter_number, verse_number, token_number)
            {
                if let Some(found) = self.store.token_by_display_name(&address.display_name()) {
                    return Some(found);
                }
            }

            match direction {
                Direction::Forward => {
                    if token_number > 1 {
                        // the reference token was the last of its verse; try
                        // the first token of the next verse in this chapter
                        verse_number += 1;
                        token_number = 1;
                    } else if verse_number > 1 {
                        // the verse was the last of its chapter; wrap into
                        // the first token of the next chapter
                        chapter_number += 1;
                        verse_number = 1;
                        token_number = 1;
                    } else {
                        warn!(
                            chapter_number,
                            verse_number, token_number, "no next token found"
                        );
                        Metrics::global().navigator.misses.inc();
                        return None;
                    }
                }
                Direction::Backward => {
                    if verse_number == 0 {
                        // walked past the first verse; wrap into the last
                        // token of the last verse of the previous chapter
                        chapter_number -= 1;
                        verse_number = SENTINEL_LAST;
                        token_number = SENTINEL_LAST;
                    } else if token_number == 0 {
                        // walked past the first token; the previous verse's
                        // token count is unknown, so ask for its last token
                        verse_number -= 1;
                        token_number = SENTINEL_LAST;
                    } else {
                        warn!(
                            chapter_number,
                            verse_number, token_number, "no previous token found"
                        );
                        Metrics::global().navigator.misses.inc();
                        return None;
                    }
                }
            }
        }

        warn!(
            chapter_number,
            verse_number, token_number, "seek exhausted hop budget"
        );
        Metrics::global().navigator.misses.inc();
        None
    }
}
