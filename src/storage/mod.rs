//! Storage abstraction for the corpus and the graph-node collections
//!
//! The underlying document store is an external collaborator; this module
//! pins down exactly the keyed lookup, range query and save/delete surface
//! the core needs. [`MemStore`] is the bundled in-memory implementation used
//! by tests and the demo binary.

pub mod mem_store;

pub use mem_store::MemStore;

use crate::core::error::Result;
use crate::core::types::{GraphNodeType, LocationAddress, NodeId, TokenAddress};
use crate::corpus::model::{Chapter, ChapterSummary, Location, MorphologicalEntry, Token, Verse};
use crate::graph::model::{DependencyGraph, GraphNode, VerseTokenRange};

/// Disjunctive token-range predicate over one chapter.
///
/// A token matches when it belongs to the chapter and to any range's
/// verse-equality plus token-between clause. `hidden_only` additionally
/// restricts matches to synthesized hidden tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenQuery {
    /// Chapter the ranges belong to
    pub chapter_number: u16,
    /// Disjunctive per-verse ranges
    pub ranges: Vec<VerseTokenRange>,
    /// Restrict matches to hidden tokens
    pub hidden_only: bool,
}

impl TokenQuery {
    /// Evaluate the predicate against one token.
    pub fn matches(&self, token: &Token) -> bool {
        if token.chapter_number != self.chapter_number {
            return false;
        }
        if self.hidden_only && !token.hidden {
            return false;
        }
        self.ranges.iter().any(|range| {
            token.verse_number == range.verse_number
                && token.token_number >= range.first_token_index
                && token.token_number <= range.last_token_index
        })
    }
}

/// Typed collection handle for one graph-node variant.
///
/// Deletes are idempotent: removing an id that is not present is a no-op.
pub trait NodeCollection: Send + Sync {
    /// Look up a node by id.
    fn find_by_id(&self, id: &NodeId) -> Option<GraphNode>;

    /// Insert or replace a node.
    fn save(&self, node: GraphNode) -> Result<()>;

    /// Delete a node by id; absent ids succeed silently.
    fn delete_by_id(&self, id: &NodeId) -> Result<()>;

    /// Number of stored nodes.
    fn len(&self) -> usize;

    /// Whether the collection is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keyed store over the corpus hierarchy, morphological entries, dependency
/// graphs and per-type node collections.
///
/// All reads return `None` for absent keys; errors are reserved for
/// infrastructure failures. Delete operations are idempotent.
pub trait CorpusStore: Send + Sync {
    // --- chapters ---

    /// Look up a chapter by number.
    fn chapter(&self, chapter_number: u16) -> Option<Chapter>;

    /// Insert or replace a chapter.
    fn save_chapter(&self, chapter: Chapter) -> Result<()>;

    /// Sparse listing of all chapters, sorted by chapter number.
    fn chapter_summaries(&self) -> Vec<ChapterSummary>;

    // --- verses ---

    /// Look up a verse by (chapter, verse).
    fn verse(&self, chapter_number: u16, verse_number: u16) -> Option<Verse>;

    /// Insert or replace a verse.
    fn save_verse(&self, verse: Verse) -> Result<()>;

    // --- tokens ---

    /// Look up a token by composite address.
    fn token(&self, address: &TokenAddress) -> Option<Token>;

    /// Look up a token by its canonical display name.
    fn token_by_display_name(&self, display_name: &str) -> Option<Token>;

    /// All visible tokens of a verse, ordered by token number.
    fn verse_tokens(&self, chapter_number: u16, verse_number: u16) -> Vec<Token>;

    /// Tokens of a contiguous span within one verse, ordered by token number.
    fn tokens_in_span(
        &self,
        chapter_number: u16,
        verse_number: u16,
        first_token_number: u16,
        last_token_number: u16,
    ) -> Vec<Token>;

    /// Execute a disjunctive range query; results ordered by (verse, token).
    fn query_tokens(&self, query: &TokenQuery) -> Vec<Token>;

    /// Insert or replace a token.
    fn save_token(&self, token: Token) -> Result<()>;

    /// Delete a token by address; absent addresses succeed silently.
    fn delete_token(&self, address: &TokenAddress) -> Result<()>;

    // --- locations ---

    /// Look up a location by composite address.
    fn location(&self, address: &LocationAddress) -> Option<Location>;

    /// Insert or replace a location.
    fn save_location(&self, location: Location) -> Result<()>;

    /// Delete a location by address; absent addresses succeed silently.
    fn delete_location(&self, address: &LocationAddress) -> Result<()>;

    // --- morphological entries ---

    /// Look up an entry by its derived display name.
    fn entry(&self, display_name: &str) -> Option<MorphologicalEntry>;

    /// Insert or replace an entry.
    fn save_entry(&self, entry: MorphologicalEntry) -> Result<()>;

    /// Delete an entry by display name; absent names succeed silently.
    fn delete_entry(&self, display_name: &str) -> Result<()>;

    // --- dependency graphs ---

    /// Look up a graph by display name.
    fn graph(&self, display_name: &str) -> Option<DependencyGraph>;

    /// Look up a graph by its (chapter, verse, segment) key.
    fn graph_by_key(
        &self,
        chapter_number: u16,
        verse_number: u16,
        segment_number: u16,
    ) -> Option<DependencyGraph> {
        self.graph(&DependencyGraph::derive_display_name(
            chapter_number,
            verse_number,
            segment_number,
        ))
    }

    /// All graphs declared in a chapter, in unspecified order.
    fn graphs_in_chapter(&self, chapter_number: u16) -> Vec<DependencyGraph>;

    /// Number of graphs anchored to a verse.
    fn count_graphs(&self, chapter_number: u16, verse_number: u16) -> usize;

    /// Insert or replace a graph record.
    fn save_graph(&self, graph: DependencyGraph) -> Result<()>;

    /// Delete a graph record by display name; absent names succeed silently.
    fn delete_graph(&self, display_name: &str) -> Result<()>;

    // --- graph-node collections ---

    /// The typed collection for a node variant; `None` for `Root`, which has
    /// no physical collection.
    fn node_collection(&self, node_type: GraphNodeType) -> Option<&dyn NodeCollection>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_matches_disjunction() {
        let query = TokenQuery {
            chapter_number: 2,
            ranges: vec![VerseTokenRange::new(5, 2, 4), VerseTokenRange::new(6, 1, 1)],
            hidden_only: false,
        };

        assert!(query.matches(&Token::new(2, 5, 2, "a")));
        assert!(query.matches(&Token::new(2, 5, 4, "b")));
        assert!(query.matches(&Token::new(2, 6, 1, "c")));
        assert!(!query.matches(&Token::new(2, 5, 5, "d")));
        assert!(!query.matches(&Token::new(2, 6, 2, "e")));
        assert!(!query.matches(&Token::new(3, 5, 2, "f")));
    }

    #[test]
    fn test_query_hidden_restriction() {
        let query = TokenQuery {
            chapter_number: 1,
            ranges: vec![VerseTokenRange::new(1, 1, 10)],
            hidden_only: true,
        };

        let visible = Token::new(1, 1, 3, "visible");
        let mut hidden = Token::new(1, 1, 3, "hidden");
        hidden.hidden = true;

        assert!(!query.matches(&visible));
        assert!(query.matches(&hidden));
    }
}
