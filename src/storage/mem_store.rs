//! In-memory corpus store backed by concurrent maps
//!
//! One `DashMap` per entity collection, keyed by display name or composite
//! key, mirroring the per-collection layout of a document store. Reads are
//! lock-free; range queries scan and sort, which is adequate for the corpus
//! scale (114 chapters).

use crate::core::error::Result;
use crate::core::types::{GraphNodeType, LocationAddress, NodeId, TokenAddress};
use crate::corpus::model::{Chapter, ChapterSummary, Location, MorphologicalEntry, Token, Verse};
use crate::graph::model::{DependencyGraph, GraphNode, VerseTokenRange};
use crate::storage::{CorpusStore, NodeCollection, TokenQuery};
use dashmap::DashMap;

/// In-memory node collection for one graph-node variant.
#[derive(Default)]
pub struct MemNodeCollection {
    nodes: DashMap<NodeId, GraphNode>,
}

impl NodeCollection for MemNodeCollection {
    fn find_by_id(&self, id: &NodeId) -> Option<GraphNode> {
        self.nodes.get(id).map(|entry| entry.value().clone())
    }

    fn save(&self, node: GraphNode) -> Result<()> {
        self.nodes.insert(node.id(), node);
        Ok(())
    }

    fn delete_by_id(&self, id: &NodeId) -> Result<()> {
        self.nodes.remove(id);
        Ok(())
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// In-memory document store over every corpus and graph collection.
#[derive(Default)]
pub struct MemStore {
    chapters: DashMap<u16, Chapter>,
    verses: DashMap<(u16, u16), Verse>,
    tokens: DashMap<String, Token>,
    locations: DashMap<String, Location>,
    entries: DashMap<String, MorphologicalEntry>,
    graphs: DashMap<String, DependencyGraph>,
    terminal_nodes: MemNodeCollection,
    implied_nodes: MemNodeCollection,
    hidden_nodes: MemNodeCollection,
    reference_nodes: MemNodeCollection,
    part_of_speech_nodes: MemNodeCollection,
    phrase_nodes: MemNodeCollection,
    relationship_nodes: MemNodeCollection,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored tokens, hidden ones included.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Total number of stored locations.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    fn sorted_by_position(mut tokens: Vec<Token>) -> Vec<Token> {
        tokens.sort_by_key(|token| (token.verse_number, token.token_number));
        tokens
    }
}

impl CorpusStore for MemStore {
    fn chapter(&self, chapter_number: u16) -> Option<Chapter> {
        self.chapters
            .get(&chapter_number)
            .map(|entry| entry.value().clone())
    }

    fn save_chapter(&self, chapter: Chapter) -> Result<()> {
        self.chapters.insert(chapter.chapter_number, chapter);
        Ok(())
    }

    fn chapter_summaries(&self) -> Vec<ChapterSummary> {
        let mut summaries: Vec<ChapterSummary> = self
            .chapters
            .iter()
            .map(|entry| ChapterSummary {
                chapter_number: entry.chapter_number,
                verse_count: entry.verse_count,
                chapter_name: entry.chapter_name.clone(),
            })
            .collect();
        summaries.sort_by_key(|summary| summary.chapter_number);
        summaries
    }

    fn verse(&self, chapter_number: u16, verse_number: u16) -> Option<Verse> {
        self.verses
            .get(&(chapter_number, verse_number))
            .map(|entry| entry.value().clone())
    }

    fn save_verse(&self, verse: Verse) -> Result<()> {
        self.verses
            .insert((verse.chapter_number, verse.verse_number), verse);
        Ok(())
    }

    fn token(&self, address: &TokenAddress) -> Option<Token> {
        self.token_by_display_name(&address.display_name())
    }

    fn token_by_display_name(&self, display_name: &str) -> Option<Token> {
        self.tokens
            .get(display_name)
            .map(|entry| entry.value().clone())
    }

    fn verse_tokens(&self, chapter_number: u16, verse_number: u16) -> Vec<Token> {
        let tokens: Vec<Token> = self
            .tokens
            .iter()
            .filter(|entry| {
                let token = entry.value();
                token.chapter_number == chapter_number
                    && token.verse_number == verse_number
                    && !token.hidden
            })
            .map(|entry| entry.value().clone())
            .collect();
        Self::sorted_by_position(tokens)
    }

    fn tokens_in_span(
        &self,
        chapter_number: u16,
        verse_number: u16,
        first_token_number: u16,
        last_token_number: u16,
    ) -> Vec<Token> {
        let query = TokenQuery {
            chapter_number,
            ranges: vec![VerseTokenRange::new(
                verse_number,
                first_token_number,
                last_token_number,
            )],
            hidden_only: false,
        };
        self.query_tokens(&query)
    }

    fn query_tokens(&self, query: &TokenQuery) -> Vec<Token> {
        let tokens: Vec<Token> = self
            .tokens
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        Self::sorted_by_position(tokens)
    }

    fn save_token(&self, token: Token) -> Result<()> {
        self.tokens.insert(token.display_name(), token);
        Ok(())
    }

    fn delete_token(&self, address: &TokenAddress) -> Result<()> {
        self.tokens.remove(&address.display_name());
        Ok(())
    }

    fn location(&self, address: &LocationAddress) -> Option<Location> {
        self.locations
            .get(&address.display_name())
            .map(|entry| entry.value().clone())
    }

    fn save_location(&self, location: Location) -> Result<()> {
        self.locations.insert(location.display_name(), location);
        Ok(())
    }

    fn delete_location(&self, address: &LocationAddress) -> Result<()> {
        self.locations.remove(&address.display_name());
        Ok(())
    }

    fn entry(&self, display_name: &str) -> Option<MorphologicalEntry> {
        self.entries
            .get(display_name)
            .map(|entry| entry.value().clone())
    }

    fn save_entry(&self, entry: MorphologicalEntry) -> Result<()> {
        self.entries.insert(entry.display_name(), entry);
        Ok(())
    }

    fn delete_entry(&self, display_name: &str) -> Result<()> {
        self.entries.remove(display_name);
        Ok(())
    }

    fn graph(&self, display_name: &str) -> Option<DependencyGraph> {
        self.graphs
            .get(display_name)
            .map(|entry| entry.value().clone())
    }

    fn graphs_in_chapter(&self, chapter_number: u16) -> Vec<DependencyGraph> {
        self.graphs
            .iter()
            .filter(|entry| entry.chapter_number == chapter_number)
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn count_graphs(&self, chapter_number: u16, verse_number: u16) -> usize {
        self.graphs
            .iter()
            .filter(|entry| {
                entry.chapter_number == chapter_number && entry.verse_number == verse_number
            })
            .count()
    }

    fn save_graph(&self, graph: DependencyGraph) -> Result<()> {
        self.graphs.insert(graph.display_name(), graph);
        Ok(())
    }

    fn delete_graph(&self, display_name: &str) -> Result<()> {
        self.graphs.remove(display_name);
        Ok(())
    }

    fn node_collection(&self, node_type: GraphNodeType) -> Option<&dyn NodeCollection> {
        match node_type {
            GraphNodeType::Terminal => Some(&self.terminal_nodes),
            GraphNodeType::Implied => Some(&self.implied_nodes),
            GraphNodeType::Hidden => Some(&self.hidden_nodes),
            GraphNodeType::Reference => Some(&self.reference_nodes),
            GraphNodeType::PartOfSpeech => Some(&self.part_of_speech_nodes),
            GraphNodeType::Phrase => Some(&self.phrase_nodes),
            GraphNodeType::Relationship => Some(&self.relationship_nodes),
            GraphNodeType::Root => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::TerminalNode;

    #[test]
    fn test_token_roundtrip_and_idempotent_delete() {
        let store = MemStore::new();
        let token = Token::new(1, 1, 1, "alpha");
        let address = token.address();

        store.save_token(token.clone()).unwrap();
        assert_eq!(store.token(&address), Some(token.clone()));
        assert_eq!(store.token_by_display_name("1:1:1"), Some(token));

        store.delete_token(&address).unwrap();
        assert_eq!(store.token(&address), None);
        // second delete is a no-op, not an error
        store.delete_token(&address).unwrap();
    }

    #[test]
    fn test_verse_tokens_sorted_and_visible_only() {
        let store = MemStore::new();
        store.save_token(Token::new(1, 1, 3, "c")).unwrap();
        store.save_token(Token::new(1, 1, 1, "a")).unwrap();
        store.save_token(Token::new(1, 1, 2, "b")).unwrap();
        let mut hidden = Token::new(1, 1, 4, "ghost");
        hidden.hidden = true;
        store.save_token(hidden).unwrap();
        store.save_token(Token::new(1, 2, 1, "other-verse")).unwrap();

        let tokens = store.verse_tokens(1, 1);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_query_tokens_deterministic_order() {
        let store = MemStore::new();
        store.save_token(Token::new(2, 6, 2, "f")).unwrap();
        store.save_token(Token::new(2, 5, 4, "d")).unwrap();
        store.save_token(Token::new(2, 5, 2, "b")).unwrap();
        store.save_token(Token::new(2, 6, 1, "e")).unwrap();
        store.save_token(Token::new(2, 5, 3, "c")).unwrap();

        let query = TokenQuery {
            chapter_number: 2,
            ranges: vec![VerseTokenRange::new(5, 2, 4), VerseTokenRange::new(6, 1, 2)],
            hidden_only: false,
        };
        let texts: Vec<String> = store
            .query_tokens(&query)
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_chapter_summaries_sorted() {
        let store = MemStore::new();
        store.save_chapter(Chapter::new(3, "third", 5)).unwrap();
        store.save_chapter(Chapter::new(1, "first", 7)).unwrap();
        store.save_chapter(Chapter::new(2, "second", 9)).unwrap();

        let numbers: Vec<u16> = store
            .chapter_summaries()
            .iter()
            .map(|s| s.chapter_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_node_collections_per_type() {
        let store = MemStore::new();
        let node = GraphNode::Terminal(TerminalNode::new(TokenAddress::new(1, 1, 1)));
        let id = node.id();

        let terminals = store.node_collection(GraphNodeType::Terminal).unwrap();
        terminals.save(node).unwrap();
        assert_eq!(terminals.len(), 1);
        assert!(terminals.find_by_id(&id).is_some());

        // other collections are unaffected
        let implied = store.node_collection(GraphNodeType::Implied).unwrap();
        assert!(implied.is_empty());

        // root has no physical collection
        assert!(store.node_collection(GraphNodeType::Root).is_none());
    }

    #[test]
    fn test_graph_lookup_by_key() {
        let store = MemStore::new();
        let mut graph = DependencyGraph::new(4, 2, 1);
        graph.tokens.push(VerseTokenRange::new(2, 1, 5));
        store.save_graph(graph.clone()).unwrap();

        assert_eq!(store.graph_by_key(4, 2, 1), Some(graph));
        assert_eq!(store.graph_by_key(4, 2, 2), None);
        assert_eq!(store.count_graphs(4, 2), 1);
    }
}
