//! Dependency-graph lifecycle orchestration
//!
//! Save, delete and merge are ordered sequences of store writes with no
//! transaction around them. The write order is a correctness requirement:
//! `save_graph` makes new synthetic tokens and the graph durable before any
//! old node is removed, so an interruption leaves orphaned-but-harmless
//! nodes; `delete_graph` removes the graph record last, so an interrupted
//! deletion leaves the record behind as the recovery anchor describing what
//! still needs cleanup. Failures carry the name of the failed step and every
//! delete is idempotent, so retrying the whole operation is always safe.

use crate::core::error::{Error, GraphError, Result};
use crate::core::types::{chapter_in_range, GraphNodeType, NodeId, WordType};
use crate::corpus::model::{ChapterSummary, Location, MorphologicalEntry, Token};
use crate::graph::model::{DependencyGraph, GraphNode, TokenRangeGroup};
use crate::graph::registry::GraphNodeRegistry;
use crate::storage::{CorpusStore, TokenQuery};
use crate::system::metrics::Metrics;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates graph persistence, cascading cleanup and token merges over
/// a store handle.
///
/// Mutating operations are serialised behind an internal mutex; reads run
/// lock-free and may execute concurrently.
pub struct DependencyGraphManager {
    store: Arc<dyn CorpusStore>,
    registry: GraphNodeRegistry,
    mutation_lock: Mutex<()>,
}

impl DependencyGraphManager {
    /// Create a manager over a store handle.
    pub fn new(store: Arc<dyn CorpusStore>) -> Self {
        let registry = GraphNodeRegistry::new(store.clone());
        Self {
            store,
            registry,
            mutation_lock: Mutex::new(()),
        }
    }

    /// The node registry used for per-type dispatch.
    pub fn registry(&self) -> &GraphNodeRegistry {
        &self.registry
    }

    /// Persist a graph: synthetic implied/hidden tokens first, then the
    /// graph record, then removal of the nodes listed in `removal_ids`.
    pub fn save_graph(
        &self,
        graph: DependencyGraph,
        implied_or_hidden_tokens: &[Token],
        removal_ids: &BTreeMap<GraphNodeType, Vec<NodeId>>,
    ) -> Result<()> {
        let _guard = self.mutation_lock.lock();
        let _timer = Metrics::global()
            .mutations
            .mutation_duration
            .start_timer();

        self.validate_graph(&graph)?;
        for token in implied_or_hidden_tokens {
            self.validate_token_address(token)?;
        }

        info!(
            graph = %graph.display_name(),
            synthetic_tokens = implied_or_hidden_tokens.len(),
            removal_groups = removal_ids.len(),
            "saving dependency graph"
        );

        for token in implied_or_hidden_tokens {
            self.store
                .save_token(token.clone())
                .map_err(|e| Error::mutation("persist synthetic tokens", e))?;
        }

        self.store
            .save_graph(graph)
            .map_err(|e| Error::mutation("persist graph record", e))?;

        self.remove_nodes(removal_ids)
            .map_err(|e| Error::mutation("remove stale nodes", e))?;

        Metrics::global().mutations.graphs_saved.inc();
        Ok(())
    }

    /// Delete a graph by id: removal ids first, then the hidden tokens of
    /// the graph's own span with their locations, then the graph record.
    ///
    /// Deleting an id that no longer exists is a no-op, so re-running a
    /// partially failed delete is safe.
    pub fn delete_graph(
        &self,
        graph_id: &str,
        removal_ids: &BTreeMap<GraphNodeType, Vec<NodeId>>,
    ) -> Result<()> {
        let _guard = self.mutation_lock.lock();
        let _timer = Metrics::global()
            .mutations
            .mutation_duration
            .start_timer();

        self.remove_nodes(removal_ids)
            .map_err(|e| Error::mutation("remove stale nodes", e))?;

        let Some(graph) = self.store.graph(graph_id) else {
            warn!(graph = graph_id, "graph already absent; delete is a no-op");
            return Ok(());
        };

        info!(graph = %graph.display_name(), "deleting dependency graph");

        let hidden_tokens = self.tokens_in_group(&graph.token_group(true));
        for token in &hidden_tokens {
            for location in &token.locations {
                self.store
                    .delete_location(location)
                    .map_err(|e| Error::mutation("delete hidden locations", e))?;
            }
            self.store
                .delete_token(&token.address())
                .map_err(|e| Error::mutation("delete hidden tokens", e))?;
        }

        // deleted last: an interrupted run leaves the record behind as the
        // recovery anchor for the cleanup that still has to happen
        self.store
            .delete_graph(graph_id)
            .map_err(|e| Error::mutation("delete graph record", e))?;

        Metrics::global().mutations.graphs_deleted.inc();
        Ok(())
    }

    /// Tokens covered by a group of verse-token spans, ordered by
    /// (verse, token). The order is deterministic so downstream display and
    /// repeated deletes see a stable sequence.
    pub fn tokens_in_group(&self, group: &TokenRangeGroup) -> Vec<Token> {
        if group.ranges.is_empty() {
            return Vec::new();
        }
        let query = TokenQuery {
            chapter_number: group.chapter_number,
            ranges: group.ranges.clone(),
            hidden_only: group.include_hidden,
        };
        debug!(?query, "querying tokens for span group");
        self.store.query_tokens(&query)
    }

    /// Dependency graphs touching any verse of the group, ordered by the
    /// first verse each graph covers.
    pub fn graphs_in_group(&self, group: &TokenRangeGroup) -> Vec<DependencyGraph> {
        if group.ranges.is_empty() {
            return Vec::new();
        }
        let verses: HashSet<u16> = group.ranges.iter().map(|r| r.verse_number).collect();
        let mut graphs: Vec<DependencyGraph> = self
            .store
            .graphs_in_chapter(group.chapter_number)
            .into_iter()
            .filter(|graph| {
                graph
                    .tokens
                    .iter()
                    .any(|range| verses.contains(&range.verse_number))
            })
            .collect();
        graphs.sort_by_key(|graph| {
            graph
                .tokens
                .first()
                .map(|range| range.verse_number)
                .unwrap_or(0)
        });
        graphs
    }

    /// Look up a graph by display name.
    pub fn find_graph(&self, display_name: &str) -> Option<DependencyGraph> {
        self.store.graph(display_name)
    }

    /// Look up a morphological entry by its derived display name.
    pub fn find_entry(&self, root_letters: &str, form: &str) -> Option<MorphologicalEntry> {
        self.store
            .entry(&MorphologicalEntry::derive_display_name(root_letters, form))
    }

    /// Sparse chapter listing, ordered by chapter number.
    pub fn chapters(&self) -> Vec<ChapterSummary> {
        self.store.chapter_summaries()
    }

    /// Delete a single node, with part-of-speech child cleanup guaranteed to
    /// happen before the node's own row is removed. Reported as one logical
    /// operation.
    pub fn delete_node(&self, node: &GraphNode) -> Result<()> {
        let _guard = self.mutation_lock.lock();
        self.registry.delete(node)?;
        Metrics::global().mutations.nodes_deleted.inc();
        Ok(())
    }

    /// Merge consecutive tokens of a verse into one.
    ///
    /// The first entry of `token_numbers` is the merge anchor: its text is
    /// concatenated (space-joined) with the texts of the following
    /// `token_numbers.len() - 1` tokens. Every surviving token is renumbered
    /// densely from 1 and given exactly one default noun location. A no-op
    /// when fewer than two token numbers are given.
    ///
    /// Not transactional: a failure between the delete and create phases
    /// leaves the verse's token count inconsistent with its stored tokens;
    /// the returned error names the failed step for manual retry.
    pub fn merge_tokens(
        &self,
        chapter_number: u16,
        verse_number: u16,
        token_numbers: &[u16],
    ) -> Result<()> {
        if token_numbers.len() < 2 {
            return Ok(());
        }

        let _guard = self.mutation_lock.lock();
        let _timer = Metrics::global()
            .mutations
            .mutation_duration
            .start_timer();

        info!(
            chapter_number,
            verse_number,
            ?token_numbers,
            "merging tokens"
        );

        let tokens = self.store.verse_tokens(chapter_number, verse_number);
        if tokens.is_empty() {
            return Ok(());
        }
        debug!(total = tokens.len(), "loaded verse tokens for merge");

        self.remove_current(&tokens)?;
        self.create_replacements(chapter_number, verse_number, &tokens, token_numbers)?;

        Metrics::global()
            .mutations
            .tokens_merged
            .inc_by(token_numbers.len() as u64);
        Ok(())
    }

    /// Delete every listed token and its locations, detaching each location
    /// from its morphological entry first so the entry's reference list
    /// never dangles.
    fn remove_current(&self, tokens: &[Token]) -> Result<()> {
        for token in tokens {
            debug!(token = %token.display_name(), text = %token.text, "removing token");
            for address in &token.locations {
                if let Some(location) = self.store.location(address) {
                    self.detach_from_entry(&location)
                        .map_err(|e| Error::mutation("detach morphological entry", e))?;
                }
                self.store
                    .delete_location(address)
                    .map_err(|e| Error::mutation("delete merged locations", e))?;
            }
            self.store
                .delete_token(&token.address())
                .map_err(|e| Error::mutation("delete merged tokens", e))?;
        }
        Ok(())
    }

    /// Drop the entry↔location back-reference pair for one location. The
    /// entry side is saved immediately; the location itself is about to be
    /// deleted by the caller.
    fn detach_from_entry(&self, location: &Location) -> Result<()> {
        let Some(entry_name) = &location.morphological_entry else {
            return Ok(());
        };
        let Some(mut entry) = self.store.entry(entry_name) else {
            // caller policy for inconsistent state: treat as already detached
            warn!(
                location = %location.display_name(),
                entry = %entry_name,
                "referenced morphological entry not found"
            );
            return Ok(());
        };
        if entry.detach(&location.address()) {
            debug!(
                location = %location.display_name(),
                entry = %entry_name,
                "detached location from morphological entry"
            );
            self.store.save_entry(entry)?;
        }
        Ok(())
    }

    /// Build and persist the post-merge token sequence, then update the
    /// verse record to match.
    fn create_replacements(
        &self,
        chapter_number: u16,
        verse_number: u16,
        tokens: &[Token],
        token_numbers: &[u16],
    ) -> Result<()> {
        let anchor = token_numbers[0];
        let mut new_tokens = Vec::new();
        let mut token_number = 1u16;
        let mut index = 0usize;

        while index < tokens.len() {
            let mut text = tokens[index].text.clone();
            if tokens[index].token_number == anchor {
                for _ in 1..token_numbers.len() {
                    index += 1;
                    let merged = tokens.get(index).ok_or_else(|| {
                        Error::invalid_input(format!(
                            "merge of {} tokens at anchor {} runs past the end of verse {}:{}",
                            token_numbers.len(),
                            anchor,
                            chapter_number,
                            verse_number
                        ))
                    })?;
                    text.push(' ');
                    text.push_str(&merged.text);
                }
            }

            let mut token = Token::new(chapter_number, verse_number, token_number, text);
            let location =
                Location::new(chapter_number, verse_number, token_number, 1, WordType::Noun);
            token.locations.push(location.address());

            self.store
                .save_location(location)
                .map_err(|e| Error::mutation("persist replacement locations", e))?;
            self.store
                .save_token(token.clone())
                .map_err(|e| Error::mutation("persist replacement tokens", e))?;
            debug!(token = %token.display_name(), text = %token.text, "created replacement token");

            new_tokens.push(token);
            token_number += 1;
            index += 1;
        }

        let mut verse = self
            .store
            .verse(chapter_number, verse_number)
            .ok_or_else(|| {
                Error::internal(format!(
                    "verse record {}:{} missing during merge",
                    chapter_number, verse_number
                ))
            })?;
        verse.tokens = new_tokens.iter().map(Token::address).collect();
        verse.token_count = new_tokens.len() as u16;
        self.store
            .save_verse(verse)
            .map_err(|e| Error::mutation("update verse token sequence", e))?;

        Ok(())
    }

    /// Cascade-delete every (node type, id) pair through the registry.
    fn remove_nodes(&self, removal_ids: &BTreeMap<GraphNodeType, Vec<NodeId>>) -> Result<()> {
        for (node_type, ids) in removal_ids {
            for id in ids {
                self.registry.delete_by_id(*node_type, id)?;
                Metrics::global().mutations.nodes_deleted.inc();
            }
        }
        Ok(())
    }

    /// A graph may only cover verses of its declared chapter.
    fn validate_graph(&self, graph: &DependencyGraph) -> Result<()> {
        if !chapter_in_range(i32::from(graph.chapter_number)) {
            return Err(Error::invalid_input(format!(
                "graph chapter {} out of range",
                graph.chapter_number
            )));
        }
        let chapter = self.store.chapter(graph.chapter_number).ok_or_else(|| {
            Error::invalid_input(format!("chapter {} is not stored", graph.chapter_number))
        })?;
        for range in &graph.tokens {
            if range.verse_number < 1 || range.verse_number > chapter.verse_count {
                return Err(GraphError::RangeOutsideChapter {
                    chapter_number: graph.chapter_number,
                    verse_number: range.verse_number,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Synthetic tokens must arrive with a valid composite address.
    fn validate_token_address(&self, token: &Token) -> Result<()> {
        if !chapter_in_range(i32::from(token.chapter_number))
            || token.verse_number < 1
            || token.token_number < 1
        {
            return Err(Error::invalid_input(format!(
                "synthetic token carries invalid address {}:{}:{}",
                token.chapter_number, token.verse_number, token.token_number
            )));
        }
        Ok(())
    }
}
