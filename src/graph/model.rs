//! Dependency-graph records and the polymorphic node variants
//!
//! A dependency graph covers an ordered set of verse-token spans within one
//! chapter and owns typed annotation nodes. Node polymorphism is a tagged
//! enum dispatched on [`GraphNodeType`]; each variant lives in its own
//! storage collection.

use crate::core::types::{GraphNodeType, LocationAddress, NodeId, TokenAddress};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A (verse, first token, last token) span covered by a dependency graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseTokenRange {
    /// Verse number within the graph's chapter
    pub verse_number: u16,
    /// First token index of the span, inclusive
    pub first_token_index: u16,
    /// Last token index of the span, inclusive
    pub last_token_index: u16,
}

impl VerseTokenRange {
    /// Create a span.
    pub fn new(verse_number: u16, first_token_index: u16, last_token_index: u16) -> Self {
        Self {
            verse_number,
            first_token_index,
            last_token_index,
        }
    }
}

/// A chapter-scoped group of verse-token spans, the input to range queries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRangeGroup {
    /// Chapter number the spans belong to
    pub chapter_number: u16,
    /// Restrict matches to hidden (synthesized) tokens
    pub include_hidden: bool,
    /// Ordered spans
    pub ranges: Vec<VerseTokenRange>,
}

impl TokenRangeGroup {
    /// Create a group over visible tokens.
    pub fn new(chapter_number: u16, ranges: Vec<VerseTokenRange>) -> Self {
        Self {
            chapter_number,
            include_hidden: false,
            ranges,
        }
    }
}

/// A dependency graph, keyed by (chapter, verse, segment).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// Chapter number
    pub chapter_number: u16,
    /// Verse number the graph is anchored to
    pub verse_number: u16,
    /// Segment number distinguishing multiple graphs over one verse
    pub segment_number: u16,
    /// Ordered verse-token spans the graph covers
    pub tokens: Vec<VerseTokenRange>,
    /// Owned node ids, grouped by node type
    pub nodes: BTreeMap<GraphNodeType, Vec<NodeId>>,
}

impl DependencyGraph {
    /// Create an empty graph record.
    pub fn new(chapter_number: u16, verse_number: u16, segment_number: u16) -> Self {
        Self {
            chapter_number,
            verse_number,
            segment_number,
            tokens: Vec::new(),
            nodes: BTreeMap::new(),
        }
    }

    /// Canonical display name, the alternate unique key.
    pub fn display_name(&self) -> String {
        Self::derive_display_name(self.chapter_number, self.verse_number, self.segment_number)
    }

    /// Derive the display name for a (chapter, verse, segment) key.
    pub fn derive_display_name(chapter_number: u16, verse_number: u16, segment_number: u16) -> String {
        format!("{}:{}:{}", chapter_number, verse_number, segment_number)
    }

    /// Build the range group covering this graph's own span.
    pub fn token_group(&self, include_hidden: bool) -> TokenRangeGroup {
        TokenRangeGroup {
            chapter_number: self.chapter_number,
            include_hidden,
            ranges: self.tokens.clone(),
        }
    }
}

/// A node anchored to a corpus token. Shared by the Terminal, Implied,
/// Hidden and Reference variants, all of which own part-of-speech children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalNode {
    /// Node id
    pub id: NodeId,
    /// Token this node annotates
    pub token: TokenAddress,
    /// Exclusively owned part-of-speech child nodes
    pub part_of_speech_nodes: Vec<NodeId>,
}

impl TerminalNode {
    /// Create a terminal-like node over a token with no children yet.
    pub fn new(token: TokenAddress) -> Self {
        Self {
            id: NodeId::new(),
            token,
            part_of_speech_nodes: Vec::new(),
        }
    }
}

/// A part-of-speech annotation bound to a token location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartOfSpeechNode {
    /// Node id
    pub id: NodeId,
    /// Location this annotation describes
    pub location: LocationAddress,
}

impl PartOfSpeechNode {
    /// Create a part-of-speech node for a location.
    pub fn new(location: LocationAddress) -> Self {
        Self {
            id: NodeId::new(),
            location,
        }
    }
}

/// A phrase grouping node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseNode {
    /// Node id
    pub id: NodeId,
    /// Phrase label
    pub label: String,
}

impl PhraseNode {
    /// Create a phrase node.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            label: label.into(),
        }
    }
}

/// A typed relationship between two other nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipNode {
    /// Node id
    pub id: NodeId,
    /// Governing node
    pub owner: NodeId,
    /// Dependent node
    pub dependent: NodeId,
    /// Relationship label
    pub relationship: String,
}

impl RelationshipNode {
    /// Create a relationship node between owner and dependent.
    pub fn new(owner: NodeId, dependent: NodeId, relationship: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            owner,
            dependent,
            relationship: relationship.into(),
        }
    }
}

/// The synthetic root of a rendered graph. Has an id for in-memory wiring
/// but no storage collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootNode {
    /// Node id
    pub id: NodeId,
}

impl RootNode {
    /// Create a root node.
    pub fn new() -> Self {
        Self { id: NodeId::new() }
    }
}

impl Default for RootNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Polymorphic graph node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphNode {
    /// Node over a concrete corpus token
    Terminal(TerminalNode),
    /// Node over an implied (elided) word
    Implied(TerminalNode),
    /// Node over a hidden word
    Hidden(TerminalNode),
    /// Node referencing a token outside the graph's span
    Reference(TerminalNode),
    /// Part-of-speech annotation
    PartOfSpeech(PartOfSpeechNode),
    /// Phrase grouping
    Phrase(PhraseNode),
    /// Relationship edge
    Relationship(RelationshipNode),
    /// Synthetic root
    Root(RootNode),
}

impl GraphNode {
    /// The type tag used for collection dispatch.
    pub fn node_type(&self) -> GraphNodeType {
        match self {
            GraphNode::Terminal(_) => GraphNodeType::Terminal,
            GraphNode::Implied(_) => GraphNodeType::Implied,
            GraphNode::Hidden(_) => GraphNodeType::Hidden,
            GraphNode::Reference(_) => GraphNodeType::Reference,
            GraphNode::PartOfSpeech(_) => GraphNodeType::PartOfSpeech,
            GraphNode::Phrase(_) => GraphNodeType::Phrase,
            GraphNode::Relationship(_) => GraphNodeType::Relationship,
            GraphNode::Root(_) => GraphNodeType::Root,
        }
    }

    /// Node id.
    pub fn id(&self) -> NodeId {
        match self {
            GraphNode::Terminal(n)
            | GraphNode::Implied(n)
            | GraphNode::Hidden(n)
            | GraphNode::Reference(n) => n.id,
            GraphNode::PartOfSpeech(n) => n.id,
            GraphNode::Phrase(n) => n.id,
            GraphNode::Relationship(n) => n.id,
            GraphNode::Root(n) => n.id,
        }
    }

    /// Owned part-of-speech children; empty for variants without ownership.
    pub fn part_of_speech_children(&self) -> &[NodeId] {
        match self {
            GraphNode::Terminal(n)
            | GraphNode::Implied(n)
            | GraphNode::Hidden(n)
            | GraphNode::Reference(n) => &n.part_of_speech_nodes,
            _ => &[],
        }
    }
}
