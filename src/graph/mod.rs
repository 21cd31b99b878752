//! Graph layer: dependency-graph records, node collections and lifecycle

pub mod manager;
pub mod model;
pub mod registry;

pub use manager::DependencyGraphManager;
pub use model::{
    DependencyGraph, GraphNode, PartOfSpeechNode, PhraseNode, RelationshipNode, RootNode,
    TerminalNode, TokenRangeGroup, VerseTokenRange,
};
pub use registry::GraphNodeRegistry;
