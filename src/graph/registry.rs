//! Node-type to collection dispatch and cascading node deletion
//!
//! Each graph-node variant lives in its own storage collection; the registry
//! resolves a type tag to its collection handle and owns the cascade rule:
//! terminal-like variants delete their part-of-speech children before their
//! own row. `Root` resolves to no collection and deletes as a no-op.

use crate::core::error::Result;
use crate::core::types::{GraphNodeType, NodeId};
use crate::graph::model::GraphNode;
use crate::storage::{CorpusStore, NodeCollection};
use std::sync::Arc;
use tracing::debug;

/// Uniform create/read/delete access to the per-type node collections.
#[derive(Clone)]
pub struct GraphNodeRegistry {
    store: Arc<dyn CorpusStore>,
}

impl GraphNodeRegistry {
    /// Create a registry over a store handle.
    pub fn new(store: Arc<dyn CorpusStore>) -> Self {
        Self { store }
    }

    /// The collection handle for a node type; `None` for `Root`.
    pub fn collection(&self, node_type: GraphNodeType) -> Option<&dyn NodeCollection> {
        self.store.node_collection(node_type)
    }

    /// Persist a node into its typed collection. Persisting a root node is a
    /// no-op.
    pub fn save(&self, node: GraphNode) -> Result<()> {
        match self.collection(node.node_type()) {
            Some(collection) => collection.save(node),
            None => {
                debug!(node_type = %node.node_type(), "no collection; save skipped");
                Ok(())
            }
        }
    }

    /// Look up a node of a known type by id.
    pub fn find_by_id(&self, node_type: GraphNodeType, id: &NodeId) -> Option<GraphNode> {
        self.collection(node_type)?.find_by_id(id)
    }

    /// Delete a node, cascading over its owned part-of-speech children
    /// first. Children have no owned children of their own, so the cascade
    /// is single-level. Deleting a root node is a no-op.
    pub fn delete(&self, node: &GraphNode) -> Result<()> {
        if node.node_type().owns_part_of_speech() {
            if let Some(pos_collection) = self.collection(GraphNodeType::PartOfSpeech) {
                for child_id in node.part_of_speech_children() {
                    debug!(
                        node_id = %node.id(),
                        child_id = %child_id,
                        "deleting owned part-of-speech child"
                    );
                    pos_collection.delete_by_id(child_id)?;
                }
            }
        }

        match self.collection(node.node_type()) {
            Some(collection) => collection.delete_by_id(&node.id()),
            None => {
                debug!(node_type = %node.node_type(), "no collection; delete is a no-op");
                Ok(())
            }
        }
    }

    /// Delete by type and id: loads the node so the cascade above applies.
    /// An id with no stored node is a no-op, keeping re-deletes idempotent.
    pub fn delete_by_id(&self, node_type: GraphNodeType, id: &NodeId) -> Result<()> {
        let Some(collection) = self.collection(node_type) else {
            return Ok(());
        };
        match collection.find_by_id(id) {
            Some(node) => self.delete(&node),
            None => {
                debug!(node_type = %node_type, node_id = %id, "node already absent");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{LocationAddress, TokenAddress};
    use crate::graph::model::{PartOfSpeechNode, PhraseNode, RootNode, TerminalNode};
    use crate::storage::MemStore;

    fn registry() -> (Arc<MemStore>, GraphNodeRegistry) {
        let store = Arc::new(MemStore::new());
        let registry = GraphNodeRegistry::new(store.clone());
        (store, registry)
    }

    /// Save a terminal node with two part-of-speech children; returns the
    /// terminal node and the child ids.
    fn terminal_with_children(registry: &GraphNodeRegistry) -> (GraphNode, Vec<NodeId>) {
        let mut terminal = TerminalNode::new(TokenAddress::new(1, 1, 1));
        let mut child_ids = Vec::new();
        for location_number in 1..=2 {
            let child = PartOfSpeechNode::new(LocationAddress::new(1, 1, 1, location_number));
            child_ids.push(child.id);
            terminal.part_of_speech_nodes.push(child.id);
            registry.save(GraphNode::PartOfSpeech(child)).unwrap();
        }
        let node = GraphNode::Terminal(terminal);
        registry.save(node.clone()).unwrap();
        (node, child_ids)
    }

    #[test]
    fn test_collection_per_type() {
        let (_, registry) = registry();
        for node_type in GraphNodeType::ALL {
            if node_type == GraphNodeType::Root {
                assert!(registry.collection(node_type).is_none());
            } else {
                assert!(registry.collection(node_type).is_some());
            }
        }
    }

    #[test]
    fn test_cascade_delete_removes_children() {
        let (store, registry) = registry();
        let (node, child_ids) = terminal_with_children(&registry);

        let terminals = store.node_collection(GraphNodeType::Terminal).unwrap();
        let pos = store.node_collection(GraphNodeType::PartOfSpeech).unwrap();
        assert_eq!(terminals.len(), 1);
        assert_eq!(pos.len(), 2);

        registry.delete(&node).unwrap();

        assert_eq!(terminals.len(), 0);
        assert_eq!(pos.len(), 0);
        for child_id in &child_ids {
            assert!(pos.find_by_id(child_id).is_none());
        }
    }

    #[test]
    fn test_delete_by_id_cascades() {
        let (store, registry) = registry();
        let (node, _) = terminal_with_children(&registry);

        registry
            .delete_by_id(GraphNodeType::Terminal, &node.id())
            .unwrap();

        let pos = store.node_collection(GraphNodeType::PartOfSpeech).unwrap();
        assert!(pos.is_empty());
        // repeating the delete is a no-op
        registry
            .delete_by_id(GraphNodeType::Terminal, &node.id())
            .unwrap();
    }

    #[test]
    fn test_direct_delete_without_cascade() {
        let (store, registry) = registry();
        let phrase = GraphNode::Phrase(PhraseNode::new("predicate"));
        let id = phrase.id();
        registry.save(phrase.clone()).unwrap();

        registry.delete(&phrase).unwrap();
        let phrases = store.node_collection(GraphNodeType::Phrase).unwrap();
        assert!(phrases.find_by_id(&id).is_none());
    }

    #[test]
    fn test_root_is_noop() {
        let (_, registry) = registry();
        let root = GraphNode::Root(RootNode::new());
        // neither save nor delete of a root node errors
        registry.save(root.clone()).unwrap();
        registry.delete(&root).unwrap();
        registry
            .delete_by_id(GraphNodeType::Root, &root.id())
            .unwrap();
    }
}
