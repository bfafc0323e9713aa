//! Identifier registry and node arena for a single build.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{BuildError, CoreError, CoreResult};
use crate::tree::{Node, NodeId, Specialization};

/// Maps node identifiers to nodes of one built tree.
///
/// Each build produces its own registry; nothing is shared between builds.
#[derive(Default, Clone)]
pub struct IdRegistry {
    index: HashMap<String, NodeId>,
}

impl IdRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Register an identifier. A duplicate is a build error and leaves the
    /// existing entry untouched.
    pub fn register(&mut self, id: impl Into<String>, node: NodeId) -> Result<(), BuildError> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(BuildError::DuplicateIdentifier(id));
        }
        debug!("Registering node: {}", id);
        self.index.insert(id, node);
        Ok(())
    }

    /// Get a node by identifier.
    pub fn get(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Get a node by identifier, returning an error if not found.
    pub fn get_required(&self, id: &str) -> CoreResult<NodeId> {
        self.get(id)
            .ok_or_else(|| CoreError::UnknownIdentifier(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.index.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub(crate) fn unregister(&mut self, id: &str) -> Option<NodeId> {
        self.index.remove(id)
    }
}

impl std::fmt::Debug for IdRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

/// Growable node storage used while building.
///
/// Allocation registers the node id; [`NodeArena::rollback`] discards every
/// node allocated after a checkpoint, so a failed subtree leaves no trace.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    registry: IdRegistry,
}

/// Position in a [`NodeArena`] that can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: Node) -> Result<NodeId, BuildError> {
        let id = NodeId(self.nodes.len());
        self.registry.register(node.id.clone(), id)?;
        self.nodes.push(node);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn registry(&self) -> &IdRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.nodes.len())
    }

    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        if checkpoint.0 >= self.nodes.len() {
            return;
        }
        debug!("Rolling back {} nodes", self.nodes.len() - checkpoint.0);
        for node in self.nodes.drain(checkpoint.0..) {
            self.registry.unregister(&node.id);
        }
    }

    /// Freeze the arena into a tree rooted at `root`.
    pub fn finish(self, root: NodeId, scope: impl Into<String>) -> (Specialization, IdRegistry) {
        let tree = Specialization {
            nodes: self.nodes,
            root,
            scope: scope.into(),
        };
        (tree, self.registry)
    }

    /// Discard the nodes, keeping only the registry.
    pub fn into_registry(self) -> IdRegistry {
        self.registry
    }
}
