//! Traversal engine.
//!
//! One deterministic depth-first walk of a built tree:
//!
//! ```text
//! enter root
//!   grid, key properties, then each process in declared order:
//!     enter topic
//!       leaves, property sets (depth first), sub-processes
//!     exit topic
//! exit root
//! ```
//!
//! A leaf raises enter property, its enumeration (enter enum, each choice,
//! exit enum) and exit property. A property set raises its leaves and then its
//! nested sets. The tree is never mutated, so several engines may walk the
//! same tree concurrently.

use tracing::{debug, trace};

use crate::tree::{Node, NodeId, NodeKind, Specialization, TopicKind, TopicNode};
use crate::visitor::Visitor;

/// Drives a [`Visitor`] over a [`Specialization`].
#[derive(Debug, Clone, Copy)]
pub struct TraversalEngine<'t> {
    tree: &'t Specialization,
}

impl<'t> TraversalEngine<'t> {
    pub fn new(tree: &'t Specialization) -> Self {
        Self { tree }
    }

    /// Walk the whole tree. The first hook error stops the walk and is returned.
    pub fn run<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        let root = self.tree.root();
        let realm = self.tree.realm();
        debug!("Traversing '{}'", root.id);

        visitor.enter_root(root, realm)?;
        for topic in self.tree.topics() {
            self.visit_topic(visitor, topic)?;
        }
        visitor.exit_root(root, realm)
    }

    fn visit_topic<V: Visitor + ?Sized>(&self, visitor: &mut V, id: NodeId) -> Result<(), V::Error> {
        let node = self.tree.node(id);
        let NodeKind::Topic(topic) = &node.kind else {
            return Ok(());
        };
        trace!("Visiting topic {}", node.id);

        enter_topic(visitor, node, topic)?;
        self.visit_members(visitor, node)?;
        for sub_process in &topic.sub_processes {
            self.visit_topic(visitor, *sub_process)?;
        }
        exit_topic(visitor, node, topic)
    }

    /// Leaves first, then property sets.
    fn visit_members<V: Visitor + ?Sized>(&self, visitor: &mut V, owner: &Node) -> Result<(), V::Error> {
        for property in owner.properties() {
            self.visit_property(visitor, *property)?;
        }
        for set in owner.property_sets() {
            self.visit_property_set(visitor, *set)?;
        }
        Ok(())
    }

    fn visit_property_set<V: Visitor + ?Sized>(&self, visitor: &mut V, id: NodeId) -> Result<(), V::Error> {
        let node = self.tree.node(id);
        let NodeKind::PropertySet(set) = &node.kind else {
            return Ok(());
        };

        visitor.enter_property_set(node, set)?;
        self.visit_members(visitor, node)?;
        visitor.exit_property_set(node, set)
    }

    fn visit_property<V: Visitor + ?Sized>(&self, visitor: &mut V, id: NodeId) -> Result<(), V::Error> {
        let node = self.tree.node(id);
        let NodeKind::Property(property) = &node.kind else {
            return Ok(());
        };

        visitor.enter_property(node, property)?;
        if let Some(enumeration) = property.enumeration {
            self.visit_enum(visitor, enumeration)?;
        }
        visitor.exit_property(node, property)
    }

    fn visit_enum<V: Visitor + ?Sized>(&self, visitor: &mut V, id: NodeId) -> Result<(), V::Error> {
        let node = self.tree.node(id);
        let NodeKind::Enumeration(enumeration) = &node.kind else {
            return Ok(());
        };

        visitor.enter_enum(node, enumeration)?;
        for choice_id in &enumeration.choices {
            let choice_node = self.tree.node(*choice_id);
            if let NodeKind::EnumChoice(choice) = &choice_node.kind {
                visitor.enter_enum_choice(choice_node, choice)?;
                visitor.exit_enum_choice(choice_node, choice)?;
            }
        }
        visitor.exit_enum(node, enumeration)
    }
}

/// Walk `tree` with `visitor`.
pub fn run<V: Visitor + ?Sized>(tree: &Specialization, visitor: &mut V) -> Result<(), V::Error> {
    TraversalEngine::new(tree).run(visitor)
}

fn enter_topic<V: Visitor + ?Sized>(visitor: &mut V, node: &Node, topic: &TopicNode) -> Result<(), V::Error> {
    match topic.kind {
        TopicKind::Grid => visitor.enter_grid(node, topic),
        TopicKind::KeyProperties => visitor.enter_key_properties(node, topic),
        TopicKind::Process => visitor.enter_process(node, topic),
        TopicKind::SubProcess => visitor.enter_sub_process(node, topic),
    }
}

fn exit_topic<V: Visitor + ?Sized>(visitor: &mut V, node: &Node, topic: &TopicNode) -> Result<(), V::Error> {
    match topic.kind {
        TopicKind::Grid => visitor.exit_grid(node, topic),
        TopicKind::KeyProperties => visitor.exit_key_properties(node, topic),
        TopicKind::Process => visitor.exit_process(node, topic),
        TopicKind::SubProcess => visitor.exit_sub_process(node, topic),
    }
}
