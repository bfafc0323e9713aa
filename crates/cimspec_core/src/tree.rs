//! The normalized specialization tree.
//!
//! Nodes live in a single arena owned by [`Specialization`] and refer to each
//! other by [`NodeId`]. Parent links are plain back references; ownership runs
//! through the child lists.

use std::fmt;

use serde::{Deserialize, Serialize};

use cimspec_defs::{Cardinality, ChangeRecord, DefinitionKind, PropertyType, QcStatus};

/// Index of a node inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of an organizational topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopicKind {
    Grid,
    KeyProperties,
    Process,
    SubProcess,
}

impl TopicKind {
    pub fn definition_kind(&self) -> DefinitionKind {
        match self {
            TopicKind::Grid => DefinitionKind::Grid,
            TopicKind::KeyProperties => DefinitionKind::KeyProperties,
            TopicKind::Process => DefinitionKind::Process,
            TopicKind::SubProcess => DefinitionKind::SubProcess,
        }
    }

    pub fn type_key(&self) -> &'static str {
        self.definition_kind().type_key()
    }
}

impl TryFrom<DefinitionKind> for TopicKind {
    type Error = DefinitionKind;

    fn try_from(kind: DefinitionKind) -> Result<Self, Self::Error> {
        match kind {
            DefinitionKind::Grid => Ok(TopicKind::Grid),
            DefinitionKind::KeyProperties => Ok(TopicKind::KeyProperties),
            DefinitionKind::Process => Ok(TopicKind::Process),
            DefinitionKind::SubProcess => Ok(TopicKind::SubProcess),
            other => Err(other),
        }
    }
}

/// Realm level attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct RootNode {
    pub authors: String,
    pub contact: String,
    pub contributors: String,
    pub qc_status: QcStatus,
    pub change_history: Vec<ChangeRecord>,
    pub grid: Option<NodeId>,
    pub key_properties: Option<NodeId>,
    pub processes: Vec<NodeId>,
}

/// A grid, key properties, process or sub-process.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicNode {
    pub kind: TopicKind,
    pub authors: Option<String>,
    pub contact: Option<String>,
    pub qc_status: Option<QcStatus>,
    /// Direct ("toplevel") leaf properties.
    pub properties: Vec<NodeId>,
    pub property_sets: Vec<NodeId>,
    pub sub_processes: Vec<NodeId>,
}

impl TopicNode {
    pub fn new(kind: TopicKind) -> Self {
        Self {
            kind,
            authors: None,
            contact: None,
            qc_status: None,
            properties: Vec::new(),
            property_sets: Vec::new(),
            sub_processes: Vec::new(),
        }
    }
}

/// A named group of leaf properties, optionally holding one further level of groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySetNode {
    pub properties: Vec<NodeId>,
    pub property_sets: Vec<NodeId>,
}

/// A leaf property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    pub type_of: PropertyType,
    pub cardinality: Cardinality,
    /// Synthesized by the builder rather than declared.
    pub was_injected: bool,
    pub enumeration: Option<NodeId>,
}

/// A controlled vocabulary attached to a property.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumNode {
    /// Key of the enumeration in its declaring table.
    pub key: String,
    pub is_open: bool,
    pub choices: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumChoiceNode {
    pub value: String,
    pub is_other: bool,
}

/// Node payload by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root(RootNode),
    Topic(TopicNode),
    PropertySet(PropertySetNode),
    Property(PropertyNode),
    Enumeration(EnumNode),
    EnumChoice(EnumChoiceNode),
}

/// A node of the specialization tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Dot delimited identifier, unique within the tree.
    pub id: String,
    pub name: String,
    /// Empty only for enum choices declared without a description.
    pub description: String,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    /// Type key used by generators.
    pub fn type_key(&self) -> &'static str {
        match &self.kind {
            NodeKind::Root(_) => DefinitionKind::Root.type_key(),
            NodeKind::Topic(topic) => topic.kind.type_key(),
            NodeKind::PropertySet(_) => "detail-set",
            NodeKind::Property(_) => "detail",
            NodeKind::Enumeration(_) => "enum",
            NodeKind::EnumChoice(_) => "enum-choice",
        }
    }

    pub fn as_root(&self) -> Option<&RootNode> {
        match &self.kind {
            NodeKind::Root(root) => Some(root),
            _ => None,
        }
    }

    pub fn as_topic(&self) -> Option<&TopicNode> {
        match &self.kind {
            NodeKind::Topic(topic) => Some(topic),
            _ => None,
        }
    }

    pub fn as_property_set(&self) -> Option<&PropertySetNode> {
        match &self.kind {
            NodeKind::PropertySet(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyNode> {
        match &self.kind {
            NodeKind::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<&EnumNode> {
        match &self.kind {
            NodeKind::Enumeration(enumeration) => Some(enumeration),
            _ => None,
        }
    }

    pub fn as_enum_choice(&self) -> Option<&EnumChoiceNode> {
        match &self.kind {
            NodeKind::EnumChoice(choice) => Some(choice),
            _ => None,
        }
    }

    /// Leaf properties directly owned by a topic or property set.
    pub fn properties(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Topic(topic) => &topic.properties,
            NodeKind::PropertySet(set) => &set.properties,
            _ => &[],
        }
    }

    /// Property sets directly owned by a topic or property set.
    pub fn property_sets(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Topic(topic) => &topic.property_sets,
            NodeKind::PropertySet(set) => &set.property_sets,
            _ => &[],
        }
    }
}

/// A fully built, immutable specialization tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Specialization {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) scope: String,
}

impl Specialization {
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> &Node {
        self.node(self.root)
    }

    /// Realm attributes of the root node.
    pub fn realm(&self) -> &RootNode {
        match &self.root().kind {
            NodeKind::Root(root) => root,
            _ => unreachable!("tree root is always a root node"),
        }
    }

    /// Look up a node. Ids are only ever handed out by this tree, so the
    /// index is always in bounds.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<&Node> {
        self.node(id).parent.map(|p| self.node(p))
    }

    /// Topics in traversal order: grid, key properties, then processes.
    pub fn topics(&self) -> Vec<NodeId> {
        let realm = self.realm();
        realm
            .grid
            .iter()
            .chain(realm.key_properties.iter())
            .chain(realm.processes.iter())
            .copied()
            .collect()
    }

    /// Nearest topic owning a node (the node itself when it is a topic).
    pub fn owning_topic(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(candidate) = current {
            let node = self.node(candidate);
            if node.as_topic().is_some() {
                return Some(candidate);
            }
            current = node.parent;
        }
        None
    }
}
