//! Model builder.
//!
//! Turns a [`DefinitionSet`] into a [`Specialization`] tree. Each definition
//! is validated before it is decoded. A definition with errors is reported and
//! skipped, together with its subtree, while its siblings still build. The
//! caller therefore gets a complete report for the whole set in one pass.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use tracing::{debug, info, warn};

use cimspec_defs::{
    fields, DefinitionSet, DefinitionValidator, DetailEntry, EnumDefinition, GroupDefinition,
    PropertyDefinition, RawDefinition, TopicDefinition, ValidationReport, OTHER_CHOICE,
    TOPLEVEL_KEY,
};

use crate::error::{BuildError, CoreError, CoreResult};
use crate::injection::inject_defaults;
use crate::registry::{IdRegistry, NodeArena};
use crate::tree::{
    EnumChoiceNode, EnumNode, Node, NodeId, NodeKind, PropertyNode, PropertySetNode, RootNode,
    Specialization, TopicKind, TopicNode,
};

/// Namespace prefix of root identifiers unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "cmip6";

/// Builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildOptions {
    /// Prefix of the root identifier (`<namespace>.<root name>`).
    pub namespace: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Result of a build: the tree (absent when the root itself is invalid), its
/// registry and every validation and build message.
#[derive(Debug)]
pub struct BuildOutcome {
    pub tree: Option<Specialization>,
    pub registry: IdRegistry,
    pub report: ValidationReport,
}

impl BuildOutcome {
    pub fn is_valid(&self) -> bool {
        self.tree.is_some() && self.report.is_valid()
    }

    /// The tree and registry of a clean build.
    pub fn into_tree(self) -> CoreResult<(Specialization, IdRegistry)> {
        let error_count = self.report.error_count();
        match self.tree {
            Some(tree) if error_count == 0 => Ok((tree, self.registry)),
            _ => Err(CoreError::Invalid { error_count }),
        }
    }
}

/// Build a specialization tree from a definition set.
pub fn build(set: &DefinitionSet, options: &BuildOptions) -> BuildOutcome {
    ModelBuilder::new(set, options).build()
}

/// Single-use builder holding the state of one build.
pub struct ModelBuilder<'a> {
    set: &'a DefinitionSet,
    options: &'a BuildOptions,
    arena: NodeArena,
    report: ValidationReport,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(set: &'a DefinitionSet, options: &'a BuildOptions) -> Self {
        Self {
            set,
            options,
            arena: NodeArena::new(),
            report: ValidationReport::new(),
        }
    }

    pub fn build(mut self) -> BuildOutcome {
        let set = self.set;
        info!("Building '{}' specialization ({} definitions)", set.scope, set.len());

        let root = self.build_root();
        for reference in &set.unresolved {
            self.report.add_error(
                &set.root.key,
                BuildError::UnresolvedReference(reference.clone()).to_string(),
            );
        }
        for (key, message) in &set.unreadable {
            self.report
                .add_error(key, BuildError::UnreadableDocument(message.clone()).to_string());
        }

        if let Some(raw) = &set.grid {
            let grid = self.build_topic_definition(raw, root);
            self.update_realm(root, |realm| realm.grid = grid);
        }
        if let Some(raw) = &set.key_properties {
            let key_properties = self.build_topic_definition(raw, root);
            self.update_realm(root, |realm| realm.key_properties = key_properties);
        }
        for raw in &set.processes {
            if let Some(process) = self.build_topic_definition(raw, root) {
                self.update_realm(root, |realm| realm.processes.push(process));
            }
        }

        info!(
            "Built '{}': {} nodes, {} errors",
            set.scope,
            self.arena.len(),
            self.report.error_count()
        );

        match root {
            Some(root) => {
                let (tree, registry) = self.arena.finish(root, &set.scope);
                BuildOutcome {
                    tree: Some(tree),
                    registry,
                    report: self.report,
                }
            }
            None => BuildOutcome {
                tree: None,
                registry: self.arena.into_registry(),
                report: self.report,
            },
        }
    }

    fn build_root(&mut self) -> Option<NodeId> {
        let set = self.set;
        let raw = &set.root;
        let errors = DefinitionValidator::validate_root(raw);
        if !errors.is_empty() {
            warn!("Root definition '{}' is invalid", raw.key);
            self.report.extend(&raw.key, errors);
            return None;
        }

        let root = match raw.decode_root(&set.scope) {
            Ok(root) => root,
            Err(e) => {
                self.report.add_error(&raw.key, e.to_string());
                return None;
            }
        };

        let node = Node {
            id: format!("{}.{}", self.options.namespace, root.name),
            name: root.name,
            description: root.description,
            parent: None,
            kind: NodeKind::Root(RootNode {
                authors: root.authors,
                contact: root.contact,
                contributors: root.contributors,
                qc_status: root.qc_status,
                change_history: root.change_history,
                grid: None,
                key_properties: None,
                processes: Vec::new(),
            }),
        };
        debug!("Building root: {}", node.id);

        match self.arena.alloc(node) {
            Ok(id) => Some(id),
            Err(e) => {
                self.report.add_error(&raw.key, e.to_string());
                None
            }
        }
    }

    /// Validate, decode and build one top-level topic under the root.
    fn build_topic_definition(&mut self, raw: &RawDefinition, root: Option<NodeId>) -> Option<NodeId> {
        let Some(root) = root else {
            self.report.extend(&raw.key, DefinitionValidator::validate_topic(raw));
            return None;
        };

        if !DefinitionValidator::validate_topic_body(raw, &[]).is_empty() {
            warn!("Skipping invalid definition '{}'", raw.key);
            self.report.extend(&raw.key, DefinitionValidator::validate_topic(raw));
            return None;
        }

        let mut invalid = Vec::new();
        for (key, messages) in DefinitionValidator::validate_sub_processes(raw) {
            if messages.is_empty() {
                continue;
            }
            warn!("Skipping invalid sub-process '{}' of '{}'", key, raw.key);
            self.report.extend(
                &raw.key,
                messages
                    .into_iter()
                    .map(|m| format!("SUB_PROCESSES[{}] :: {}", key, m))
                    .collect(),
            );
            invalid.push(key);
        }

        let pruned;
        let raw = if invalid.is_empty() {
            raw
        } else {
            pruned = without_sub_processes(raw, &invalid);
            &pruned
        };

        let definition = match raw.decode_topic(&self.set.scope) {
            Ok(definition) => definition,
            Err(e) => {
                self.report.add_error(&raw.key, e.to_string());
                return None;
            }
        };

        let checkpoint = self.arena.checkpoint();
        match self.build_topic(&definition, root, None) {
            Ok(topic) => Some(topic),
            Err(e) => {
                warn!("Skipping '{}': {}", raw.key, e);
                self.arena.rollback(checkpoint);
                self.report.add_error(&raw.key, e.to_string());
                None
            }
        }
    }

    fn build_topic(
        &mut self,
        definition: &TopicDefinition,
        parent: NodeId,
        owner: Option<&TopicDefinition>,
    ) -> Result<NodeId, BuildError> {
        let kind = TopicKind::try_from(definition.kind)
            .map_err(|_| BuildError::InvalidKeyShape(definition.key.clone()))?;

        let id = self.child_id(parent, &definition.name);
        debug!("Building {}: {}", kind.type_key(), id);

        let topic = self.arena.alloc(Node {
            id,
            name: definition.name.clone(),
            description: definition.description.clone(),
            parent: Some(parent),
            kind: NodeKind::Topic(TopicNode {
                authors: definition.authors.clone(),
                contact: definition.contact.clone(),
                qc_status: definition.qc_status,
                ..TopicNode::new(kind)
            }),
        })?;

        self.attach_details(topic, definition, owner)?;
        inject_defaults(&mut self.arena, topic)?;

        for sub_process in &definition.sub_processes {
            let checkpoint = self.arena.checkpoint();
            match self.build_topic(sub_process, topic, Some(definition)) {
                Ok(child) => {
                    if let NodeKind::Topic(data) = &mut self.arena.node_mut(topic).kind {
                        data.sub_processes.push(child);
                    }
                }
                Err(e) => {
                    warn!("Skipping sub-process '{}': {}", sub_process.key, e);
                    self.arena.rollback(checkpoint);
                    self.report.add_error(
                        &definition.key,
                        format!("SUB_PROCESSES[{}] :: {}", sub_process.key, e),
                    );
                }
            }
        }

        Ok(topic)
    }

    /// Partition `DETAILS` by key shape and attach leaves and groups.
    fn attach_details(
        &mut self,
        topic: NodeId,
        definition: &TopicDefinition,
        owner: Option<&TopicDefinition>,
    ) -> Result<(), BuildError> {
        let scope = EnumScope { definition, owner };
        let mut groups: HashMap<&str, NodeId> = HashMap::new();

        for (key, entry) in &definition.details {
            let segments: Vec<&str> = key.split(':').collect();
            match (entry, segments.as_slice()) {
                (DetailEntry::Group(group), [TOPLEVEL_KEY]) => {
                    for property in &group.properties {
                        self.add_property(topic, property, &scope)?;
                    }
                }
                (DetailEntry::Group(group), [TOPLEVEL_KEY, child]) => {
                    self.add_group(topic, child, group, &scope)?;
                }
                (DetailEntry::Group(group), [name]) => {
                    let set = self.add_group(topic, name, group, &scope)?;
                    groups.insert(*name, set);
                }
                (DetailEntry::Group(group), [parent, child]) => {
                    let owner = lookup_group(&groups, key, parent)?;
                    self.add_group(owner, child, group, &scope)?;
                }
                (DetailEntry::Property(property), [_] | [TOPLEVEL_KEY, _]) => {
                    self.add_property(topic, property, &scope)?;
                }
                (DetailEntry::Property(property), [parent, _]) => {
                    let owner = lookup_group(&groups, key, parent)?;
                    self.add_property(owner, property, &scope)?;
                }
                _ if segments.len() > 2 => return Err(BuildError::NestingTooDeep(key.clone())),
                _ => return Err(BuildError::InvalidKeyShape(key.clone())),
            }
        }

        Ok(())
    }

    fn add_group(
        &mut self,
        owner: NodeId,
        name: &str,
        group: &GroupDefinition,
        scope: &EnumScope<'_>,
    ) -> Result<NodeId, BuildError> {
        let id = self.child_id(owner, name);
        debug!("Building property set: {}", id);

        let set = self.arena.alloc(Node {
            id,
            name: name.to_string(),
            description: group.description.clone(),
            parent: Some(owner),
            kind: NodeKind::PropertySet(PropertySetNode::default()),
        })?;
        for property in &group.properties {
            self.add_property(set, property, scope)?;
        }

        match &mut self.arena.node_mut(owner).kind {
            NodeKind::Topic(topic) => topic.property_sets.push(set),
            NodeKind::PropertySet(parent) => parent.property_sets.push(set),
            _ => {}
        }
        Ok(set)
    }

    fn add_property(
        &mut self,
        owner: NodeId,
        property: &PropertyDefinition,
        scope: &EnumScope<'_>,
    ) -> Result<NodeId, BuildError> {
        let id = self.child_id(owner, &property.name);
        debug!("Building property: {}", id);

        let enumeration = match property.type_of.enum_key() {
            Some(key) => Some((
                key,
                scope.resolve(key).ok_or_else(|| BuildError::UnresolvedEnumeration {
                    property: id.clone(),
                    key: key.to_string(),
                })?,
            )),
            None => None,
        };

        let leaf = self.arena.alloc(Node {
            id,
            name: property.name.clone(),
            description: property.description.clone(),
            parent: Some(owner),
            kind: NodeKind::Property(PropertyNode {
                type_of: property.type_of.clone(),
                cardinality: property.cardinality,
                was_injected: false,
                enumeration: None,
            }),
        })?;

        if let Some((key, definition)) = enumeration {
            let enum_id = self.add_enumeration(leaf, key, definition)?;
            if let NodeKind::Property(data) = &mut self.arena.node_mut(leaf).kind {
                data.enumeration = Some(enum_id);
            }
        }

        match &mut self.arena.node_mut(owner).kind {
            NodeKind::Topic(topic) => topic.properties.push(leaf),
            NodeKind::PropertySet(set) => set.properties.push(leaf),
            _ => {}
        }
        Ok(leaf)
    }

    /// Attach an enumeration to a property. An open enumeration always ends
    /// with exactly one `Other` choice, which carries no description.
    fn add_enumeration(
        &mut self,
        property: NodeId,
        key: &str,
        definition: &EnumDefinition,
    ) -> Result<NodeId, BuildError> {
        let id = self.child_id(property, key);
        let enumeration = self.arena.alloc(Node {
            id,
            name: key.to_string(),
            description: definition.description.clone(),
            parent: Some(property),
            kind: NodeKind::Enumeration(EnumNode {
                key: key.to_string(),
                is_open: definition.is_open,
                choices: Vec::new(),
            }),
        })?;

        let mut choices = Vec::with_capacity(definition.members.len() + 1);
        for member in &definition.members {
            if definition.is_open && member.value == OTHER_CHOICE {
                continue;
            }
            let description = member.description.clone().unwrap_or_default();
            choices.push(self.add_choice(enumeration, &member.value, description)?);
        }
        if definition.is_open {
            choices.push(self.add_choice(enumeration, OTHER_CHOICE, String::new())?);
        }

        if let NodeKind::Enumeration(data) = &mut self.arena.node_mut(enumeration).kind {
            data.choices = choices;
        }
        Ok(enumeration)
    }

    fn add_choice(
        &mut self,
        enumeration: NodeId,
        value: &str,
        description: String,
    ) -> Result<NodeId, BuildError> {
        let id = self.child_id(enumeration, value);
        self.arena.alloc(Node {
            id,
            name: value.to_string(),
            description,
            parent: Some(enumeration),
            kind: NodeKind::EnumChoice(EnumChoiceNode {
                value: value.to_string(),
                is_other: value == OTHER_CHOICE,
            }),
        })
    }

    fn child_id(&self, parent: NodeId, name: &str) -> String {
        format!("{}.{}", self.arena.node(parent).id, name)
    }

    fn update_realm(&mut self, root: Option<NodeId>, update: impl FnOnce(&mut RootNode)) {
        if let Some(root) = root {
            if let NodeKind::Root(realm) = &mut self.arena.node_mut(root).kind {
                update(realm);
            }
        }
    }
}

/// Enumeration tables visible from a topic: its own, then its owner's.
struct EnumScope<'d> {
    definition: &'d TopicDefinition,
    owner: Option<&'d TopicDefinition>,
}

impl<'d> EnumScope<'d> {
    fn resolve(&self, key: &str) -> Option<&'d EnumDefinition> {
        self.definition
            .enumeration(key)
            .or_else(|| self.owner.and_then(|owner| owner.enumeration(key)))
    }
}

fn lookup_group(groups: &HashMap<&str, NodeId>, key: &str, parent: &str) -> Result<NodeId, BuildError> {
    groups
        .get(parent)
        .copied()
        .ok_or_else(|| BuildError::MissingParentGroup {
            key: key.to_string(),
            parent: parent.to_string(),
        })
}

/// Copy of a process definition without the named sub-processes.
fn without_sub_processes(raw: &RawDefinition, keys: &[String]) -> RawDefinition {
    let mut pruned = raw.clone();
    if let Some(subs) = pruned
        .fields
        .get_mut(fields::SUB_PROCESSES)
        .and_then(|v| v.as_mapping_mut())
    {
        let kept: Mapping = std::mem::take(subs)
            .into_iter()
            .filter(|(key, _)| !key.as_str().map_or(false, |k| keys.iter().any(|s| s == k)))
            .collect();
        *subs = kept;
    }
    pruned
}
