//! Flat identifier listings (CSV).
//!
//! Rows are `id, label, type-key`. Blank rows separate the realm's topics:
//! level 1 (and the full listing) emits them before each grid, key
//! properties and process, levels 2 and 3 after each one. A blank row never
//! follows another blank row.

use cimspec_core::{Node, PropertyNode, PropertySetNode, RootNode, TopicKind, TopicNode, Visitor};

use crate::error::{GeneratorError, GeneratorResult};
use crate::{Generator, GeneratorKind};

/// Which identifiers a listing contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdLevel {
    /// Realm, topics, property sets and details.
    All,
    /// Realm and topics.
    Topics,
    /// Property sets.
    PropertySets,
    /// Details.
    Properties,
}

impl IdLevel {
    fn includes_topics(self) -> bool {
        matches!(self, IdLevel::All | IdLevel::Topics)
    }

    fn includes_property_sets(self) -> bool {
        matches!(self, IdLevel::All | IdLevel::PropertySets)
    }

    fn includes_properties(self) -> bool {
        matches!(self, IdLevel::All | IdLevel::Properties)
    }

    fn separates_before(self) -> bool {
        self.includes_topics()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    id: String,
    label: String,
    type_key: String,
}

impl Row {
    fn blank() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            type_key: String::new(),
        }
    }

    fn is_blank(&self) -> bool {
        self.id.is_empty()
    }
}

#[derive(Debug)]
pub struct IdsGenerator {
    level: IdLevel,
    namespace: String,
    rows: Vec<Row>,
}

impl IdsGenerator {
    pub fn new(level: IdLevel, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let header = Row {
            id: format!("{}-id", namespace),
            label: format!("{}-label", namespace),
            type_key: format!("{}-type", namespace),
        };
        Self {
            level,
            namespace,
            rows: vec![header],
        }
    }

    fn separator(&mut self) {
        if self.rows.last().map_or(false, |row| !row.is_blank()) {
            self.rows.push(Row::blank());
        }
    }

    fn push(&mut self, node: &Node) {
        self.rows.push(Row {
            id: node.id.clone(),
            label: self.label(&node.id),
            type_key: node.type_key().to_string(),
        });
    }

    /// Labels of the id segments after the namespace, joined with ` > `.
    fn label(&self, id: &str) -> String {
        let prefix = format!("{}.", self.namespace);
        id.strip_prefix(&prefix)
            .unwrap_or(id)
            .split('.')
            .map(cimspec_defs::naming::to_label)
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

fn is_realm_topic(topic: &TopicNode) -> bool {
    topic.kind != TopicKind::SubProcess
}

impl Visitor for IdsGenerator {
    type Error = GeneratorError;

    fn enter_root(&mut self, node: &Node, _realm: &RootNode) -> GeneratorResult<()> {
        self.rows.truncate(1);
        if self.level.includes_topics() {
            self.push(node);
        }
        Ok(())
    }

    fn enter_topic(&mut self, node: &Node, topic: &TopicNode) -> GeneratorResult<()> {
        if is_realm_topic(topic) && self.level.separates_before() {
            self.separator();
        }
        if self.level.includes_topics() {
            self.push(node);
        }
        Ok(())
    }

    fn exit_topic(&mut self, _node: &Node, topic: &TopicNode) -> GeneratorResult<()> {
        if is_realm_topic(topic) && !self.level.separates_before() {
            self.separator();
        }
        Ok(())
    }

    fn enter_property_set(&mut self, node: &Node, _set: &PropertySetNode) -> GeneratorResult<()> {
        if self.level.includes_property_sets() {
            self.push(node);
        }
        Ok(())
    }

    fn enter_property(&mut self, node: &Node, _property: &PropertyNode) -> GeneratorResult<()> {
        if self.level.includes_properties() {
            self.push(node);
        }
        Ok(())
    }
}

impl Generator for IdsGenerator {
    fn kind(&self) -> GeneratorKind {
        match self.level {
            IdLevel::All => GeneratorKind::Ids,
            IdLevel::Topics => GeneratorKind::IdsLevel1,
            IdLevel::PropertySets => GeneratorKind::IdsLevel2,
            IdLevel::Properties => GeneratorKind::IdsLevel3,
        }
    }

    fn output(&self) -> GeneratorResult<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        // Columns after the first carry a leading space: `id, label, type`.
        for row in &self.rows {
            let label = format!(" {}", row.label);
            let type_key = format!(" {}", row.type_key);
            writer.write_record([row.id.as_str(), label.as_str(), type_key.as_str()])?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        String::from_utf8(bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }
}
