//! JSON encoding of a specialization tree.
//!
//! Objects are assembled on a stack: every enter event pushes a frame and the
//! matching exit pops it and attaches it to the frame below.

use serde::Serialize;

use cimspec_core::{
    EnumChoiceNode, EnumNode, Node, PropertyNode, PropertySetNode, RootNode, TopicKind, TopicNode,
    Visitor,
};
use cimspec_defs::naming::to_label;

use crate::error::{GeneratorError, GeneratorResult};
use crate::{Generator, GeneratorKind};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonTopic {
    label: String,
    description: String,
    id: String,
    contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    authors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contributors: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<JsonProperty>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    property_sets: Vec<JsonPropertySet>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sub_processes: Vec<JsonTopic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grid: Option<Box<JsonTopic>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_properties: Option<Box<JsonTopic>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    processes: Option<Vec<JsonTopic>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPropertySet {
    label: String,
    description: String,
    id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<JsonProperty>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    property_sets: Vec<JsonPropertySet>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonProperty {
    label: String,
    description: String,
    id: String,
    cardinality: String,
    #[serde(rename = "type")]
    type_of: String,
    was_injected: bool,
    ui_ordinal: usize,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    enumeration: Option<JsonEnum>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonEnum {
    label: String,
    description: String,
    is_open: bool,
    choices: Vec<JsonChoice>,
}

#[derive(Debug, Clone, Serialize)]
struct JsonChoice {
    label: String,
    description: String,
}

#[derive(Debug)]
enum Frame {
    Topic(TopicKind, JsonTopic),
    PropertySet(JsonPropertySet),
    Property(JsonProperty),
    Enum(JsonEnum),
}

/// Encodes a tree as a pretty printed JSON document.
#[derive(Debug, Default)]
pub struct JsonGenerator {
    stack: Vec<Frame>,
    realm_contact: String,
    root: Option<JsonTopic>,
}

impl JsonGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn unexpected(event: &'static str, node: &Node) -> GeneratorError {
        GeneratorError::UnexpectedEvent {
            event,
            id: node.id.clone(),
        }
    }

    fn topic(node: &Node, contact: &str) -> JsonTopic {
        JsonTopic {
            label: to_label(&node.name),
            description: node.description.clone(),
            id: node.id.clone(),
            contact: contact.to_string(),
            ..Default::default()
        }
    }
}

impl Visitor for JsonGenerator {
    type Error = GeneratorError;

    fn enter_root(&mut self, node: &Node, realm: &RootNode) -> GeneratorResult<()> {
        self.realm_contact = realm.contact.clone();
        let mut root = Self::topic(node, &realm.contact);
        root.authors = Some(realm.authors.clone());
        root.contributors = Some(realm.contributors.clone());
        root.processes = Some(Vec::new());
        self.stack.clear();
        self.root = None;
        self.stack.push(Frame::Topic(TopicKind::Process, root));
        Ok(())
    }

    fn exit_root(&mut self, node: &Node, _realm: &RootNode) -> GeneratorResult<()> {
        match self.stack.pop() {
            Some(Frame::Topic(_, root)) if self.stack.is_empty() => {
                self.root = Some(root);
                Ok(())
            }
            _ => Err(Self::unexpected("exit root", node)),
        }
    }

    fn enter_topic(&mut self, node: &Node, topic: &TopicNode) -> GeneratorResult<()> {
        let contact = topic.contact.as_deref().unwrap_or(&self.realm_contact);
        let json = Self::topic(node, contact);
        self.stack.push(Frame::Topic(topic.kind, json));
        Ok(())
    }

    fn exit_topic(&mut self, node: &Node, _topic: &TopicNode) -> GeneratorResult<()> {
        let Some(Frame::Topic(kind, json)) = self.stack.pop() else {
            return Err(Self::unexpected("exit topic", node));
        };
        let Some(Frame::Topic(_, owner)) = self.stack.last_mut() else {
            return Err(Self::unexpected("exit topic", node));
        };

        match kind {
            TopicKind::Grid => owner.grid = Some(Box::new(json)),
            TopicKind::KeyProperties => owner.key_properties = Some(Box::new(json)),
            TopicKind::Process => owner.processes.get_or_insert_with(Vec::new).push(json),
            TopicKind::SubProcess => owner.sub_processes.push(json),
        }
        Ok(())
    }

    fn enter_property_set(&mut self, node: &Node, _set: &PropertySetNode) -> GeneratorResult<()> {
        self.stack.push(Frame::PropertySet(JsonPropertySet {
            label: to_label(&node.name),
            description: node.description.clone(),
            id: node.id.clone(),
            properties: Vec::new(),
            property_sets: Vec::new(),
        }));
        Ok(())
    }

    fn exit_property_set(&mut self, node: &Node, _set: &PropertySetNode) -> GeneratorResult<()> {
        let Some(Frame::PropertySet(json)) = self.stack.pop() else {
            return Err(Self::unexpected("exit property set", node));
        };
        match self.stack.last_mut() {
            Some(Frame::Topic(_, owner)) => owner.property_sets.push(json),
            Some(Frame::PropertySet(owner)) => owner.property_sets.push(json),
            _ => return Err(Self::unexpected("exit property set", node)),
        }
        Ok(())
    }

    fn enter_property(&mut self, node: &Node, property: &PropertyNode) -> GeneratorResult<()> {
        let type_of = if property.enumeration.is_some() {
            "enum".to_string()
        } else {
            property.type_of.as_raw()
        };
        self.stack.push(Frame::Property(JsonProperty {
            label: to_label(&node.name),
            description: node.description.clone(),
            id: node.id.clone(),
            cardinality: property.cardinality.to_string(),
            type_of,
            was_injected: property.was_injected,
            ui_ordinal: 0,
            enumeration: None,
        }));
        Ok(())
    }

    fn exit_property(&mut self, node: &Node, _property: &PropertyNode) -> GeneratorResult<()> {
        let Some(Frame::Property(mut json)) = self.stack.pop() else {
            return Err(Self::unexpected("exit property", node));
        };
        let properties = match self.stack.last_mut() {
            Some(Frame::Topic(_, owner)) => &mut owner.properties,
            Some(Frame::PropertySet(owner)) => &mut owner.properties,
            _ => return Err(Self::unexpected("exit property", node)),
        };
        json.ui_ordinal = properties.len() + 1;
        properties.push(json);
        Ok(())
    }

    fn enter_enum(&mut self, node: &Node, enumeration: &EnumNode) -> GeneratorResult<()> {
        self.stack.push(Frame::Enum(JsonEnum {
            label: to_label(&node.name),
            description: node.description.clone(),
            is_open: enumeration.is_open,
            choices: Vec::with_capacity(enumeration.choices.len()),
        }));
        Ok(())
    }

    fn exit_enum(&mut self, node: &Node, _enumeration: &EnumNode) -> GeneratorResult<()> {
        let Some(Frame::Enum(json)) = self.stack.pop() else {
            return Err(Self::unexpected("exit enum", node));
        };
        let Some(Frame::Property(owner)) = self.stack.last_mut() else {
            return Err(Self::unexpected("exit enum", node));
        };
        owner.enumeration = Some(json);
        Ok(())
    }

    fn enter_enum_choice(&mut self, node: &Node, choice: &EnumChoiceNode) -> GeneratorResult<()> {
        let Some(Frame::Enum(owner)) = self.stack.last_mut() else {
            return Err(Self::unexpected("enter enum choice", node));
        };
        owner.choices.push(JsonChoice {
            label: choice.value.clone(),
            description: node.description.clone(),
        });
        Ok(())
    }
}

impl Generator for JsonGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Json
    }

    fn output(&self) -> GeneratorResult<String> {
        let root = self.root.as_ref().ok_or(GeneratorError::Incomplete)?;
        Ok(serde_json::to_string_pretty(root)?)
    }
}
