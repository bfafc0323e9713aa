//! Default property injection.
//!
//! Every topic ends up with a `name` and an `overview` leaf. When the
//! definition does not declare them the builder synthesizes them, flagged
//! with `was_injected`.

use tracing::debug;

use cimspec_defs::naming::to_label;
use cimspec_defs::{Cardinality, PropertyType};

use crate::error::BuildError;
use crate::registry::NodeArena;
use crate::tree::{Node, NodeId, NodeKind, PropertyNode, TopicKind};

pub const NAME_PROPERTY: &str = "name";
pub const OVERVIEW_PROPERTY: &str = "overview";

/// Inject missing default properties into a topic.
///
/// Injected leaves follow the declared ones, `name` before `overview`.
/// Running this again on the same topic is a no-op. Returns the number of
/// properties added.
pub fn inject_defaults(arena: &mut NodeArena, topic: NodeId) -> Result<usize, BuildError> {
    let (topic_id, label, kind, existing) = {
        let node = arena.node(topic);
        let NodeKind::Topic(data) = &node.kind else {
            return Ok(0);
        };
        let existing: Vec<String> = data
            .properties
            .iter()
            .map(|p| arena.node(*p).name.clone())
            .collect();
        (node.id.clone(), to_label(&node.name), data.kind, existing)
    };

    let mut injected = Vec::new();
    for (name, cardinality) in [
        (NAME_PROPERTY, Cardinality::OneOne),
        (OVERVIEW_PROPERTY, Cardinality::ZeroOne),
    ] {
        if existing.iter().any(|e| e == name) {
            continue;
        }
        let id = format!("{}.{}", topic_id, name);
        if arena.registry().contains(&id) {
            debug!("Not injecting {}: identifier already taken", id);
            continue;
        }

        debug!("Injecting property: {}", id);
        let property = arena.alloc(Node {
            id,
            name: name.to_string(),
            description: default_description(name, &label, kind),
            parent: Some(topic),
            kind: NodeKind::Property(PropertyNode {
                type_of: PropertyType::Str,
                cardinality,
                was_injected: true,
                enumeration: None,
            }),
        })?;
        injected.push(property);
    }

    let count = injected.len();
    if count > 0 {
        if let NodeKind::Topic(data) = &mut arena.node_mut(topic).kind {
            data.properties.extend(injected);
        }
    }
    Ok(count)
}

fn default_description(property: &str, label: &str, kind: TopicKind) -> String {
    let kind = kind.definition_kind().display_name();
    if property == NAME_PROPERTY {
        format!("Commonly used name for the {} {} in model.", label, kind)
    } else {
        format!("Overview of {} {} in model.", label, kind)
    }
}
