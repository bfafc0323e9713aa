//! Visitor interface driven by the traversal engine.
//!
//! Every hook has a no-op default so a visitor implements only what it needs.
//! The four topic kinds share one pair of handlers, [`Visitor::enter_topic`]
//! and [`Visitor::exit_topic`], unless a visitor overrides a kind-specific
//! hook.

use std::fmt;

use crate::tree::{
    EnumChoiceNode, EnumNode, Node, PropertyNode, PropertySetNode, RootNode, TopicNode,
};

#[allow(unused_variables)]
pub trait Visitor {
    type Error;

    fn enter_root(&mut self, node: &Node, realm: &RootNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_root(&mut self, node: &Node, realm: &RootNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Shared handler for every topic kind.
    fn enter_topic(&mut self, node: &Node, topic: &TopicNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_topic(&mut self, node: &Node, topic: &TopicNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_grid(&mut self, node: &Node, topic: &TopicNode) -> Result<(), Self::Error> {
        self.enter_topic(node, topic)
    }

    fn exit_grid(&mut self, node: &Node, topic: &TopicNode) -> Result<(), Self::Error> {
        self.exit_topic(node, topic)
    }

    fn enter_key_properties(&mut self, node: &Node, topic: &TopicNode) -> Result<(), Self::Error> {
        self.enter_topic(node, topic)
    }

    fn exit_key_properties(&mut self, node: &Node, topic: &TopicNode) -> Result<(), Self::Error> {
        self.exit_topic(node, topic)
    }

    fn enter_process(&mut self, node: &Node, topic: &TopicNode) -> Result<(), Self::Error> {
        self.enter_topic(node, topic)
    }

    fn exit_process(&mut self, node: &Node, topic: &TopicNode) -> Result<(), Self::Error> {
        self.exit_topic(node, topic)
    }

    fn enter_sub_process(&mut self, node: &Node, topic: &TopicNode) -> Result<(), Self::Error> {
        self.enter_topic(node, topic)
    }

    fn exit_sub_process(&mut self, node: &Node, topic: &TopicNode) -> Result<(), Self::Error> {
        self.exit_topic(node, topic)
    }

    fn enter_property_set(&mut self, node: &Node, set: &PropertySetNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_property_set(&mut self, node: &Node, set: &PropertySetNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_property(&mut self, node: &Node, property: &PropertyNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_property(&mut self, node: &Node, property: &PropertyNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_enum(&mut self, node: &Node, enumeration: &EnumNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_enum(&mut self, node: &Node, enumeration: &EnumNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_enum_choice(&mut self, node: &Node, choice: &EnumChoiceNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_enum_choice(&mut self, node: &Node, choice: &EnumChoiceNode) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Whether an event opens or closes a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Enter,
    Exit,
}

/// One recorded traversal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub phase: Phase,
    /// Type key of the node (`process`, `detail-set`, ...).
    pub type_key: &'static str,
    pub id: String,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.phase {
            Phase::Enter => "enter",
            Phase::Exit => "exit",
        };
        write!(f, "{} {} {}", phase, self.type_key, self.id)
    }
}

/// Visitor that records every event it sees.
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    pub events: Vec<Event>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, phase: Phase, node: &Node) -> Result<(), std::convert::Infallible> {
        self.events.push(Event {
            phase,
            type_key: node.type_key(),
            id: node.id.clone(),
        });
        Ok(())
    }
}

impl Visitor for EventRecorder {
    type Error = std::convert::Infallible;

    fn enter_root(&mut self, node: &Node, _realm: &RootNode) -> Result<(), Self::Error> {
        self.record(Phase::Enter, node)
    }

    fn exit_root(&mut self, node: &Node, _realm: &RootNode) -> Result<(), Self::Error> {
        self.record(Phase::Exit, node)
    }

    fn enter_topic(&mut self, node: &Node, _topic: &TopicNode) -> Result<(), Self::Error> {
        self.record(Phase::Enter, node)
    }

    fn exit_topic(&mut self, node: &Node, _topic: &TopicNode) -> Result<(), Self::Error> {
        self.record(Phase::Exit, node)
    }

    fn enter_property_set(&mut self, node: &Node, _set: &PropertySetNode) -> Result<(), Self::Error> {
        self.record(Phase::Enter, node)
    }

    fn exit_property_set(&mut self, node: &Node, _set: &PropertySetNode) -> Result<(), Self::Error> {
        self.record(Phase::Exit, node)
    }

    fn enter_property(&mut self, node: &Node, _property: &PropertyNode) -> Result<(), Self::Error> {
        self.record(Phase::Enter, node)
    }

    fn exit_property(&mut self, node: &Node, _property: &PropertyNode) -> Result<(), Self::Error> {
        self.record(Phase::Exit, node)
    }

    fn enter_enum(&mut self, node: &Node, _enumeration: &EnumNode) -> Result<(), Self::Error> {
        self.record(Phase::Enter, node)
    }

    fn exit_enum(&mut self, node: &Node, _enumeration: &EnumNode) -> Result<(), Self::Error> {
        self.record(Phase::Exit, node)
    }

    fn enter_enum_choice(&mut self, node: &Node, _choice: &EnumChoiceNode) -> Result<(), Self::Error> {
        self.record(Phase::Enter, node)
    }

    fn exit_enum_choice(&mut self, node: &Node, _choice: &EnumChoiceNode) -> Result<(), Self::Error> {
        self.record(Phase::Exit, node)
    }
}
