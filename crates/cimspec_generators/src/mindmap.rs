//! FreeMind mindmap encoding of a specialization tree.
//!
//! Nodes are streamed: an enter event opens a `node` element together with its
//! font and notes, and the matching exit closes it. Enumerations have no node
//! of their own; their choices hang directly under the owning detail. Injected
//! details are left out.

use std::fmt::Display;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::trace;

use cimspec_core::{
    EnumChoiceNode, Node, PropertyNode, PropertySetNode, RootNode, TopicNode, Visitor,
};
use cimspec_defs::ChangeRecord;

use crate::error::{GeneratorError, GeneratorResult};
use crate::style::{MindmapStyles, NodeStyle, LEGEND_SECTIONS};
use crate::{Generator, GeneratorKind};

const MAP_VERSION: &str = "1.0.1";

fn xml_error(e: impl Display) -> GeneratorError {
    GeneratorError::Xml(e.to_string())
}

/// Note value, with a placeholder for missing text.
fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

pub struct MindmapGenerator {
    writer: Writer<Vec<u8>>,
    styles: MindmapStyles,
    /// Id of the injected detail currently being skipped.
    skipping: Option<String>,
    finished: bool,
}

impl MindmapGenerator {
    pub fn new(styles: MindmapStyles) -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
            styles,
            skipping: None,
            finished: false,
        }
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> GeneratorResult<()> {
        let mut element = BytesStart::new(name);
        for attribute in attributes {
            element.push_attribute(*attribute);
        }
        self.writer.write_event(Event::Start(element)).map_err(xml_error)
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> GeneratorResult<()> {
        let mut element = BytesStart::new(name);
        for attribute in attributes {
            element.push_attribute(*attribute);
        }
        self.writer.write_event(Event::Empty(element)).map_err(xml_error)
    }

    fn end(&mut self, name: &str) -> GeneratorResult<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml_error)
    }

    fn text(&mut self, text: &str) -> GeneratorResult<()> {
        self.writer.write_event(Event::Text(BytesText::new(text))).map_err(xml_error)
    }

    /// Open a styled node and write its font and notes.
    fn open_node(&mut self, type_key: &str, text: &str, style: &str, notes: &[(&str, &str)]) -> GeneratorResult<()> {
        let NodeStyle {
            is_collapsed,
            font_color,
            bg_color,
            font_name,
            font_size,
            font_bold,
            ..
        } = self.styles.get(type_key);

        self.start(
            "node",
            &[
                ("TEXT", text),
                ("FOLDED", if is_collapsed { "true" } else { "false" }),
                ("COLOR", font_color.as_str()),
                ("BACKGROUND_COLOR", bg_color.as_str()),
                ("STYLE", style),
            ],
        )?;
        let size = font_size.to_string();
        self.empty(
            "font",
            &[
                ("NAME", font_name.as_str()),
                ("SIZE", size.as_str()),
                ("BOLD", if font_bold { "true" } else { "false" }),
            ],
        )?;
        self.notes(notes)
    }

    /// A `richcontent` note holding an html definition list.
    fn notes(&mut self, notes: &[(&str, &str)]) -> GeneratorResult<()> {
        self.start("richcontent", &[("TYPE", "NOTE")])?;
        self.start("html", &[])?;
        self.empty("head", &[])?;
        self.start("body", &[])?;
        self.start("dl", &[])?;
        for (term, definition) in notes {
            self.start("dt", &[])?;
            self.start("b", &[])?;
            self.text(term)?;
            self.end("b")?;
            self.end("dt")?;
            self.start("dd", &[])?;
            self.text(definition)?;
            self.end("dd")?;
        }
        self.end("dl")?;
        self.end("body")?;
        self.end("html")?;
        self.end("richcontent")
    }

    fn change_history(&mut self, history: &[ChangeRecord]) -> GeneratorResult<()> {
        self.start(
            "node",
            &[
                ("TEXT", "CHANGE HISTORY"),
                ("FOLDED", "true"),
                ("STYLE", "bubble"),
                ("POSITION", "left"),
            ],
        )?;
        for record in history {
            self.start("node", &[("TEXT", record.version.as_str()), ("STYLE", "bubble")])?;
            self.notes(&[
                ("Version", record.version.as_str()),
                ("Date", record.date.as_str()),
                ("Person", record.author.as_str()),
                ("Comment", record.comment.as_str()),
            ])?;
            self.end("node")?;
        }
        self.end("node")
    }

    fn legend(&mut self) -> GeneratorResult<()> {
        self.start(
            "node",
            &[
                ("TEXT", "LEGEND"),
                ("FOLDED", "true"),
                ("STYLE", "bubble"),
                ("POSITION", "left"),
            ],
        )?;
        for section in LEGEND_SECTIONS {
            let style = self.styles.get(section);
            self.start(
                "node",
                &[
                    ("TEXT", section),
                    ("COLOR", style.font_color.as_str()),
                    ("BACKGROUND_COLOR", style.bg_color.as_str()),
                    ("STYLE", "bubble"),
                ],
            )?;
            self.notes(&[("Description", or_na(&style.description))])?;
            self.end("node")?;
        }
        self.end("node")
    }
}

impl Default for MindmapGenerator {
    fn default() -> Self {
        Self::new(MindmapStyles::default())
    }
}

impl std::fmt::Debug for MindmapGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MindmapGenerator")
            .field("bytes", &self.writer.get_ref().len())
            .field("finished", &self.finished)
            .finish()
    }
}

impl Visitor for MindmapGenerator {
    type Error = GeneratorError;

    fn enter_root(&mut self, node: &Node, realm: &RootNode) -> GeneratorResult<()> {
        self.start("map", &[("version", MAP_VERSION)])?;
        self.open_node(
            node.type_key(),
            &node.name,
            "fork",
            &[
                ("Description", or_na(&node.description)),
                ("Spec. ID", node.id.as_str()),
                ("Contact", realm.contact.as_str()),
                ("Authors", realm.authors.as_str()),
                ("Contributors", realm.contributors.as_str()),
            ],
        )?;
        self.change_history(&realm.change_history)?;
        self.legend()
    }

    fn exit_root(&mut self, _node: &Node, _realm: &RootNode) -> GeneratorResult<()> {
        self.end("node")?;
        self.end("map")?;
        self.finished = true;
        Ok(())
    }

    fn enter_topic(&mut self, node: &Node, _topic: &TopicNode) -> GeneratorResult<()> {
        self.open_node(
            node.type_key(),
            &node.name,
            "bubble",
            &[("Description", or_na(&node.description)), ("Spec. ID", node.id.as_str())],
        )
    }

    fn exit_topic(&mut self, _node: &Node, _topic: &TopicNode) -> GeneratorResult<()> {
        self.end("node")
    }

    fn enter_property_set(&mut self, node: &Node, _set: &PropertySetNode) -> GeneratorResult<()> {
        self.open_node(
            node.type_key(),
            &node.name,
            "bubble",
            &[("Description", or_na(&node.description)), ("Spec. ID", node.id.as_str())],
        )
    }

    fn exit_property_set(&mut self, _node: &Node, _set: &PropertySetNode) -> GeneratorResult<()> {
        self.end("node")
    }

    fn enter_property(&mut self, node: &Node, property: &PropertyNode) -> GeneratorResult<()> {
        if property.was_injected {
            trace!("Omitting injected detail {}", node.id);
            self.skipping = Some(node.id.clone());
            return Ok(());
        }
        let type_of = property.type_of.as_raw();
        self.open_node(
            node.type_key(),
            &node.name,
            "bubble",
            &[
                ("Description", or_na(&node.description)),
                ("Spec. ID", node.id.as_str()),
                ("Type", type_of.as_str()),
                ("Cardinality", property.cardinality.as_str()),
            ],
        )
    }

    fn exit_property(&mut self, node: &Node, _property: &PropertyNode) -> GeneratorResult<()> {
        if self.skipping.as_deref() == Some(node.id.as_str()) {
            self.skipping = None;
            return Ok(());
        }
        self.end("node")
    }

    fn enter_enum_choice(&mut self, node: &Node, choice: &EnumChoiceNode) -> GeneratorResult<()> {
        if self.skipping.is_some() {
            return Ok(());
        }
        self.open_node(
            node.type_key(),
            &choice.value,
            "bubble",
            &[("Description", or_na(&node.description)), ("Spec. ID", node.id.as_str())],
        )
    }

    fn exit_enum_choice(&mut self, _node: &Node, _choice: &EnumChoiceNode) -> GeneratorResult<()> {
        if self.skipping.is_some() {
            return Ok(());
        }
        self.end("node")
    }
}

impl Generator for MindmapGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Mindmap
    }

    fn output(&self) -> GeneratorResult<String> {
        if !self.finished {
            return Err(GeneratorError::Incomplete);
        }
        String::from_utf8(self.writer.get_ref().clone()).map_err(xml_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_tree;
    use cimspec_core::TraversalEngine;

    fn encode() -> String {
        let tree = sample_tree();
        let mut generator = MindmapGenerator::default();
        TraversalEngine::new(&tree).run(&mut generator).unwrap();
        generator.output().unwrap()
    }

    #[test]
    fn test_document_shape() {
        let xml = encode();
        assert!(xml.starts_with("<map version=\"1.0.1\">"));
        assert!(xml.trim_end().ends_with("</map>"));
        assert!(xml.contains("TEXT=\"ocean\""));
        assert!(xml.contains("STYLE=\"fork\""));
        assert!(xml.contains("TEXT=\"CHANGE HISTORY\""));
        assert!(xml.contains("TEXT=\"LEGEND\""));
        assert!(xml.contains("<b>Spec. ID</b>"));
        assert!(xml.contains("<dd>cmip6.ocean.advection.scheme</dd>"));
        assert_eq!(xml.matches("<map").count(), 1);
    }

    #[test]
    fn test_injected_details_are_omitted() {
        let xml = encode();
        assert!(!xml.contains("cmip6.ocean.advection.name<"));
        assert!(!xml.contains("cmip6.ocean.advection.overview<"));
        assert!(xml.contains("<dd>cmip6.ocean.advection.scheme.schemes.upwind</dd>"));
        assert!(xml.contains("TEXT=\"Other\""));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = encode();
        assert!(xml.contains("Advection &amp; transport"));
    }

    #[test]
    fn test_custom_styles() {
        let tree = sample_tree();
        let mut styles = MindmapStyles::default();
        styles.set(
            "process",
            NodeStyle {
                bg_color: "#123456".to_string(),
                ..NodeStyle::default()
            },
        );
        let mut generator = MindmapGenerator::new(styles);
        TraversalEngine::new(&tree).run(&mut generator).unwrap();
        assert!(generator.output().unwrap().contains("BACKGROUND_COLOR=\"#123456\""));
    }

    #[test]
    fn test_unfinished_output() {
        assert!(matches!(
            MindmapGenerator::default().output(),
            Err(GeneratorError::Incomplete)
        ));
    }
}
