//! Mindmap presentation per node type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Presentation of one node type in the mindmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeStyle {
    pub is_collapsed: bool,
    pub font_color: String,
    pub bg_color: String,
    pub font_name: String,
    pub font_size: u32,
    pub font_bold: bool,
    /// Shown in the legend.
    pub description: String,
}

impl NodeStyle {
    fn new(is_collapsed: bool, font_color: &str, bg_color: &str, font_size: u32, font_bold: bool, description: &str) -> Self {
        Self {
            is_collapsed,
            font_color: font_color.to_string(),
            bg_color: bg_color.to_string(),
            font_name: "SansSerif".to_string(),
            font_size,
            font_bold,
            description: description.to_string(),
        }
    }

    /// Apply the fields set in `overrides`.
    pub fn merge(&mut self, overrides: &StyleOverride) {
        if let Some(v) = overrides.is_collapsed {
            self.is_collapsed = v;
        }
        if let Some(v) = &overrides.font_color {
            self.font_color = v.clone();
        }
        if let Some(v) = &overrides.bg_color {
            self.bg_color = v.clone();
        }
        if let Some(v) = &overrides.font_name {
            self.font_name = v.clone();
        }
        if let Some(v) = overrides.font_size {
            self.font_size = v;
        }
        if let Some(v) = overrides.font_bold {
            self.font_bold = v;
        }
        if let Some(v) = &overrides.description {
            self.description = v.clone();
        }
    }
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self::new(true, "#000000", "#FFFFFF", 12, false, "")
    }
}

/// Partial [`NodeStyle`], as read from configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StyleOverride {
    pub is_collapsed: Option<bool>,
    pub font_color: Option<String>,
    pub bg_color: Option<String>,
    pub font_name: Option<String>,
    pub font_size: Option<u32>,
    pub font_bold: Option<bool>,
    pub description: Option<String>,
}

/// Node styles keyed by type key (`realm`, `process`, `detail`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindmapStyles {
    styles: BTreeMap<String, NodeStyle>,
}

/// Type keys shown in the legend, in legend order.
pub const LEGEND_SECTIONS: [&str; 8] = [
    "realm",
    "grid",
    "key-properties",
    "process",
    "sub-process",
    "detail-set",
    "detail",
    "enum-choice",
];

impl MindmapStyles {
    /// Style for a type key, falling back to [`NodeStyle::default`].
    pub fn get(&self, type_key: &str) -> NodeStyle {
        self.styles.get(type_key).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, type_key: impl Into<String>, style: NodeStyle) {
        self.styles.insert(type_key.into(), style);
    }

    /// Merge configured overrides into the current styles.
    pub fn apply<'a>(&mut self, overrides: impl IntoIterator<Item = (&'a String, &'a StyleOverride)>) {
        for (type_key, style_override) in overrides {
            self.styles
                .entry(type_key.clone())
                .or_default()
                .merge(style_override);
        }
    }
}

impl Default for MindmapStyles {
    fn default() -> Self {
        let styles = [
            ("realm", NodeStyle::new(false, "#FFFFFF", "#1F4E79", 16, true, "A scientific realm")),
            ("grid", NodeStyle::new(true, "#000000", "#D6E4F0", 14, true, "Realm grid")),
            ("key-properties", NodeStyle::new(true, "#000000", "#DAEED3", 14, true, "Realm key properties")),
            ("process", NodeStyle::new(true, "#000000", "#FCE4D6", 14, true, "A scientific process")),
            ("sub-process", NodeStyle::new(true, "#000000", "#FFF2CC", 12, true, "A sub-process of a process")),
            ("detail-set", NodeStyle::new(true, "#000000", "#EDEDED", 12, false, "A set of related details")),
            ("detail", NodeStyle::new(true, "#000000", "#FFFFFF", 12, false, "A detail to be documented")),
            ("enum-choice", NodeStyle::new(false, "#404040", "#F2F2F2", 10, false, "An enumeration choice")),
        ]
        .into_iter()
        .map(|(key, style)| (key.to_string(), style))
        .collect();

        Self { styles }
    }
}
