use crate::error::FolioError;
use folio_layout::{ComputedStyle, LayoutNode, StyleResolver};
use folio_style::ElementStyle;
use folio_style::parsers::parse_declarations;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named styles that nodes reference through their `class`.
///
/// Resolution order for one node: inherited properties from the parent,
/// then each class in the order listed, then the node's own declarations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stylesheet {
    #[serde(default)]
    pub styles: HashMap<String, ElementStyle>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, FolioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds (or replaces) a class from a declaration list like `"margin: 4pt"`.
    pub fn with_class(mut self, name: impl Into<String>, declarations: &str) -> Result<Self, FolioError> {
        self.styles.insert(name.into(), parse_declarations(declarations)?);
        Ok(self)
    }

    pub fn get(&self, class: &str) -> Option<&ElementStyle> {
        self.styles.get(class)
    }

    /// Merges the styles of every class in a space-separated class list.
    pub fn class_style(&self, classes: &str) -> ElementStyle {
        let mut merged = ElementStyle::default();
        for class in classes.split_whitespace() {
            match self.styles.get(class) {
                Some(style) => merged.merge(style),
                None => log::warn!("Unknown style class '{}'.", class),
            }
        }
        merged
    }
}

impl StyleResolver for Stylesheet {
    fn resolve_full_style(&self, node: &LayoutNode, parent: &ComputedStyle) -> ComputedStyle {
        let mut style = ComputedStyle::inherit_from(parent);
        if let Some(classes) = node.class.as_deref() {
            style.apply(&self.class_style(classes));
        }
        style.apply(&node.style);
        style
    }
}
