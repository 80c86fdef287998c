pub mod fixtures;

use folio::{Arrangement, DocumentLayout, DocumentLayouter, DocumentTree, FolioError, NodeId, Rect};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A laid-out document with lookups by node name.
pub struct LaidOut {
    pub tree: DocumentTree,
    pub layout: DocumentLayout,
}

impl LaidOut {
    pub fn id(&self, name: &str) -> NodeId {
        self.tree
            .find_by_name(name)
            .unwrap_or_else(|| panic!("no node named '{}'", name))
    }

    pub fn arrangements(&self, name: &str) -> &[Arrangement] {
        self.tree.arrangements(self.id(name))
    }

    /// The border rect of the named node on `page`.
    pub fn border_on(&self, name: &str, page: usize) -> Rect {
        self.tree
            .node(self.id(name))
            .arrangement_on(page)
            .unwrap_or_else(|| panic!("'{}' has no arrangement on page {}", name, page))
            .border_rect
    }

    /// Page indices the named node was placed on, in placement order.
    pub fn pages_of(&self, name: &str) -> Vec<usize> {
        self.arrangements(name).iter().map(|a| a.page_index).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.layout.pages.iter().map(|p| p.label.as_str()).collect()
    }
}

/// Lays out a JSON document source with the default layouter.
pub fn layout_json(document: &Value) -> Result<LaidOut, FolioError> {
    layout_json_with(&DocumentLayouter::default(), document)
}

pub fn layout_json_with(layouter: &DocumentLayouter, document: &Value) -> Result<LaidOut, FolioError> {
    let json = serde_json::to_string(document)?;
    let (tree, layout) = layouter.layout_json(&json)?;
    Ok(LaidOut { tree, layout })
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {}, got {}",
        expected,
        actual
    );
}

pub fn assert_rect(actual: Rect, x: f32, y: f32, width: f32, height: f32) {
    assert!(
        (actual.x - x).abs() < 0.01
            && (actual.y - y).abs() < 0.01
            && (actual.width - width).abs() < 0.01
            && (actual.height - height).abs() < 0.01,
        "expected ({}, {}, {}x{}), got {:?}",
        x,
        y,
        width,
        height,
        actual
    );
}
