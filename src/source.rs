//! JSON description of a document, turned into a layout tree.
//!
//! ```json
//! {
//!   "stylesheet": { "styles": { "title": { "fontSize": 18 } } },
//!   "pages": [
//!     { "type": "Page", "style": "margin: 36pt",
//!       "header": { "type": "Panel", "children": [{ "type": "Text", "content": "Report" }] },
//!       "children": [{ "type": "Text", "class": "title", "content": "Hello" }] }
//!   ]
//! }
//! ```

use crate::error::FolioError;
use crate::stylesheet::Stylesheet;
use folio_layout::template::StaticTemplate;
use folio_layout::{
    CellSpan, DocumentTree, ImageContent, NodeId, NodeKind, PageTemplates, PathContent, Point,
    TemplateRef,
};
use folio_style::ElementStyle;
use folio_style::parsers::parse_declarations;
use serde::Deserialize;

/// A node's declared style: either a declaration list or a property map.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StyleSource {
    Declarations(String),
    Properties(ElementStyle),
}

impl Default for StyleSource {
    fn default() -> Self {
        StyleSource::Properties(ElementStyle::default())
    }
}

impl StyleSource {
    pub fn to_element_style(&self) -> Result<ElementStyle, FolioError> {
        match self {
            StyleSource::Declarations(s) => Ok(parse_declarations(s)?),
            StyleSource::Properties(style) => Ok(style.clone()),
        }
    }
}

/// Properties shared by every node type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub style: StyleSource,
    #[serde(default)]
    pub hidden: bool,
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum SourceNode {
    #[serde(rename_all = "camelCase")]
    Page {
        #[serde(flatten)]
        attributes: NodeAttributes,
        #[serde(default)]
        header: Option<Box<SourceNode>>,
        #[serde(default)]
        footer: Option<Box<SourceNode>>,
        #[serde(default)]
        children: Vec<SourceNode>,
    },
    #[serde(rename_all = "camelCase")]
    Section {
        #[serde(flatten)]
        attributes: NodeAttributes,
        #[serde(default)]
        header: Option<Box<SourceNode>>,
        #[serde(default)]
        footer: Option<Box<SourceNode>>,
        #[serde(default)]
        continuation_header: Option<Box<SourceNode>>,
        #[serde(default)]
        continuation_footer: Option<Box<SourceNode>>,
        #[serde(default)]
        children: Vec<SourceNode>,
    },
    Panel {
        #[serde(flatten)]
        attributes: NodeAttributes,
        #[serde(default)]
        children: Vec<SourceNode>,
    },
    Table {
        #[serde(flatten)]
        attributes: NodeAttributes,
        #[serde(default)]
        rows: Vec<SourceNode>,
    },
    Row {
        #[serde(flatten)]
        attributes: NodeAttributes,
        #[serde(default)]
        cells: Vec<SourceNode>,
    },
    #[serde(rename_all = "camelCase")]
    Cell {
        #[serde(flatten)]
        attributes: NodeAttributes,
        #[serde(default = "one")]
        column_span: usize,
        #[serde(default = "one")]
        row_span: usize,
        #[serde(default)]
        children: Vec<SourceNode>,
    },
    Text {
        #[serde(flatten)]
        attributes: NodeAttributes,
        content: String,
    },
    Path {
        #[serde(flatten)]
        attributes: NodeAttributes,
        points: Vec<[f32; 2]>,
        #[serde(default)]
        closed: bool,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        #[serde(flatten)]
        attributes: NodeAttributes,
        pixel_width: u32,
        pixel_height: u32,
        #[serde(default)]
        dpi: Option<f32>,
    },
    Invisible {
        #[serde(flatten)]
        attributes: NodeAttributes,
        #[serde(default)]
        children: Vec<SourceNode>,
    },
    PageBreak {
        #[serde(flatten)]
        attributes: NodeAttributes,
    },
}

/// A whole document: its stylesheet, its own style and its pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentSource {
    #[serde(default)]
    pub stylesheet: Stylesheet,
    #[serde(default)]
    pub style: StyleSource,
    #[serde(default)]
    pub pages: Vec<SourceNode>,
}

impl DocumentSource {
    pub fn from_json(json: &str) -> Result<Self, FolioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the layout tree. Header and footer fragments become templates
    /// that hand out a fresh copy of the fragment for every page.
    pub fn build_tree(&self) -> Result<DocumentTree, FolioError> {
        let mut tree = DocumentTree::new();
        let root = tree.add_root(NodeKind::Document, self.style.to_element_style()?);
        for page in &self.pages {
            if !matches!(page, SourceNode::Page { .. } | SourceNode::Section { .. }) {
                return Err(FolioError::Source(format!(
                    "document children must be pages or sections, found {}",
                    page.type_name()
                )));
            }
            page.append_to(&mut tree, root)?;
        }
        log::debug!("Built document tree with {} nodes.", tree.len());
        Ok(tree)
    }
}

impl SourceNode {
    pub fn type_name(&self) -> &'static str {
        match self {
            SourceNode::Page { .. } => "Page",
            SourceNode::Section { .. } => "Section",
            SourceNode::Panel { .. } => "Panel",
            SourceNode::Table { .. } => "Table",
            SourceNode::Row { .. } => "Row",
            SourceNode::Cell { .. } => "Cell",
            SourceNode::Text { .. } => "Text",
            SourceNode::Path { .. } => "Path",
            SourceNode::Image { .. } => "Image",
            SourceNode::Invisible { .. } => "Invisible",
            SourceNode::PageBreak { .. } => "PageBreak",
        }
    }

    fn attributes(&self) -> &NodeAttributes {
        match self {
            SourceNode::Page { attributes, .. }
            | SourceNode::Section { attributes, .. }
            | SourceNode::Panel { attributes, .. }
            | SourceNode::Table { attributes, .. }
            | SourceNode::Row { attributes, .. }
            | SourceNode::Cell { attributes, .. }
            | SourceNode::Text { attributes, .. }
            | SourceNode::Path { attributes, .. }
            | SourceNode::Image { attributes, .. }
            | SourceNode::Invisible { attributes, .. }
            | SourceNode::PageBreak { attributes } => attributes,
        }
    }

    fn children(&self) -> &[SourceNode] {
        match self {
            SourceNode::Page { children, .. }
            | SourceNode::Section { children, .. }
            | SourceNode::Panel { children, .. }
            | SourceNode::Cell { children, .. }
            | SourceNode::Invisible { children, .. } => children,
            SourceNode::Table { rows, .. } => rows,
            SourceNode::Row { cells, .. } => cells,
            SourceNode::Text { .. }
            | SourceNode::Path { .. }
            | SourceNode::Image { .. }
            | SourceNode::PageBreak { .. } => &[],
        }
    }

    fn kind(&self) -> Result<NodeKind, FolioError> {
        Ok(match self {
            SourceNode::Page { header, footer, .. } => NodeKind::Page(PageTemplates {
                header: fragment(header)?,
                footer: fragment(footer)?,
            }),
            SourceNode::Section {
                header,
                footer,
                continuation_header,
                continuation_footer,
                ..
            } => NodeKind::Section {
                templates: PageTemplates {
                    header: fragment(header)?,
                    footer: fragment(footer)?,
                },
                continuation: PageTemplates {
                    header: fragment(continuation_header)?,
                    footer: fragment(continuation_footer)?,
                },
            },
            SourceNode::Panel { .. } => NodeKind::Panel,
            SourceNode::Table { .. } => NodeKind::Table,
            SourceNode::Row { .. } => NodeKind::TableRow,
            SourceNode::Cell {
                column_span, row_span, ..
            } => NodeKind::TableCell(CellSpan::new(*column_span, *row_span)),
            SourceNode::Text { content, .. } => NodeKind::text(content.clone()),
            SourceNode::Path { points, closed, .. } => NodeKind::Path(PathContent {
                points: points.iter().map(|[x, y]| Point::new(*x, *y)).collect(),
                closed: *closed,
            }),
            SourceNode::Image {
                pixel_width,
                pixel_height,
                dpi,
                ..
            } => NodeKind::Image(ImageContent {
                pixel_width: *pixel_width,
                pixel_height: *pixel_height,
                dpi: *dpi,
            }),
            SourceNode::Invisible { .. } => NodeKind::Invisible,
            SourceNode::PageBreak { .. } => NodeKind::PageBreak,
        })
    }

    /// Appends this node and its subtree under `parent`.
    pub fn append_to(&self, tree: &mut DocumentTree, parent: NodeId) -> Result<NodeId, FolioError> {
        let id = tree.append(parent, self.kind()?, self.attributes().style.to_element_style()?);
        self.decorate(tree, id);
        for child in self.children() {
            child.append_to(tree, id)?;
        }
        Ok(id)
    }

    /// Builds this node as the root of a standalone tree.
    pub fn to_tree(&self) -> Result<DocumentTree, FolioError> {
        let mut tree = DocumentTree::new();
        let id = tree.add_root(self.kind()?, self.attributes().style.to_element_style()?);
        self.decorate(&mut tree, id);
        for child in self.children() {
            child.append_to(&mut tree, id)?;
        }
        Ok(tree)
    }

    fn decorate(&self, tree: &mut DocumentTree, id: NodeId) {
        let attributes = self.attributes();
        let node = tree.node_mut(id);
        node.name = attributes.name.clone();
        node.class = attributes.class.clone();
        node.visible = !attributes.hidden;
    }
}

fn fragment(source: &Option<Box<SourceNode>>) -> Result<Option<TemplateRef>, FolioError> {
    source
        .as_deref()
        .map(|node| Ok(TemplateRef::new(StaticTemplate(node.to_tree()?))))
        .transpose()
}
