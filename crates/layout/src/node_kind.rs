use crate::template::TemplateRef;
use folio_types::geometry::{Point, Size};

/// Represents the specific type of a layout node.
///
/// Every node carries at most one layout capability, derived from its kind by
/// [`NodeKind::capability`]. Dispatch in the flow engine matches on that
/// capability exhaustively.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Root of a document; its children must be pages or sections.
    Document,
    Page(PageTemplates),
    /// A page whose later pages may use a different header/footer pair.
    Section {
        templates: PageTemplates,
        continuation: PageTemplates,
    },
    Panel,
    Table,
    TableRow,
    TableCell(CellSpan),
    Text(TextContent),
    Path(PathContent),
    Image(ImageContent),
    /// Lays its children out into the parent's flow without a box of its own.
    Invisible,
    PageBreak,
    /// A node without any layout capability. Placing one in a flow is an error.
    Plain,
}

/// The engine family a nested-layout node spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Flow,
    Table,
    Page,
    Section,
}

/// The single layout capability a node exposes to a flow container.
#[derive(Debug, Clone, Copy)]
pub enum Capability<'a> {
    NestedLayout(EngineKind),
    Text(&'a TextContent),
    VectorPath(&'a PathContent),
    Image(&'a ImageContent),
    InvisibleContainer,
    PageBreak,
    None,
}

impl NodeKind {
    pub fn capability(&self) -> Capability<'_> {
        match self {
            NodeKind::Panel | NodeKind::TableCell(_) => Capability::NestedLayout(EngineKind::Flow),
            NodeKind::Table => Capability::NestedLayout(EngineKind::Table),
            NodeKind::Page(_) => Capability::NestedLayout(EngineKind::Page),
            NodeKind::Section { .. } => Capability::NestedLayout(EngineKind::Section),
            NodeKind::Text(text) => Capability::Text(text),
            NodeKind::Path(path) => Capability::VectorPath(path),
            NodeKind::Image(image) => Capability::Image(image),
            NodeKind::Invisible => Capability::InvisibleContainer,
            NodeKind::PageBreak => Capability::PageBreak,
            NodeKind::Document | NodeKind::TableRow | NodeKind::Plain => Capability::None,
        }
    }

    /// Returns a string representation, primarily for debugging or error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Page(_) => "Page",
            NodeKind::Section { .. } => "Section",
            NodeKind::Panel => "Panel",
            NodeKind::Table => "Table",
            NodeKind::TableRow => "TableRow",
            NodeKind::TableCell(_) => "TableCell",
            NodeKind::Text(_) => "Text",
            NodeKind::Path(_) => "Path",
            NodeKind::Image(_) => "Image",
            NodeKind::Invisible => "Invisible",
            NodeKind::PageBreak => "PageBreak",
            NodeKind::Plain => "Plain",
        }
    }

    pub fn is_page_like(&self) -> bool {
        matches!(self, NodeKind::Page(_) | NodeKind::Section { .. })
    }

    pub fn text(text: impl Into<String>) -> Self {
        NodeKind::Text(TextContent { text: text.into() })
    }

    pub fn cell(column_span: usize, row_span: usize) -> Self {
        NodeKind::TableCell(CellSpan::new(column_span, row_span))
    }
}

/// Header and footer templates declared on a page or section.
#[derive(Debug, Clone, Default)]
pub struct PageTemplates {
    pub header: Option<TemplateRef>,
    pub footer: Option<TemplateRef>,
}

impl PageTemplates {
    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.footer.is_none()
    }

    /// Uses our own templates where declared and `fallback` for the rest.
    pub fn or(&self, fallback: &PageTemplates) -> PageTemplates {
        PageTemplates {
            header: self.header.clone().or_else(|| fallback.header.clone()),
            footer: self.footer.clone().or_else(|| fallback.footer.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSpan {
    pub columns: usize,
    pub rows: usize,
}

impl CellSpan {
    /// Spans below one are treated as one.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }
}

impl Default for CellSpan {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathContent {
    pub points: Vec<Point>,
    pub closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageContent {
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Resolution embedded in the image, if any. Falls back to the configured DPI.
    pub dpi: Option<f32>,
}

impl ImageContent {
    /// Natural size in points.
    pub fn intrinsic_size(&self, default_dpi: f32) -> Size {
        let dpi = self.dpi.filter(|d| *d > 0.0).unwrap_or(default_dpi);
        let scale = 72.0 / dpi;
        Size::new(self.pixel_width as f32 * scale, self.pixel_height as f32 * scale)
    }

    /// Height over width; zero for degenerate images.
    pub fn aspect_ratio(&self) -> f32 {
        if self.pixel_width == 0 {
            0.0
        } else {
            self.pixel_height as f32 / self.pixel_width as f32
        }
    }
}
