use folio_style::StyleParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Node {node} ({kind}) cannot be laid out here: {reason}")]
    UnsupportedNode {
        node: NodeId,
        kind: &'static str,
        reason: &'static str,
    },
    #[error("Document child {0} is not a page or section.")]
    NotAPage(NodeId),
    #[error("Grid slot (column {column}, row {row}) is already occupied.")]
    CellOccupied { column: usize, row: usize },
    #[error("Explicit {axis} sizes are locked; cannot set index {index}.")]
    ExplicitLocked { axis: &'static str, index: usize },
    #[error("Table grid must be closed before it can be sized.")]
    GridNotClosed,
    #[error("Page negotiation error: {0}")]
    Negotiation(String),
    #[error("Template error: {0}")]
    Template(String),
    #[error("Layout failed in table {table}: {source}")]
    Table {
        table: NodeId,
        #[source]
        source: Box<LayoutError>,
    },
    #[error(transparent)]
    Style(#[from] StyleParseError),
    #[error("Generic layout error: {0}")]
    Generic(String),
}

pub mod algorithms;
pub mod arrangement;
pub mod config;
pub mod engines;
pub mod interface;
pub mod measure;
pub mod node_kind;
pub mod pages;
pub mod style;
pub mod table;
pub mod template;
pub mod tree;

pub use self::arrangement::Arrangement;
pub use self::config::LayoutConfig;
pub use self::engines::{
    AlignmentPass, DocumentDriver, DocumentLayout, FlowEngine, PageEngine, SectionEngine,
};
pub use self::interface::{
    Engine, EngineLink, LayoutArea, LayoutContext, LayoutOutcome, LayoutStatus, Negotiation,
    NegotiationState, PageGrant, PageNegotiator, PageRequest, PageSegment, RejectPages,
};
pub use self::measure::{FixedMetrics, MeasuredContent, Measurer, PathBlock, TextBlock, TextLine};
pub use self::node_kind::{
    CellSpan, EngineKind, ImageContent, NodeKind, PageTemplates, PathContent, TextContent,
};
pub use self::pages::{PageInfo, PageRegion, PageRegistry};
pub use self::style::{CascadeResolver, ComputedStyle, PositionOptions, StyleResolver};
pub use self::table::{TableEngine, TableGrid};
pub use self::template::{Template, TemplateRef};
pub use self::tree::{DocumentTree, LayoutNode};

// Re-export geometry types used throughout the engines
pub use folio_types::geometry::{Point, Rect, Size};
pub use folio_types::NodeId;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod page_test;
