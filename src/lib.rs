pub mod error;
pub mod layouter;
pub mod source;
pub mod stylesheet;

pub use error::FolioError;
pub use layouter::DocumentLayouter;
pub use source::{DocumentSource, NodeAttributes, SourceNode, StyleSource};
pub use stylesheet::Stylesheet;

pub use folio_layout::{
    Arrangement, DocumentLayout, DocumentTree, LayoutConfig, LayoutError, LayoutNode, MeasuredContent,
    Measurer, NodeId, NodeKind, PageInfo, PageRegion, PageTemplates, TemplateRef,
};
pub use folio_style::{ElementStyle, PageSize};
pub use folio_types::{Point, Rect, Size};
