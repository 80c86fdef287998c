use crate::style::ComputedStyle;
use folio_style::{Margins, PositionMode};
use folio_types::geometry::Rect;
use std::sync::Arc;

/// The geometry computed for one node on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub page_index: usize,
    /// Border box plus margins.
    pub bounds: Rect,
    pub border_rect: Rect,
    /// Border box minus padding.
    pub content_rect: Rect,
    pub margins: Margins,
    pub padding: Margins,
    pub position: PositionMode,
    pub style: Arc<ComputedStyle>,
    pub display: bool,
    /// Line index inside the container, for inline flow items.
    pub line: Option<usize>,
}

impl Arrangement {
    /// Derives the outer and content rectangles from a border box.
    pub fn from_border_rect(
        page_index: usize,
        border_rect: Rect,
        style: Arc<ComputedStyle>,
        position: PositionMode,
    ) -> Self {
        let margins = style.margin;
        let padding = style.padding;
        Self {
            page_index,
            bounds: border_rect.inflate(margins.top, margins.right, margins.bottom, margins.left),
            border_rect,
            content_rect: border_rect.deflate(padding.top, padding.right, padding.bottom, padding.left),
            margins,
            padding,
            position,
            style,
            display: true,
            line: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.display = false;
        self
    }

    pub fn on_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Moves every rectangle by the given offset.
    pub fn shift(&mut self, dx: f32, dy: f32) {
        self.bounds = self.bounds.translate(dx, dy);
        self.border_rect = self.border_rect.translate(dx, dy);
        self.content_rect = self.content_rect.translate(dx, dy);
    }
}
