//! Computed (cascaded and defaulted) style, and the box-model options derived from it.

use crate::tree::LayoutNode;
use folio_style::{
    Dimension, ElementStyle, HorizontalAlign, LayoutMode, Margins, NumberStyle, Orientation,
    OverflowAction, OverflowSplit, PageSize, PositionMode, VerticalAlign,
};
use folio_types::geometry::Size;

/// Page box properties. Only meaningful on page and section nodes; paper and
/// numbering style inherit from the document, a numbering restart does not.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageStyle {
    pub size: PageSize,
    pub orientation: Orientation,
    pub number_style: NumberStyle,
    pub number_start: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub margin: Margins,
    pub padding: Margins,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub fill_width: bool,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub position: PositionMode,
    pub display: LayoutMode,
    pub overflow: OverflowAction,
    pub overflow_split: OverflowSplit,
    pub h_align: HorizontalAlign,
    pub v_align: VerticalAlign,
    pub font_size: f32,
    pub line_height: f32,
    pub page: PageStyle,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            margin: Margins::default(),
            padding: Margins::default(),
            width: None,
            height: None,
            fill_width: false,
            x: None,
            y: None,
            position: PositionMode::Flow,
            display: LayoutMode::Block,
            overflow: OverflowAction::NewPage,
            overflow_split: OverflowSplit::Any,
            h_align: HorizontalAlign::Left,
            v_align: VerticalAlign::Top,
            font_size: 12.0,
            line_height: 14.4,
            page: PageStyle::default(),
        }
    }
}

impl ComputedStyle {
    /// Starts a child style: inherited properties come from `parent`, the rest are defaults.
    pub fn inherit_from(parent: &ComputedStyle) -> Self {
        Self {
            font_size: parent.font_size,
            line_height: parent.line_height,
            h_align: parent.h_align,
            overflow: parent.overflow,
            page: PageStyle {
                number_start: None,
                ..parent.page
            },
            ..Default::default()
        }
    }

    /// Applies the declared properties of one node on top of `self`.
    pub fn apply(&mut self, declared: &ElementStyle) {
        if let Some(v) = declared.margin {
            self.margin = v;
        }
        if let Some(v) = declared.padding {
            self.padding = v;
        }
        if let Some(v) = declared.width {
            self.width = (!v.is_auto()).then_some(v);
        }
        if let Some(v) = declared.height {
            self.height = (!v.is_auto()).then_some(v);
        }
        if let Some(v) = declared.fill_width {
            self.fill_width = v;
        }
        if declared.x.is_some() {
            self.x = declared.x;
        }
        if declared.y.is_some() {
            self.y = declared.y;
        }
        if let Some(v) = declared.position {
            self.position = v;
        }
        if let Some(v) = declared.display {
            self.display = v;
        }
        if let Some(v) = declared.overflow {
            self.overflow = v;
        }
        if let Some(v) = declared.overflow_split {
            self.overflow_split = v;
        }
        if let Some(v) = declared.h_align {
            self.h_align = v;
        }
        if let Some(v) = declared.v_align {
            self.v_align = v;
        }
        if let Some(size) = declared.font_size {
            self.font_size = size;
            // An explicit font size without a line height gets the usual 1.2 leading.
            if declared.line_height.is_none() {
                self.line_height = size * 1.2;
            }
        }
        if let Some(v) = declared.line_height {
            self.line_height = v;
        }
        if let Some(v) = declared.page_size {
            self.page.size = v;
        }
        if let Some(v) = declared.page_orientation {
            self.page.orientation = v;
        }
        if let Some(v) = declared.number_style {
            self.page.number_style = v;
        }
        if declared.number_start.is_some() {
            self.page.number_start = declared.number_start;
        }
    }
}

/// Turns a node's declared style into a computed one.
pub trait StyleResolver {
    fn resolve_full_style(&self, node: &LayoutNode, parent: &ComputedStyle) -> ComputedStyle;
}

/// Inherits from the parent and applies the node's own declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CascadeResolver;

impl StyleResolver for CascadeResolver {
    fn resolve_full_style(&self, node: &LayoutNode, parent: &ComputedStyle) -> ComputedStyle {
        let mut style = ComputedStyle::inherit_from(parent);
        style.apply(&node.style);
        style
    }
}

/// Box-model options of one node, resolved against the space offered to it.
///
/// Explicit `width`/`height` describe the border box (padding included,
/// margins excluded) and override whatever the content measures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub mode: PositionMode,
    pub layout_mode: LayoutMode,
    pub fill_width: bool,
    pub margins: Margins,
    pub padding: Margins,
}

impl PositionOptions {
    pub fn resolve(style: &ComputedStyle, available: Size) -> Self {
        Self {
            x: style.x,
            y: style.y,
            width: style.width.and_then(|w| w.resolve(available.width)),
            height: style.height.and_then(|h| h.resolve(available.height)),
            mode: style.position,
            layout_mode: style.display,
            fill_width: style.fill_width,
            margins: style.margin,
            padding: style.padding,
        }
    }

    /// Space inside the padding that the node's content may use.
    pub fn content_available(&self, available: Size) -> Size {
        let width = match self.width {
            Some(w) => w - self.padding.horizontal(),
            None => available.width - self.margins.horizontal() - self.padding.horizontal(),
        };
        let height = match self.height {
            Some(h) => h - self.padding.vertical(),
            None => available.height - self.margins.vertical() - self.padding.vertical(),
        };
        Size::new(width.max(0.0), height.max(0.0))
    }

    /// Border-box width for content of the given measured width.
    pub fn border_width(&self, content_width: f32, available_width: f32) -> f32 {
        match self.width {
            Some(w) => w,
            None if self.fill_width && available_width.is_finite() => {
                (available_width - self.margins.horizontal()).max(0.0)
            }
            None => content_width + self.padding.horizontal(),
        }
    }

    pub fn border_height(&self, content_height: f32) -> f32 {
        self.height
            .unwrap_or(content_height + self.padding.vertical())
    }

    pub fn border_size(&self, content: Size, available: Size) -> Size {
        Size::new(
            self.border_width(content.width, available.width),
            self.border_height(content.height),
        )
    }

    /// Border box plus margins: the space the node claims from its container.
    pub fn outer_size(&self, border: Size) -> Size {
        Size::new(
            border.width + self.margins.horizontal(),
            border.height + self.margins.vertical(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_kind::NodeKind;
    use crate::tree::DocumentTree;

    #[test]
    fn test_cascade_inherits_text_overflow_and_paper() {
        let parent = ComputedStyle {
            page: PageStyle {
                size: PageSize::Letter,
                number_start: Some(3),
                ..Default::default()
            },
            font_size: 20.0,
            line_height: 24.0,
            h_align: HorizontalAlign::Center,
            overflow: OverflowAction::Truncate,
            margin: Margins::all(10.0),
            overflow_split: OverflowSplit::Never,
            ..Default::default()
        };
        let mut tree = DocumentTree::new();
        let id = tree.add_root(NodeKind::Panel, ElementStyle::default());
        let style = CascadeResolver.resolve_full_style(tree.node(id), &parent);
        assert_eq!(style.font_size, 20.0);
        assert_eq!(style.h_align, HorizontalAlign::Center);
        assert_eq!(style.overflow, OverflowAction::Truncate);
        assert_eq!(style.margin, Margins::default());
        assert_eq!(style.overflow_split, OverflowSplit::Any);
        assert_eq!(style.page.size, PageSize::Letter);
        assert_eq!(style.page.number_start, None);
    }

    #[test]
    fn test_font_size_implies_line_height() {
        let mut style = ComputedStyle::default();
        style.apply(&ElementStyle { font_size: Some(10.0), ..Default::default() });
        assert!((style.line_height - 12.0).abs() < 0.001);
    }

    #[test]
    fn test_box_model_explicit_width_is_border_box() {
        let style = ComputedStyle {
            width: Some(Dimension::Percent(50.0)),
            padding: Margins::all(5.0),
            margin: Margins::all(10.0),
            ..Default::default()
        };
        let options = PositionOptions::resolve(&style, Size::new(400.0, 300.0));
        assert_eq!(options.width, Some(200.0));
        assert_eq!(options.content_available(Size::new(400.0, 300.0)), Size::new(190.0, 270.0));
        let border = options.border_size(Size::new(50.0, 40.0), Size::new(400.0, 300.0));
        assert_eq!(border, Size::new(200.0, 50.0));
        assert_eq!(options.outer_size(border), Size::new(220.0, 70.0));
    }

    #[test]
    fn test_fill_width_takes_available_minus_margins() {
        let style = ComputedStyle {
            fill_width: true,
            margin: Margins::x(10.0),
            ..Default::default()
        };
        let options = PositionOptions::resolve(&style, Size::new(400.0, 300.0));
        assert_eq!(options.border_width(30.0, 400.0), 380.0);
    }
}
