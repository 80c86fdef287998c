//! Measurement contracts for text and vector content.

use crate::LayoutError;
use crate::node_kind::{PathContent, TextContent};
use crate::style::ComputedStyle;
use folio_types::NodeId;
use folio_types::geometry::{Point, Size};

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub width: f32,
}

/// Text broken into lines for a given width.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
    pub line_height: f32,
    pub size: Size,
}

/// A path normalized so its bounding box starts at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PathBlock {
    pub points: Vec<Point>,
    pub closed: bool,
    pub size: Size,
}

/// The last measured block of a text or path node, kept for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasuredContent {
    Text(TextBlock),
    Path(PathBlock),
}

/// Measures content on behalf of the engines.
///
/// Engines bracket their work with `acquire`/`release` for the node they
/// lay out; implementations may hold per-scope resources (shaper caches,
/// font handles) between the two calls.
pub trait Measurer {
    fn measure_text(
        &mut self,
        text: &TextContent,
        style: &ComputedStyle,
        available: Size,
    ) -> Result<TextBlock, LayoutError>;

    fn create_path(
        &mut self,
        path: &PathContent,
        style: &ComputedStyle,
        available: Size,
    ) -> Result<PathBlock, LayoutError>;

    fn acquire(&mut self, _owner: NodeId) {}

    fn release(&mut self, _owner: NodeId) {}
}

/// Average-advance metrics: every character is `font_size * advance_ratio` wide.
#[derive(Debug, Clone)]
pub struct FixedMetrics {
    pub advance_ratio: f32,
    open_scopes: usize,
    peak_scopes: usize,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl FixedMetrics {
    pub fn new(advance_ratio: f32) -> Self {
        Self {
            advance_ratio,
            open_scopes: 0,
            peak_scopes: 0,
        }
    }

    /// Scopes acquired and not yet released.
    pub fn open_scopes(&self) -> usize {
        self.open_scopes
    }

    pub fn peak_scopes(&self) -> usize {
        self.peak_scopes
    }

    fn advance(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.advance_ratio
    }

    fn wrap_paragraph(&self, paragraph: &str, font_size: f32, max_width: f32, out: &mut Vec<TextLine>) {
        let space = self.advance(" ", font_size);
        let mut current = String::new();
        let mut width = 0.0;
        for word in paragraph.split_whitespace() {
            let word_width = self.advance(word, font_size);
            if !current.is_empty() && width + space + word_width > max_width {
                out.push(TextLine { text: std::mem::take(&mut current), width });
                width = 0.0;
            }
            if !current.is_empty() {
                current.push(' ');
                width += space;
            }
            current.push_str(word);
            width += word_width;
        }
        out.push(TextLine { text: current, width });
    }
}

impl Measurer for FixedMetrics {
    fn measure_text(
        &mut self,
        text: &TextContent,
        style: &ComputedStyle,
        available: Size,
    ) -> Result<TextBlock, LayoutError> {
        let mut lines = Vec::new();
        if !text.text.trim().is_empty() {
            for paragraph in text.text.lines() {
                self.wrap_paragraph(paragraph, style.font_size, available.width, &mut lines);
            }
        }
        let width = lines.iter().fold(0.0f32, |acc, l| acc.max(l.width));
        let height = lines.len() as f32 * style.line_height;
        Ok(TextBlock {
            lines,
            line_height: style.line_height,
            size: Size::new(width, height),
        })
    }

    fn create_path(
        &mut self,
        path: &PathContent,
        _style: &ComputedStyle,
        _available: Size,
    ) -> Result<PathBlock, LayoutError> {
        if path.points.is_empty() {
            return Ok(PathBlock { points: Vec::new(), closed: path.closed, size: Size::zero() });
        }
        let (min_x, min_y, max_x, max_y) = path.points.iter().fold(
            (f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
            |(a, b, c, d), p| (a.min(p.x), b.min(p.y), c.max(p.x), d.max(p.y)),
        );
        Ok(PathBlock {
            points: path.points.iter().map(|p| Point::new(p.x - min_x, p.y - min_y)).collect(),
            closed: path.closed,
            size: Size::new(max_x - min_x, max_y - min_y),
        })
    }

    fn acquire(&mut self, _owner: NodeId) {
        self.open_scopes += 1;
        self.peak_scopes = self.peak_scopes.max(self.open_scopes);
    }

    fn release(&mut self, owner: NodeId) {
        if self.open_scopes == 0 {
            log::warn!("Measurement scope for {} released without being acquired.", owner);
            return;
        }
        self.open_scopes -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(font_size: f32) -> ComputedStyle {
        ComputedStyle { font_size, line_height: font_size * 1.2, ..Default::default() }
    }

    #[test]
    fn test_greedy_wrap() {
        let mut m = FixedMetrics::default();
        let text = TextContent { text: "aaaa bbbb cccc".into() };
        // 10pt font: 5pt per char, each word 20pt, space 5pt.
        let block = m.measure_text(&text, &style(10.0), Size::new(45.0, 100.0)).unwrap();
        let lines: Vec<_> = block.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
        assert_eq!(block.size, Size::new(45.0, 24.0));
    }

    #[test]
    fn test_unbounded_width_keeps_one_line_per_paragraph() {
        let mut m = FixedMetrics::default();
        let text = TextContent { text: "one two\nthree".into() };
        let block = m.measure_text(&text, &style(10.0), Size::unbounded_height(f32::INFINITY)).unwrap();
        assert_eq!(block.lines.len(), 2);
    }

    #[test]
    fn test_empty_text_measures_zero() {
        let mut m = FixedMetrics::default();
        let block = m.measure_text(&TextContent { text: "  ".into() }, &style(10.0), Size::new(50.0, 50.0)).unwrap();
        assert_eq!(block.size, Size::zero());
    }

    #[test]
    fn test_path_is_normalized_to_origin() {
        let mut m = FixedMetrics::default();
        let path = PathContent {
            points: vec![Point::new(10.0, 20.0), Point::new(30.0, 25.0)],
            closed: false,
        };
        let block = m.create_path(&path, &style(10.0), Size::new(100.0, 100.0)).unwrap();
        assert_eq!(block.size, Size::new(20.0, 5.0));
        assert_eq!(block.points[0], Point::zero());
    }
}
