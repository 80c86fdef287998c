//! Declared (uncascaded) style values attached to a document node.

use super::dimension::{Dimension, Margins, Orientation, PageSize};
use super::numbering::NumberStyle;
use super::position::{LayoutMode, OverflowAction, OverflowSplit, PositionMode};
use super::text::{HorizontalAlign, VerticalAlign};
use serde::{Deserialize, Serialize};

/// Every property is optional; `None` means "not declared here" and lets the
/// resolver inherit or default it.
#[derive(Deserialize, Serialize, Default, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    // Box Model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Margins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_width: Option<bool>,

    // Positioning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<LayoutMode>,

    // Pagination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<OverflowAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow_split: Option<OverflowSplit>,

    // Alignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h_align: Option<HorizontalAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_align: Option<VerticalAlign>,

    // Text metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,

    // Page Properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<PageSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_orientation: Option<Orientation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_style: Option<NumberStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_start: Option<usize>,
}

impl ElementStyle {
    /// Overlays every property declared in `other` onto `self`.
    pub fn merge(&mut self, other: &ElementStyle) {
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        overlay!(
            margin,
            padding,
            width,
            height,
            fill_width,
            x,
            y,
            position,
            display,
            overflow,
            overflow_split,
            h_align,
            v_align,
            font_size,
            line_height,
            page_size,
            page_orientation,
            number_style,
            number_start,
        );
    }

    /// Returns a copy of `self` with `other` overlaid.
    pub fn merged(&self, other: &ElementStyle) -> ElementStyle {
        let mut out = self.clone();
        out.merge(other);
        out
    }
}
