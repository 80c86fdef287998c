//! Low-level nom parser functions for CSS-like style values.
//!
//! This module provides composable parser functions for lengths, dimensions and
//! margin shorthands, plus the keyword parsers used by inline style declarations.

use crate::dimension::{Dimension, Margins, Orientation, PageSize};
use crate::numbering::NumberStyle;
use crate::position::{LayoutMode, OverflowAction, OverflowSplit, PositionMode};
use crate::stylesheet::ElementStyle;
use crate::text::{HorizontalAlign, VerticalAlign};
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{char, space1};
use nom::combinator::{map, opt, value};
use nom::multi::separated_list1;
use nom::number::complete::float;
use nom::sequence::{pair, terminated};
use nom::{IResult, Parser};
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },

    #[error("Unknown style property '{0}'")]
    UnknownProperty(String),
}

// --- Unit & Dimension Parsers ---

fn parse_number(input: &str) -> IResult<&str, f32> {
    float(input)
}

fn parse_unit(input: &str) -> IResult<&str, f32> {
    alt((
        value(1.0, tag_no_case("pt")),
        value(1.0, tag_no_case("px")), // Treat px as pt
        value(72.0, tag_no_case("in")),
        value(28.35, tag_no_case("cm")),
        value(2.835, tag_no_case("mm")),
    ))
    .parse(input)
}

/// Parses a length value with optional unit (e.g., "12pt", "1in", "10mm").
pub fn parse_length(input: &str) -> IResult<&str, f32> {
    map(pair(parse_number, opt(parse_unit)), |(v, unit)| {
        v * unit.unwrap_or(1.0)
    })
    .parse(input)
}

/// Parses a dimension value (length, percentage, or "auto").
pub fn parse_dimension(input: &str) -> IResult<&str, Dimension> {
    alt((
        value(Dimension::Auto, tag_no_case("auto")),
        map(terminated(parse_number, char('%')), Dimension::Percent),
        map(parse_length, Dimension::Pt),
    ))
    .parse(input)
}

/// Parses CSS shorthand margins (1, 2, or 4 values).
pub fn parse_shorthand_margins(input: &str) -> Result<Margins, StyleParseError> {
    let parts_res = separated_list1(space1, parse_length).parse(input.trim());

    match parts_res {
        Ok(("", parts)) => match parts.len() {
            1 => Ok(Margins::all(parts[0])),
            2 => Ok(Margins {
                top: parts[0],
                right: parts[1],
                bottom: parts[0],
                left: parts[1],
            }),
            4 => Ok(Margins {
                top: parts[0],
                right: parts[1],
                bottom: parts[2],
                left: parts[3],
            }),
            _ => Err(StyleParseError::Parse(format!(
                "Invalid number of values for margin/padding shorthand: got {}, expected 1, 2, or 4.",
                parts.len()
            ))),
        },
        _ => Err(StyleParseError::Parse(format!(
            "Failed to parse margins value: '{}'",
            input
        ))),
    }
}

/// Helper to run a nom parser and convert its result to a `Result<T, StyleParseError>`.
pub fn run_parser<'a, T, F>(parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Fn(&'a str) -> IResult<&'a str, T>,
{
    match parser(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

// --- Keyword Parsers ---

fn invalid(property: &str, value: &str) -> StyleParseError {
    StyleParseError::InvalidValue {
        property: property.to_string(),
        value: value.to_string(),
    }
}

pub fn parse_position_mode(s: &str) -> Result<PositionMode, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "flow" | "static" => Ok(PositionMode::Flow),
        "relative" => Ok(PositionMode::Relative),
        "absolute" => Ok(PositionMode::Absolute),
        _ => Err(invalid("position", s)),
    }
}

pub fn parse_layout_mode(s: &str) -> Result<LayoutMode, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "block" => Ok(LayoutMode::Block),
        "inline" | "inline-block" => Ok(LayoutMode::Inline),
        _ => Err(invalid("display", s)),
    }
}

pub fn parse_overflow_action(s: &str) -> Result<OverflowAction, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "new-page" => Ok(OverflowAction::NewPage),
        "truncate" => Ok(OverflowAction::Truncate),
        "none" => Ok(OverflowAction::None),
        _ => Err(invalid("overflow", s)),
    }
}

pub fn parse_overflow_split(s: &str) -> Result<OverflowSplit, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "any" | "auto" => Ok(OverflowSplit::Any),
        "never" | "avoid" => Ok(OverflowSplit::Never),
        _ => Err(invalid("overflow-split", s)),
    }
}

pub fn parse_horizontal_align(s: &str) -> Result<HorizontalAlign, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "left" => Ok(HorizontalAlign::Left),
        "center" => Ok(HorizontalAlign::Center),
        "right" => Ok(HorizontalAlign::Right),
        "justify" => Ok(HorizontalAlign::Justify),
        _ => Err(invalid("h-align", s)),
    }
}

pub fn parse_vertical_align(s: &str) -> Result<VerticalAlign, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "top" => Ok(VerticalAlign::Top),
        "middle" | "center" => Ok(VerticalAlign::Middle),
        "bottom" => Ok(VerticalAlign::Bottom),
        _ => Err(invalid("v-align", s)),
    }
}

pub fn parse_number_style(s: &str) -> Result<NumberStyle, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "decimal" => Ok(NumberStyle::Decimal),
        "upper-roman" => Ok(NumberStyle::UpperRoman),
        "lower-roman" => Ok(NumberStyle::LowerRoman),
        "upper-alpha" => Ok(NumberStyle::UpperAlpha),
        "lower-alpha" => Ok(NumberStyle::LowerAlpha),
        "none" => Ok(NumberStyle::None),
        _ => Err(invalid("number-style", s)),
    }
}

pub fn parse_orientation(s: &str) -> Result<Orientation, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "portrait" => Ok(Orientation::Portrait),
        "landscape" => Ok(Orientation::Landscape),
        _ => Err(invalid("page-orientation", s)),
    }
}

/// Parses a page size value.
pub fn parse_page_size(s: &str) -> Result<PageSize, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "a3" => Ok(PageSize::A3),
        "a4" => Ok(PageSize::A4),
        "a5" => Ok(PageSize::A5),
        "letter" => Ok(PageSize::Letter),
        "legal" => Ok(PageSize::Legal),
        _ => Err(invalid("page-size", s)),
    }
}

fn parse_bool(property: &str, s: &str) -> Result<bool, StyleParseError> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" => Ok(true),
        "false" | "no" => Ok(false),
        _ => Err(invalid(property, s)),
    }
}

// --- High-level Style Application Functions ---

/// Applies a single parsed style property to an `ElementStyle` struct.
/// This is the central dispatcher for applying individual CSS-like properties.
pub fn apply_style_property(
    style: &mut ElementStyle,
    attr_name: &str,
    value: &str,
) -> Result<(), StyleParseError> {
    match attr_name.trim() {
        "margin" => style.margin = Some(parse_shorthand_margins(value)?),
        "margin-top" => {
            style.margin.get_or_insert_with(Default::default).top = run_parser(parse_length, value)?
        }
        "margin-right" => {
            style.margin.get_or_insert_with(Default::default).right =
                run_parser(parse_length, value)?
        }
        "margin-bottom" => {
            style.margin.get_or_insert_with(Default::default).bottom =
                run_parser(parse_length, value)?
        }
        "margin-left" => {
            style.margin.get_or_insert_with(Default::default).left =
                run_parser(parse_length, value)?
        }
        "padding" => style.padding = Some(parse_shorthand_margins(value)?),
        "x" | "left" => style.x = Some(run_parser(parse_length, value)?),
        "y" | "top" => style.y = Some(run_parser(parse_length, value)?),
        "width" => style.width = Some(run_parser(parse_dimension, value)?),
        "height" => style.height = Some(run_parser(parse_dimension, value)?),
        "position" => style.position = Some(parse_position_mode(value)?),
        "display" => style.display = Some(parse_layout_mode(value)?),
        "fill-width" => style.fill_width = Some(parse_bool("fill-width", value)?),
        "overflow" => style.overflow = Some(parse_overflow_action(value)?),
        "overflow-split" => style.overflow_split = Some(parse_overflow_split(value)?),
        "h-align" | "text-align" => style.h_align = Some(parse_horizontal_align(value)?),
        "v-align" | "vertical-align" => style.v_align = Some(parse_vertical_align(value)?),
        "font-size" => style.font_size = Some(run_parser(parse_length, value)?),
        "line-height" => style.line_height = Some(run_parser(parse_length, value)?),
        "page-size" => style.page_size = Some(parse_page_size(value)?),
        "page-orientation" => style.page_orientation = Some(parse_orientation(value)?),
        "number-style" => style.number_style = Some(parse_number_style(value)?),
        "number-start" => {
            style.number_start = Some(value.trim().parse::<usize>().map_err(|_| {
                invalid("number-start", value)
            })?)
        }
        other => return Err(StyleParseError::UnknownProperty(other.to_string())),
    }
    Ok(())
}

/// Parses a `;`-separated declaration list such as `"margin: 10pt; width: 50%"`.
pub fn parse_declarations(input: &str) -> Result<ElementStyle, StyleParseError> {
    let mut style = ElementStyle::default();
    for declaration in input.split(';').map(str::trim).filter(|d| !d.is_empty()) {
        let (name, value) = declaration
            .split_once(':')
            .ok_or_else(|| StyleParseError::Parse(format!("Missing ':' in '{}'", declaration)))?;
        apply_style_property(&mut style, name, value)?;
    }
    Ok(style)
}
