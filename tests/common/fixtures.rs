#![allow(dead_code)]

use serde_json::{Value, json};

pub const PAGE_WIDTH: f32 = 200.0;
pub const PAGE_HEIGHT: f32 = 300.0;

/// A document whose pages default to a 200x300pt sheet without margins.
pub fn document(pages: Vec<Value>) -> Value {
    json!({
        "style": { "pageSize": { "width": PAGE_WIDTH, "height": PAGE_HEIGHT } },
        "pages": pages
    })
}

pub fn document_with_styles(styles: Value, pages: Vec<Value>) -> Value {
    let mut doc = document(pages);
    doc["stylesheet"] = json!({ "styles": styles });
    doc
}

pub fn page(children: Vec<Value>) -> Value {
    styled_page("", children)
}

pub fn styled_page(style: &str, children: Vec<Value>) -> Value {
    json!({ "type": "Page", "style": style, "children": children })
}

pub fn section(style: &str, children: Vec<Value>) -> Value {
    json!({ "type": "Section", "style": style, "children": children })
}

/// A full-width panel of a fixed height.
pub fn block(name: &str, height: f32) -> Value {
    json!({
        "type": "Panel",
        "name": name,
        "style": format!("height: {}pt; fill-width: true", height)
    })
}

pub fn panel(name: &str, style: &str, children: Vec<Value>) -> Value {
    json!({ "type": "Panel", "name": name, "style": style, "children": children })
}

pub fn text(name: &str, content: &str) -> Value {
    json!({ "type": "Text", "name": name, "content": content })
}

pub fn page_break() -> Value {
    json!({ "type": "PageBreak" })
}

/// A header or footer band of the given height.
pub fn band(height: f32, children: Vec<Value>) -> Value {
    json!({
        "type": "Panel",
        "style": format!("height: {}pt; fill-width: true", height),
        "children": children
    })
}

pub fn table(name: &str, style: &str, rows: Vec<Value>) -> Value {
    json!({ "type": "Table", "name": name, "style": style, "rows": rows })
}

pub fn row(cells: Vec<Value>) -> Value {
    json!({ "type": "Row", "cells": cells })
}

pub fn styled_row(style: &str, cells: Vec<Value>) -> Value {
    json!({ "type": "Row", "style": style, "cells": cells })
}

pub fn cell(name: &str, style: &str, children: Vec<Value>) -> Value {
    json!({ "type": "Cell", "name": name, "style": style, "children": children })
}

pub fn text_cell(name: &str, content: &str) -> Value {
    cell(name, "", vec![text(&format!("{}-text", name), content)])
}

pub fn spanning_cell(name: &str, style: &str, columns: usize, rows: usize, children: Vec<Value>) -> Value {
    json!({
        "type": "Cell",
        "name": name,
        "style": style,
        "columnSpan": columns,
        "rowSpan": rows,
        "children": children
    })
}
