mod common;

use common::fixtures::*;
use common::{TestResult, assert_close, assert_rect, layout_json};
use folio::MeasuredContent;
use serde_json::json;

#[test]
fn test_margins_and_padding_offset_content() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![page(vec![panel(
        "boxed",
        "margin: 10pt; padding: 5pt 8pt",
        vec![block("inner", 40.0)],
    )])]);

    let out = layout_json(&doc)?;
    let boxed = &out.arrangements("boxed")[0];
    // Width shrinks to content: the fill-width child takes the offered width.
    assert_rect(boxed.border_rect, 10.0, 10.0, 180.0, 50.0);
    assert_rect(boxed.content_rect, 18.0, 15.0, 164.0, 40.0);
    assert_rect(out.border_on("inner", 0), 18.0, 15.0, 164.0, 40.0);
    Ok(())
}

#[test]
fn test_vertical_margins_do_not_collapse() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![page(vec![
        panel("a", "height: 20pt; width: 50pt; margin: 0pt 0pt 10pt 0pt", vec![]),
        panel("b", "height: 20pt; width: 50pt; margin: 15pt 0pt 0pt 0pt", vec![]),
    ])]);

    let out = layout_json(&doc)?;
    assert_eq!(out.border_on("a", 0).y, 0.0);
    assert_eq!(out.border_on("b", 0).y, 45.0);
    Ok(())
}

#[test]
fn test_percent_width_resolves_against_container() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![page(vec![panel(
        "outer",
        "width: 100pt; height: 50pt",
        vec![panel("half", "width: 50%; height: 10pt", vec![])],
    )])]);

    let out = layout_json(&doc)?;
    assert_close(out.border_on("half", 0).width, 50.0);
    Ok(())
}

#[test]
fn test_text_wraps_inside_narrow_panel() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![page(vec![panel(
        "narrow",
        "width: 40pt",
        vec![text("words", "aaa bbb ccc")],
    )])]);

    let out = layout_json(&doc)?;
    let words = out.id("words");
    match out.tree.node(words).measured() {
        Some(MeasuredContent::Text(block)) => {
            let lines: Vec<&str> = block.lines.iter().map(|l| l.text.as_str()).collect();
            assert_eq!(lines, vec!["aaa", "bbb", "ccc"]);
        }
        other => panic!("expected measured text, got {:?}", other),
    }
    assert_rect(out.border_on("words", 0), 0.0, 0.0, 18.0, 43.2);
    assert_close(out.border_on("narrow", 0).height, 43.2);
    Ok(())
}

#[test]
fn test_stylesheet_classes_and_inherited_font_size() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document_with_styles(
        json!({
            "large": { "fontSize": 20, "lineHeight": 24 },
            "spaced": { "margin": "0pt 0pt 6pt 0pt" }
        }),
        vec![page(vec![json!({
            "type": "Panel",
            "name": "outer",
            "class": "large spaced",
            "children": [text("big", "Hi")]
        })])],
    );

    let out = layout_json(&doc)?;
    // Two characters at 10pt each, one 24pt line.
    assert_rect(out.border_on("big", 0), 0.0, 0.0, 20.0, 24.0);
    assert_rect(out.border_on("outer", 0), 0.0, 0.0, 20.0, 24.0);
    Ok(())
}

#[test]
fn test_hidden_node_takes_no_space() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![page(vec![
        json!({ "type": "Panel", "name": "ghost", "hidden": true, "style": "height: 80pt" }),
        block("visible", 20.0),
    ])]);

    let out = layout_json(&doc)?;
    assert!(out.arrangements("ghost").is_empty());
    assert_eq!(out.border_on("visible", 0).y, 0.0);
    Ok(())
}

#[test]
fn test_invisible_container_is_transparent() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![page(vec![
        block("before", 20.0),
        json!({
            "type": "Invisible",
            "name": "group",
            "children": [block("grouped", 30.0)]
        }),
        block("after", 10.0),
    ])]);

    let out = layout_json(&doc)?;
    assert!(out.arrangements("group").is_empty());
    assert_eq!(out.border_on("grouped", 0).y, 20.0);
    assert_eq!(out.border_on("after", 0).y, 50.0);
    Ok(())
}

#[test]
fn test_image_scales_to_width() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![page(vec![json!({
        "type": "Image",
        "name": "photo",
        "style": "width: 100pt",
        "pixelWidth": 400,
        "pixelHeight": 200
    })])]);

    let out = layout_json(&doc)?;
    assert_rect(out.border_on("photo", 0), 0.0, 0.0, 100.0, 50.0);
    Ok(())
}

#[test]
fn test_path_occupies_its_bounds() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![page(vec![json!({
        "type": "Path",
        "name": "line",
        "points": [[0.0, 0.0], [60.0, 0.0], [60.0, 25.0]]
    })])]);

    let out = layout_json(&doc)?;
    let rect = out.border_on("line", 0);
    assert_close(rect.width, 60.0);
    assert_close(rect.height, 25.0);
    Ok(())
}

#[test]
fn test_absolute_child_is_placed_on_the_page() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![styled_page(
        "margin: 20pt",
        vec![
            panel("stamp", "position: absolute; x: 5pt; y: 7pt; width: 10pt; height: 10pt", vec![]),
            block("body", 30.0),
        ],
    )]);

    let out = layout_json(&doc)?;
    assert_rect(out.border_on("stamp", 0), 5.0, 7.0, 10.0, 10.0);
    assert_rect(out.border_on("body", 0), 20.0, 20.0, 160.0, 30.0);
    Ok(())
}
