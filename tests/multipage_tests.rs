mod common;

use common::fixtures::*;
use common::{TestResult, assert_rect, layout_json, layout_json_with};
use folio::DocumentLayouter;
use serde_json::json;

#[test]
fn test_explicit_page_break() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![page(vec![
        text("first", "Page 1 content"),
        page_break(),
        text("second", "Page 2 content"),
    ])]);

    let out = layout_json(&doc)?;
    assert_eq!(out.layout.page_count(), 2);
    assert_eq!(out.pages_of("first"), vec![0]);
    assert_eq!(out.pages_of("second"), vec![1]);
    assert_eq!(out.border_on("second", 1).y, 0.0);
    Ok(())
}

#[test]
fn test_page_break_at_top_of_page_is_consumed() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![page(vec![page_break(), text("only", "content")])]);

    let out = layout_json(&doc)?;
    assert_eq!(out.layout.page_count(), 1);
    assert_eq!(out.pages_of("only"), vec![0]);
    Ok(())
}

#[test]
fn test_overflowing_content_opens_pages() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let blocks = (0..10).map(|i| block(&format!("b{}", i), 100.0)).collect();
    let doc = document(vec![page(blocks)]);

    let out = layout_json(&doc)?;
    assert_eq!(out.layout.page_count(), 4);
    assert_eq!(out.labels(), vec!["1", "2", "3", "4"]);
    assert_rect(out.border_on("b2", 0), 0.0, 200.0, 200.0, 100.0);
    assert_rect(out.border_on("b3", 1), 0.0, 0.0, 200.0, 100.0);
    assert_rect(out.border_on("b9", 3), 0.0, 0.0, 200.0, 100.0);
    Ok(())
}

#[test]
fn test_padded_panel_continues_across_pages() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let inner = (0..4).map(|i| block(&format!("n{}", i), 100.0)).collect();
    let doc = document(vec![page(vec![
        panel("outer", "padding: 10pt; fill-width: true", inner),
        block("tail", 20.0),
    ])]);

    let out = layout_json(&doc)?;
    assert_eq!(out.pages_of("outer"), vec![0, 1]);
    // Top padding only on the first piece, bottom padding only on the last.
    assert_rect(out.arrangements("outer")[0].border_rect, 0.0, 0.0, 200.0, 210.0);
    assert_rect(out.arrangements("outer")[1].border_rect, 0.0, 0.0, 200.0, 210.0);
    assert_rect(out.border_on("n1", 0), 10.0, 110.0, 180.0, 100.0);
    assert_rect(out.border_on("n2", 1), 10.0, 0.0, 180.0, 100.0);
    assert_rect(out.border_on("tail", 1), 0.0, 210.0, 200.0, 20.0);
    Ok(())
}

#[test]
fn test_section_switches_to_continuation_header() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let blocks: Vec<_> = (0..6).map(|i| block(&format!("s{}", i), 100.0)).collect();
    let doc = document(vec![json!({
        "type": "Section",
        "header": band(30.0, vec![]),
        "continuationHeader": band(10.0, vec![]),
        "children": blocks
    })]);

    let out = layout_json(&doc)?;
    assert_eq!(out.layout.page_count(), 3);
    let bodies: Vec<_> = out.layout.pages.iter().map(|p| (p.body_rect.y, p.body_rect.height)).collect();
    assert_eq!(bodies, vec![(30.0, 270.0), (10.0, 290.0), (10.0, 290.0)]);
    assert_eq!(out.border_on("s1", 0).y, 130.0);
    assert_eq!(out.border_on("s2", 1).y, 10.0);
    assert_eq!(out.border_on("s5", 2).y, 110.0);
    Ok(())
}

#[test]
fn test_every_page_node_starts_a_new_page() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![
        page(vec![block("one", 50.0)]),
        page(vec![block("two", 50.0)]),
    ]);

    let out = layout_json(&doc)?;
    assert_eq!(out.layout.page_count(), 2);
    assert_eq!(out.layout.pages[1].owner, out.tree.parent(out.id("two")).unwrap());
    assert_rect(out.border_on("two", 1), 0.0, 0.0, 200.0, 50.0);
    Ok(())
}

#[test]
fn test_page_limit_stops_layout() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let layouter = DocumentLayouter::from_config_json(r#"{ "maxPages": 2 }"#)?;
    let blocks = (0..10).map(|i| block(&format!("b{}", i), 100.0)).collect();
    let doc = document(vec![page(blocks)]);

    let out = layout_json_with(&layouter, &doc)?;
    assert_eq!(out.layout.page_count(), 2);
    assert_eq!(out.pages_of("b5"), vec![1]);
    assert!(out.arrangements("b6").is_empty());
    assert!(out.arrangements("b9").is_empty());
    Ok(())
}

#[test]
fn test_truncated_panel_is_hidden_on_its_page() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![page(vec![
        block("top", 250.0),
        json!({
            "type": "Panel",
            "name": "clipped",
            "style": "height: 100pt; fill-width: true; overflow: truncate",
            "children": [{ "type": "Text", "name": "inside", "content": "gone" }]
        }),
        block("next", 20.0),
    ])]);

    let out = layout_json(&doc)?;
    assert_eq!(out.layout.page_count(), 1);
    let clipped = &out.arrangements("clipped")[0];
    assert!(!clipped.display);
    assert_eq!(clipped.border_rect.y, 250.0);
    assert!(out.arrangements("inside").is_empty());
    // The truncated panel takes no room.
    assert_eq!(out.border_on("next", 0).y, 250.0);
    Ok(())
}
