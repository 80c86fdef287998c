mod common;

use common::fixtures::*;
use common::{TestResult, assert_close, assert_rect, layout_json, layout_json_with};
use folio::DocumentLayouter;
use serde_json::json;

#[test]
fn test_page_size_defaults_to_a4() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let out = layout_json(&json!({ "pages": [{ "type": "Page" }] }))?;
    assert_eq!(out.layout.page_count(), 1);
    let size = out.layout.pages[0].size;
    assert_close(size.width, 595.28);
    assert_close(size.height, 841.89);
    Ok(())
}

#[test]
fn test_page_size_letter() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let out = layout_json(&json!({ "pages": [{ "type": "Page", "style": "page-size: Letter" }] }))?;
    let size = out.layout.pages[0].size;
    assert_close(size.width, 612.0);
    assert_close(size.height, 792.0);
    Ok(())
}

#[test]
fn test_landscape_orientation() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let out = layout_json(&json!({
        "pages": [{ "type": "Page", "style": "page-size: A5; page-orientation: landscape" }]
    }))?;
    let size = out.layout.pages[0].size;
    assert_close(size.width, 595.28);
    assert_close(size.height, 419.53);
    Ok(())
}

#[test]
fn test_configured_default_page_size() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let layouter = DocumentLayouter::from_config_json(r#"{ "defaultPageSize": "Letter" }"#)?;
    let out = layout_json_with(&layouter, &json!({ "pages": [{ "type": "Page" }] }))?;
    assert_close(out.layout.pages[0].size.height, 792.0);
    Ok(())
}

#[test]
fn test_document_paper_applies_to_every_page() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![page(vec![]), styled_page("page-size: Legal", vec![]), page(vec![])]);

    let out = layout_json(&doc)?;
    let heights: Vec<f32> = out.layout.pages.iter().map(|p| p.size.height).collect();
    assert_eq!(heights, vec![PAGE_HEIGHT, 1008.0, PAGE_HEIGHT]);
    Ok(())
}

#[test]
fn test_page_margins_shape_the_body() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![styled_page("margin: 20pt 10pt", vec![block("content", 30.0)])]);

    let out = layout_json(&doc)?;
    let info = &out.layout.pages[0];
    assert_rect(info.body_rect, 10.0, 20.0, 180.0, 260.0);
    assert_rect(out.border_on("content", 0), 10.0, 20.0, 180.0, 30.0);
    Ok(())
}

#[test]
fn test_section_restarts_numbering() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document(vec![
        page(vec![block("intro", 10.0)]),
        section(
            "number-style: upper-roman; number-start: 1",
            vec![block("a", 200.0), block("b", 200.0)],
        ),
        page(vec![block("outro", 10.0)]),
    ]);

    let out = layout_json(&doc)?;
    assert_eq!(out.labels(), vec!["1", "I", "II", "4"]);
    let numbers: Vec<usize> = out.layout.pages.iter().map(|p| p.number).collect();
    assert_eq!(numbers, vec![1, 1, 2, 4]);
    Ok(())
}

#[test]
fn test_page_style_from_stylesheet_class() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = document_with_styles(
        json!({ "roomy": { "margin": "25pt" } }),
        vec![json!({ "type": "Page", "class": "roomy", "children": [block("content", 10.0)] })],
    );

    let out = layout_json(&doc)?;
    assert_rect(out.layout.pages[0].body_rect, 25.0, 25.0, 150.0, 250.0);
    assert_eq!(out.border_on("content", 0).x, 25.0);
    Ok(())
}
