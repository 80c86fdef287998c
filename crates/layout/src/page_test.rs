use crate::LayoutError;
use crate::node_kind::{NodeKind, PageTemplates};
use crate::template::TemplateRef;
use crate::test_utils::*;
use crate::tree::DocumentTree;
use folio_style::{ElementStyle, NumberStyle, Orientation, PageSize};
use folio_types::geometry::Rect;

#[test]
fn test_page_margins_and_padding_shape_the_body() {
    let (mut tree, doc) = document();
    let page = page(&mut tree, doc, "margin: 10pt; padding: 5pt");
    let a = block(&mut tree, page, 20.0);

    let layout = run_layout(&mut tree).unwrap();

    let info = layout.page(0).unwrap();
    assert_eq!(info.page_rect, Rect::new(0.0, 0.0, 200.0, 300.0));
    assert_eq!(info.content_rect, Rect::new(15.0, 15.0, 170.0, 270.0));
    assert_eq!(info.body_rect, info.content_rect);
    assert_eq!(border_on(&tree, a, 0), Rect::new(15.0, 15.0, 170.0, 20.0));
    assert_eq!(border_on(&tree, page, 0), Rect::new(10.0, 10.0, 180.0, 280.0));
}

#[test]
fn test_header_and_footer_shrink_the_body() {
    let (mut tree, doc) = document();
    let templates = PageTemplates {
        header: Some(band(20.0)),
        footer: Some(band(30.0)),
    };
    let page = page_with(&mut tree, doc, templates, "");
    let blocks: Vec<_> = (0..6).map(|_| block(&mut tree, page, 50.0)).collect();

    let layout = run_layout(&mut tree).unwrap();

    assert_eq!(layout.page_count(), 2);
    for info in &layout.pages {
        assert_eq!(info.body_rect, Rect::new(0.0, 20.0, 200.0, 250.0));
        let header = info.header.as_ref().unwrap();
        let footer = info.footer.as_ref().unwrap();
        assert_eq!(header.rect, Rect::new(0.0, 0.0, 200.0, 20.0));
        assert_eq!(footer.rect, Rect::new(0.0, 270.0, 200.0, 30.0));
        let footer_root = footer.tree.node(footer.root).arrangement_on(info.index).unwrap();
        assert_eq!(footer_root.border_rect.y, 270.0);
    }
    assert_eq!(border_on(&tree, blocks[0], 0).y, 20.0);
    assert_eq!(pages_of(&tree, blocks[5]), vec![1]);
    assert_eq!(border_on(&tree, blocks[5], 1).y, 20.0);
}

#[test]
fn test_templates_see_the_page_index() {
    let (mut tree, doc) = document();
    let header = TemplateRef::from_fn(|index| {
        let mut tree = DocumentTree::new();
        let root = tree.add_root(NodeKind::Panel, ElementStyle::default());
        tree.append(root, NodeKind::text(format!("page {}", index)), ElementStyle::default());
        Ok(tree)
    });
    let templates = PageTemplates {
        header: Some(header),
        footer: None,
    };
    let page = page_with(&mut tree, doc, templates, "");
    block(&mut tree, page, 250.0);
    block(&mut tree, page, 250.0);

    let layout = run_layout(&mut tree).unwrap();

    let texts: Vec<String> = layout
        .pages
        .iter()
        .map(|info| {
            let region = info.header.as_ref().unwrap();
            let child = region.tree.children(region.root)[0];
            match &region.tree.node(child).kind {
                NodeKind::Text(t) => t.text.clone(),
                other => panic!("unexpected {:?}", other),
            }
        })
        .collect();
    assert_eq!(texts, vec!["page 0", "page 1"]);
}

#[test]
fn test_template_root_must_be_a_panel() {
    let (mut tree, doc) = document();
    let templates = PageTemplates {
        header: Some(TemplateRef::from_fn(|_| {
            let mut tree = DocumentTree::new();
            tree.add_root(NodeKind::text("bare"), ElementStyle::default());
            Ok(tree)
        })),
        footer: None,
    };
    page_with(&mut tree, doc, templates, "");

    let err = run_layout(&mut tree).unwrap_err();

    assert!(matches!(err, LayoutError::Template(_)));
}

#[test]
fn test_section_uses_continuation_templates_after_first_page() {
    let (mut tree, doc) = document();
    let kind = NodeKind::Section {
        templates: PageTemplates {
            header: Some(band(20.0)),
            footer: Some(band(10.0)),
        },
        continuation: PageTemplates {
            header: Some(band(40.0)),
            footer: None,
        },
    };
    let section = tree.append(doc, kind, small_page_style(""));
    let blocks: Vec<_> = (0..3).map(|_| block(&mut tree, section, 120.0)).collect();

    let layout = run_layout(&mut tree).unwrap();

    assert_eq!(layout.page_count(), 2);
    assert_eq!(layout.pages[0].body_rect, Rect::new(0.0, 20.0, 200.0, 270.0));
    // The continuation declares no footer, so the first-page one stays.
    assert_eq!(layout.pages[1].body_rect, Rect::new(0.0, 40.0, 200.0, 250.0));
    assert_eq!(border_on(&tree, blocks[2], 1).y, 40.0);
    assert!(layout.pages.iter().all(|p| p.owner == section));
}

#[test]
fn test_pages_continue_global_numbering() {
    let (mut tree, doc) = document();
    let first = page(&mut tree, doc, "");
    block(&mut tree, first, 250.0);
    block(&mut tree, first, 250.0);
    let second = page(&mut tree, doc, "");
    let last = block(&mut tree, second, 10.0);

    let layout = run_layout(&mut tree).unwrap();

    assert_eq!(layout.page_count(), 3);
    let indices: Vec<_> = layout.pages.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(layout.pages[2].owner, second);
    assert_eq!(pages_of(&tree, last), vec![2]);
    let labels: Vec<_> = layout.pages.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["1", "2", "3"]);
}

#[test]
fn test_number_style_and_restart() {
    let (mut tree, doc) = document();
    let mut page_style = small_page_style("");
    page_style.number_style = Some(NumberStyle::UpperRoman);
    page_style.number_start = Some(4);
    let page = tree.append(doc, NodeKind::Page(PageTemplates::default()), page_style);
    block(&mut tree, page, 250.0);
    block(&mut tree, page, 250.0);

    let layout = run_layout(&mut tree).unwrap();

    let labels: Vec<_> = layout.pages.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["IV", "V"]);
    assert_eq!(layout.pages[1].number, 5);
}

#[test]
fn test_landscape_orientation_swaps_edges() {
    let (mut tree, doc) = document();
    let page_style = ElementStyle {
        page_size: Some(PageSize::A4),
        page_orientation: Some(Orientation::Landscape),
        ..Default::default()
    };
    tree.append(doc, NodeKind::Page(PageTemplates::default()), page_style);

    let layout = run_layout(&mut tree).unwrap();

    let size = layout.pages[0].size;
    assert_eq!((size.width, size.height), (841.89, 595.28));
}

#[test]
fn test_page_refusing_overflow_stops_content() {
    let (mut tree, doc) = document();
    let page = page(&mut tree, doc, "overflow: truncate");
    let a = block(&mut tree, page, 250.0);
    let b = panel(&mut tree, page, "height: 250pt; fill-width: true; overflow: new-page");

    let layout = run_layout(&mut tree).unwrap();

    assert_eq!(layout.page_count(), 1);
    assert_eq!(pages_of(&tree, a), vec![0]);
    assert!(tree.arrangements(b).is_empty());
}

#[test]
fn test_document_child_must_be_a_page() {
    let (mut tree, doc) = document();
    let stray = panel(&mut tree, doc, "");

    let err = run_layout(&mut tree).unwrap_err();

    assert!(matches!(err, LayoutError::NotAPage(id) if id == stray));
}

#[test]
fn test_nested_page_is_rejected() {
    let (mut tree, doc) = document();
    let outer = page(&mut tree, doc, "");
    page(&mut tree, outer, "");

    let err = run_layout(&mut tree).unwrap_err();

    assert!(matches!(err, LayoutError::UnsupportedNode { kind: "Page", .. }));
}

#[test]
fn test_empty_document_has_no_pages() {
    let (mut tree, _) = document();

    let layout = run_layout(&mut tree).unwrap();

    assert_eq!(layout.page_count(), 0);
}
