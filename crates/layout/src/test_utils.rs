use crate::config::LayoutConfig;
use crate::engines::{DocumentDriver, DocumentLayout};
use crate::interface::LayoutContext;
use crate::measure::FixedMetrics;
use crate::node_kind::{NodeKind, PageTemplates};
use crate::style::CascadeResolver;
use crate::template::TemplateRef;
use crate::tree::DocumentTree;
use crate::LayoutError;
use folio_style::parsers::parse_declarations;
use folio_style::{ElementStyle, PageSize};
use folio_types::NodeId;
use folio_types::geometry::Rect;

pub const PAGE_WIDTH: f32 = 200.0;
pub const PAGE_HEIGHT: f32 = 300.0;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parses a declaration list; panics on malformed test input.
pub fn style(declarations: &str) -> ElementStyle {
    parse_declarations(declarations).expect("test style should parse")
}

/// A 200x300pt page style with no margins, plus `declarations`.
pub fn small_page_style(declarations: &str) -> ElementStyle {
    let mut s = style(declarations);
    s.page_size = Some(PageSize::Custom {
        width: PAGE_WIDTH,
        height: PAGE_HEIGHT,
    });
    s
}

pub fn document() -> (DocumentTree, NodeId) {
    let mut tree = DocumentTree::new();
    let root = tree.add_root(NodeKind::Document, ElementStyle::default());
    (tree, root)
}

pub fn page(tree: &mut DocumentTree, doc: NodeId, declarations: &str) -> NodeId {
    tree.append(doc, NodeKind::Page(PageTemplates::default()), small_page_style(declarations))
}

pub fn page_with(tree: &mut DocumentTree, doc: NodeId, templates: PageTemplates, declarations: &str) -> NodeId {
    tree.append(doc, NodeKind::Page(templates), small_page_style(declarations))
}

pub fn panel(tree: &mut DocumentTree, parent: NodeId, declarations: &str) -> NodeId {
    tree.append(parent, NodeKind::Panel, style(declarations))
}

/// An empty panel of fixed height spanning its container.
pub fn block(tree: &mut DocumentTree, parent: NodeId, height: f32) -> NodeId {
    panel(tree, parent, &format!("height: {}pt; fill-width: true", height))
}

pub fn text(tree: &mut DocumentTree, parent: NodeId, content: &str, declarations: &str) -> NodeId {
    tree.append(parent, NodeKind::text(content), style(declarations))
}

/// A header/footer template: a full-width panel holding one block of `height`.
pub fn band(height: f32) -> TemplateRef {
    TemplateRef::from_fn(move |_| {
        let mut tree = DocumentTree::new();
        let root = tree.add_root(NodeKind::Panel, style("fill-width: true"));
        block(&mut tree, root, height);
        Ok(tree)
    })
}

pub fn run_layout(tree: &mut DocumentTree) -> Result<DocumentLayout, LayoutError> {
    run_layout_with(tree, LayoutConfig::default())
}

pub fn run_layout_with(tree: &mut DocumentTree, config: LayoutConfig) -> Result<DocumentLayout, LayoutError> {
    init_logger();
    let root = tree
        .root()
        .ok_or_else(|| LayoutError::Generic("test tree has no root".into()))?;
    let mut metrics = FixedMetrics::default();
    let mut ctx = LayoutContext::new(&config, &CascadeResolver, &mut metrics);
    let layout = DocumentDriver::new(tree, root)?.run(&mut ctx)?;
    drop(ctx);
    assert_eq!(metrics.open_scopes(), 0, "every measurement scope should be released");
    Ok(layout)
}

/// Border rect of `id` on `page`.
pub fn border_on(tree: &DocumentTree, id: NodeId, page: usize) -> Rect {
    tree.node(id)
        .arrangement_on(page)
        .map(|a| a.border_rect)
        .unwrap_or_else(|| panic!("{} has no arrangement on page {}", id, page))
}

/// Pages `id` was arranged on, in order.
pub fn pages_of(tree: &DocumentTree, id: NodeId) -> Vec<usize> {
    tree.arrangements(id).iter().map(|a| a.page_index).collect()
}
