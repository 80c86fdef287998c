use super::align::AlignmentPass;
use super::engine_for;
use crate::LayoutError;
use crate::interface::{LayoutArea, LayoutContext, LayoutStatus, RejectPages};
use crate::node_kind::NodeKind;
use crate::pages::PageInfo;
use crate::tree::DocumentTree;
use folio_types::NodeId;
use folio_types::geometry::{Point, Size};

/// The pages produced by one layout pass, in page order.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    pub pages: Vec<PageInfo>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&PageInfo> {
        self.pages.iter().find(|p| p.index == index)
    }
}

/// Runs the page engines of a document one after another.
pub struct DocumentDriver<'t> {
    tree: &'t mut DocumentTree,
    root: NodeId,
    last_page: Option<usize>,
}

impl<'t> DocumentDriver<'t> {
    pub fn new(tree: &'t mut DocumentTree, root: NodeId) -> Result<Self, LayoutError> {
        let kind = &tree.node(root).kind;
        if !matches!(kind, NodeKind::Document) {
            return Err(LayoutError::UnsupportedNode {
                node: root,
                kind: kind.as_str(),
                reason: "layout must start at a document node",
            });
        }
        Ok(Self {
            tree,
            root,
            last_page: None,
        })
    }

    /// Index of the last page written, if any page was laid out.
    pub fn last_page_index(&self) -> Option<usize> {
        self.last_page
    }

    pub fn run(&mut self, ctx: &mut LayoutContext<'_>) -> Result<DocumentLayout, LayoutError> {
        self.tree.clear_arrangements();
        self.last_page = None;
        ctx.take_pages();

        let style = ctx.resolve_full_style(self.tree.node(self.root));
        ctx.with_style(style, |ctx| -> Result<(), LayoutError> {
            let mut authority = RejectPages::new("only pages and sections grant new pages");
            let children = self.tree.children(self.root).to_vec();
            for child in children {
                let node = self.tree.node(child);
                if !node.visible {
                    continue;
                }
                if !node.kind.is_page_like() {
                    return Err(LayoutError::NotAPage(child));
                }
                let page_style = ctx.resolve_full_style(node);
                let start = self.last_page.map_or(0, |last| last + 1);
                let area = LayoutArea {
                    page_index: start,
                    origin: Point::zero(),
                    available: Size::zero(),
                    at_page_top: true,
                };
                let outcome = ctx.with_style(page_style, |ctx| {
                    engine_for(&mut *self.tree, child)?.layout(ctx, &mut authority, area)
                })?;
                if outcome.status == LayoutStatus::Halted {
                    log::warn!("{} stopped early on page {}; later content was dropped.", child, outcome.last_page);
                }
                self.last_page = Some(outcome.last_page);
            }
            Ok(())
        })?;

        AlignmentPass::run(&mut *self.tree, self.root);
        let mut pages = ctx.take_pages();
        for info in pages.iter_mut() {
            for region in [info.header.as_mut(), info.footer.as_mut()].into_iter().flatten() {
                AlignmentPass::run(&mut region.tree, region.root);
            }
        }
        log::debug!("Document {} laid out on {} pages.", self.root, pages.len());
        Ok(DocumentLayout {
            pages: pages.into_vec(),
        })
    }
}
