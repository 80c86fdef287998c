use super::page::PageEngine;
use crate::LayoutError;
use crate::interface::{Engine, LayoutArea, LayoutContext, LayoutOutcome, PageNegotiator};
use crate::node_kind::NodeKind;
use crate::tree::DocumentTree;
use folio_types::NodeId;

/// A page engine whose overflow pages use the section's continuation
/// header/footer, falling back to the first-page ones where none is declared.
pub struct SectionEngine<'t> {
    inner: PageEngine<'t>,
}

impl<'t> SectionEngine<'t> {
    pub fn new(tree: &'t mut DocumentTree, root: NodeId) -> Result<Self, LayoutError> {
        let (templates, continuation) = match &tree.node(root).kind {
            NodeKind::Section {
                templates,
                continuation,
            } => (templates.clone(), continuation.clone()),
            other => {
                return Err(LayoutError::UnsupportedNode {
                    node: root,
                    kind: other.as_str(),
                    reason: "section engine needs a section node",
                });
            }
        };
        Ok(Self {
            inner: PageEngine::with_templates(tree, root, templates, Some(continuation)),
        })
    }
}

impl Engine for SectionEngine<'_> {
    fn layout(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        parent: &mut dyn PageNegotiator,
        area: LayoutArea,
    ) -> Result<LayoutOutcome, LayoutError> {
        self.inner.layout(ctx, parent, area)
    }

    fn last_page_index(&self) -> usize {
        self.inner.last_page_index()
    }
}
