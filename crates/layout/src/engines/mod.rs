pub mod align;
pub mod document;
pub mod flow;
pub mod page;
pub mod section;

pub use align::AlignmentPass;
pub use document::{DocumentDriver, DocumentLayout};
pub use flow::FlowEngine;
pub use page::PageEngine;
pub use section::SectionEngine;

use crate::LayoutError;
use crate::interface::Engine;
use crate::node_kind::{Capability, EngineKind};
use crate::table::TableEngine;
use crate::tree::DocumentTree;
use folio_types::NodeId;

/// Builds the engine for a node with a nested-layout capability.
pub fn engine_for<'t>(tree: &'t mut DocumentTree, node: NodeId) -> Result<Box<dyn Engine + 't>, LayoutError> {
    let kind = &tree.node(node).kind;
    let engine = match kind.capability() {
        Capability::NestedLayout(engine) => engine,
        _ => {
            return Err(LayoutError::UnsupportedNode {
                node,
                kind: kind.as_str(),
                reason: "node does not lay out children",
            });
        }
    };
    Ok(match engine {
        EngineKind::Flow => Box::new(FlowEngine::new(tree, node)),
        EngineKind::Table => Box::new(TableEngine::new(tree, node)),
        EngineKind::Page => Box::new(PageEngine::new(tree, node)?),
        EngineKind::Section => Box::new(SectionEngine::new(tree, node)?),
    })
}
