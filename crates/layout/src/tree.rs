//! The node arena that engines lay out.
//!
//! Nodes are stored in a flat `Vec` and addressed by [`NodeId`]. Children are
//! an ordered list owned by the parent; the parent link is a plain handle used
//! for upward queries only.

use crate::arrangement::Arrangement;
use crate::measure::MeasuredContent;
use crate::node_kind::NodeKind;
use folio_style::ElementStyle;
use folio_types::NodeId;

#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub kind: NodeKind,
    pub style: ElementStyle,
    pub visible: bool,
    pub name: Option<String>,
    /// Stylesheet class applied before the node's own declarations.
    pub class: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    arrangements: Vec<Arrangement>,
    measured: Option<MeasuredContent>,
}

impl LayoutNode {
    fn new(kind: NodeKind, style: ElementStyle, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            style,
            visible: true,
            name: None,
            class: None,
            parent,
            children: Vec::new(),
            arrangements: Vec::new(),
            measured: None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// One arrangement per page the node was laid out on, in page order.
    pub fn arrangements(&self) -> &[Arrangement] {
        &self.arrangements
    }

    pub fn arrangement_on(&self, page_index: usize) -> Option<&Arrangement> {
        self.arrangements.iter().find(|a| a.page_index == page_index)
    }

    pub fn measured(&self) -> Option<&MeasuredContent> {
        self.measured.as_ref()
    }

    pub fn is_displayed(&self) -> bool {
        self.arrangements.iter().any(|a| a.display)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentTree {
    nodes: Vec<LayoutNode>,
    root: Option<NodeId>,
}

impl DocumentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_root(&mut self, kind: NodeKind, style: ElementStyle) -> NodeId {
        let id = self.push(LayoutNode::new(kind, style, None));
        self.root = Some(id);
        id
    }

    pub fn append(&mut self, parent: NodeId, kind: NodeKind, style: ElementStyle) -> NodeId {
        let id = self.push(LayoutNode::new(kind, style, Some(parent)));
        self.nodes[parent.index()].children.push(id);
        id
    }

    fn push(&mut self, node: LayoutNode) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Panics if `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &LayoutNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut LayoutNode {
        &mut self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id.index())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn arrangements(&self, id: NodeId) -> &[Arrangement] {
        &self.nodes[id.index()].arrangements
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name.as_deref() == Some(name))
            .map(NodeId::new)
    }

    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        self.nodes[id.index()].name = Some(name.into());
    }

    /// `id` followed by all its descendants, depth first.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Appends an arrangement, keeping the chain ordered by page.
    pub fn push_arrangement(&mut self, id: NodeId, arrangement: Arrangement) {
        let chain = &mut self.nodes[id.index()].arrangements;
        let at = chain.partition_point(|a| a.page_index <= arrangement.page_index);
        chain.insert(at, arrangement);
    }

    pub fn set_measured(&mut self, id: NodeId, content: MeasuredContent) {
        self.nodes[id.index()].measured = Some(content);
    }

    /// Drops every arrangement and measured block in the tree.
    pub fn clear_arrangements(&mut self) {
        for node in &mut self.nodes {
            node.arrangements.clear();
            node.measured = None;
        }
    }

    pub fn clear_subtree(&mut self, id: NodeId) {
        for node in self.subtree(id) {
            let node = &mut self.nodes[node.index()];
            node.arrangements.clear();
            node.measured = None;
        }
    }

    /// Clears arrangements of `id`'s descendants, keeping `id`'s own.
    pub fn clear_descendants(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.clear_subtree(child);
        }
    }

    /// Moves all arrangements under `id` (inclusive) and reassigns them to `page_index`.
    pub fn translate_subtree(&mut self, id: NodeId, dx: f32, dy: f32, page_index: usize) {
        for node in self.subtree(id) {
            for arrangement in &mut self.nodes[node.index()].arrangements {
                arrangement.shift(dx, dy);
                arrangement.page_index = page_index;
            }
        }
    }

    /// Moves the arrangements under `id` (inclusive) that sit on `page_index`.
    pub fn shift_on_page(&mut self, id: NodeId, page_index: usize, dx: f32, dy: f32) {
        for node in self.subtree(id) {
            for arrangement in &mut self.nodes[node.index()].arrangements {
                if arrangement.page_index == page_index {
                    arrangement.shift(dx, dy);
                }
            }
        }
    }

    /// Marks every arrangement under `id` (inclusive) as not displayed.
    pub fn hide_subtree(&mut self, id: NodeId) {
        for node in self.subtree(id) {
            for arrangement in &mut self.nodes[node.index()].arrangements {
                arrangement.display = false;
            }
        }
    }
}
