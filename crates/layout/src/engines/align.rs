//! Post-layout alignment of flow children inside their containers.
//!
//! Runs once after pagination. Whole subtrees are shifted and inline lines
//! move as a unit, so page assignment never changes.

use crate::node_kind::NodeKind;
use crate::tree::DocumentTree;
use folio_style::{HorizontalAlign, PositionMode, VerticalAlign};
use folio_types::NodeId;
use folio_types::geometry::{EPSILON, Rect};
use itertools::Itertools;

pub struct AlignmentPass;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Line(usize),
    Block(NodeId),
}

#[derive(Debug, Clone, Copy)]
struct FlowItem {
    node: NodeId,
    bounds: Rect,
    group: Group,
}

impl AlignmentPass {
    /// Aligns every container under `root`, parents before children.
    pub fn run(tree: &mut DocumentTree, root: NodeId) {
        for node in tree.subtree(root) {
            if !matches!(
                tree.node(node).kind,
                NodeKind::Page(_) | NodeKind::Section { .. } | NodeKind::Panel | NodeKind::TableCell(_)
            ) {
                continue;
            }
            let targets: Vec<_> = tree
                .arrangements(node)
                .iter()
                .filter(|a| a.display)
                .filter(|a| a.style.h_align != HorizontalAlign::Left || a.style.v_align != VerticalAlign::Top)
                .map(|a| (a.page_index, a.content_rect, a.style.h_align, a.style.v_align))
                .collect();
            for (page, content, h_align, v_align) in targets {
                Self::align_container(tree, node, page, content, h_align, v_align);
            }
        }
    }

    fn align_container(
        tree: &mut DocumentTree,
        container: NodeId,
        page: usize,
        content: Rect,
        h_align: HorizontalAlign,
        v_align: VerticalAlign,
    ) {
        let mut items = Vec::new();
        collect_flow_items(tree, container, page, &mut items);
        if items.is_empty() {
            return;
        }

        let used_bottom = items.iter().map(|i| i.bounds.bottom()).fold(content.y, f32::max);
        let free_height = content.bottom() - used_bottom;
        let dy = match v_align {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Middle => free_height / 2.0,
            VerticalAlign::Bottom => free_height,
        }
        .max(0.0);

        let last_line = items
            .iter()
            .filter_map(|i| match i.group {
                Group::Line(line) => Some(line),
                Group::Block(_) => None,
            })
            .max();
        let mut shifts = Vec::with_capacity(items.len());
        for (key, group) in &items.iter().chunk_by(|item| item.group) {
            let group: Vec<&FlowItem> = group.collect();
            let right = group.iter().map(|i| i.bounds.right()).fold(f32::MIN, f32::max);
            let left = group.iter().map(|i| i.bounds.x).fold(f32::MAX, f32::min);
            let free_width = content.width - (right - left);
            // Justified lines spread the free width between their items; the
            // last line of a container stays left aligned.
            let justify = h_align == HorizontalAlign::Justify
                && group.len() > 1
                && matches!(key, Group::Line(line) if Some(line) != last_line);
            if justify {
                let gap = (content.right() - right).max(0.0) / (group.len() - 1) as f32;
                shifts.extend(group.iter().enumerate().map(|(k, i)| (i.node, gap * k as f32)));
                continue;
            }
            let dx = match h_align {
                HorizontalAlign::Center => content.x + free_width / 2.0 - left,
                HorizontalAlign::Right => content.right() - right,
                HorizontalAlign::Left | HorizontalAlign::Justify => 0.0,
            }
            .max(0.0);
            shifts.extend(group.iter().map(|i| (i.node, dx)));
        }

        for (node, dx) in shifts {
            if dx.abs() > EPSILON || dy.abs() > EPSILON {
                tree.shift_on_page(node, page, dx, dy);
            }
        }
        log::trace!("Aligned {} on page {} ({:?}, {:?}).", container, page, h_align, v_align);
    }
}

/// Displayed flow children of `parent` on `page`, looking through invisible
/// containers.
fn collect_flow_items(tree: &DocumentTree, parent: NodeId, page: usize, out: &mut Vec<FlowItem>) {
    for &child in tree.children(parent) {
        let node = tree.node(child);
        if !node.visible {
            continue;
        }
        if matches!(node.kind, NodeKind::Invisible) {
            collect_flow_items(tree, child, page, out);
            continue;
        }
        let Some(arrangement) = node.arrangement_on(page) else {
            continue;
        };
        if !arrangement.display || arrangement.position != PositionMode::Flow {
            continue;
        }
        out.push(FlowItem {
            node: child,
            bounds: arrangement.bounds,
            group: arrangement.line.map_or(Group::Block(child), Group::Line),
        });
    }
}
