use super::grid::{ExplicitSize, TableGrid};
use super::strategy::{LeftToRightStrategy, PaginationStart};
use crate::LayoutError;
use crate::arrangement::Arrangement;
use crate::engines::flow::FlowEngine;
use crate::interface::{
    Engine, EngineLink, LayoutArea, LayoutContext, LayoutOutcome, LayoutStatus, PageNegotiator,
    PageSegment, RejectPages,
};
use crate::node_kind::NodeKind;
use crate::style::{ComputedStyle, PositionOptions};
use crate::tree::DocumentTree;
use folio_style::{OverflowAction, PositionMode};
use folio_types::NodeId;
use folio_types::geometry::{Point, Rect, Size};
use std::collections::HashMap;
use std::sync::Arc;

/// Styles resolved for one cell while the grid was built.
#[derive(Debug, Clone)]
struct CellStyles {
    row: Arc<ComputedStyle>,
    cell: Arc<ComputedStyle>,
}

#[derive(Debug, Default)]
struct BuiltTable {
    grid: TableGrid,
    rows: Vec<(NodeId, Arc<ComputedStyle>)>,
    row_heights: Vec<Option<f32>>,
    cells: HashMap<NodeId, CellStyles>,
}

/// Lays out a table node: rows of cells placed on a grid, sized by the
/// left-to-right strategy and split across pages between breakable rows.
pub struct TableEngine<'t> {
    tree: &'t mut DocumentTree,
    root: NodeId,
    last_page: usize,
}

impl<'t> TableEngine<'t> {
    pub fn new(tree: &'t mut DocumentTree, root: NodeId) -> Self {
        Self {
            tree,
            root,
            last_page: 0,
        }
    }

    fn build_grid(&self, ctx: &mut LayoutContext<'_>, available: Size) -> Result<BuiltTable, LayoutError> {
        let mut built = BuiltTable::default();
        for &row_node in self.tree.children(self.root) {
            let node = self.tree.node(row_node);
            if !node.visible {
                continue;
            }
            if !matches!(node.kind, NodeKind::TableRow) {
                return Err(LayoutError::UnsupportedNode {
                    node: row_node,
                    kind: node.kind.as_str(),
                    reason: "a table may only contain rows",
                });
            }
            let row_style = ctx.resolve_full_style(node);
            let row = built.grid.add_row();
            built
                .row_heights
                .push(row_style.height.and_then(|h| h.resolve(available.height)));
            built.rows.push((row_node, row_style.clone()));

            ctx.with_style(row_style.clone(), |ctx| -> Result<(), LayoutError> {
                for &cell_node in self.tree.children(row_node) {
                    let node = self.tree.node(cell_node);
                    if !node.visible {
                        continue;
                    }
                    let NodeKind::TableCell(span) = &node.kind else {
                        return Err(LayoutError::UnsupportedNode {
                            node: cell_node,
                            kind: node.kind.as_str(),
                            reason: "a table row may only contain cells",
                        });
                    };
                    let cell_style = ctx.resolve_full_style(node);
                    let at = built.grid.place(row, cell_node, span.columns, span.rows)?;
                    if let Some(cell) = built.grid.content_mut(at) {
                        cell.explicit = ExplicitSize {
                            width: cell_style.width.and_then(|w| w.resolve(available.width)),
                            height: cell_style.height.and_then(|h| h.resolve(available.height)),
                        };
                    }
                    built.cells.insert(
                        cell_node,
                        CellStyles {
                            row: row_style.clone(),
                            cell: cell_style,
                        },
                    );
                }
                Ok(())
            })?;
        }
        built.grid.close();
        log::debug!(
            "Table {} grid: {} columns x {} rows, {} cells.",
            self.root,
            built.grid.column_count(),
            built.grid.row_count(),
            built.cells.len()
        );
        Ok(built)
    }

    /// Lays a cell's content out with unbounded height, relative to (0, 0).
    /// The location pass later moves it into its slot.
    fn measure_cell(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        cell: NodeId,
        styles: &CellStyles,
        width: f32,
        page_index: usize,
    ) -> Result<Size, LayoutError> {
        let tree = &mut *self.tree;
        let cell_style = styles.cell.clone();
        ctx.with_style(styles.row.clone(), |ctx| {
            ctx.with_style(cell_style.clone(), |ctx| {
                let offered = Size::unbounded_height(width);
                let options = PositionOptions::resolve(&cell_style, offered);
                let area = LayoutArea {
                    page_index,
                    origin: Point::new(
                        options.margins.left + options.padding.left,
                        options.margins.top + options.padding.top,
                    ),
                    available: options.content_available(offered),
                    at_page_top: true,
                };
                let outcome = FlowEngine::new(tree, cell).layout(
                    ctx,
                    &mut RejectPages::new("table cells are measured on one page"),
                    area,
                )?;
                Ok(options.outer_size(options.border_size(outcome.size, offered)))
            })
        })
    }

    fn run(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        parent: &mut dyn PageNegotiator,
        area: LayoutArea,
    ) -> Result<LayoutOutcome, LayoutError> {
        let style = ctx.current_style();
        let mut link = EngineLink::new(style.overflow_split.allows_split(), parent);
        let fixed_width = style.width.map(|_| area.available.width);
        let fixed_height = style
            .height
            .map(|_| area.available.height)
            .filter(|h| h.is_finite());

        let BuiltTable {
            mut grid,
            rows,
            row_heights,
            cells,
        } = self.build_grid(
            ctx,
            Size::new(area.available.width, fixed_height.unwrap_or(f32::INFINITY)),
        )?;

        let mut strategy = LeftToRightStrategy::new(&mut grid, fixed_width, fixed_height)?;
        strategy.harvest_explicit(&row_heights)?;
        strategy.distribute_spanned_explicit();
        strategy.distribute_table_size();
        strategy.measure_cells(area.available.width, |cell, width| {
            let styles = cells.get(&cell.node).ok_or_else(|| {
                LayoutError::Generic(format!("cell {} has no resolved style", cell.node))
            })?;
            self.measure_cell(ctx, cell.node, styles, width, area.page_index)
        })?;
        strategy.reconcile();

        let total_width = strategy.total_width();
        let total_height: f32 = strategy.row_heights().iter().sum();
        let at_page_top = area.at_page_top;
        // An explicit height only sizes the rows; they still break where the page body ends.
        let room = match (fixed_height, ctx.pages().body_rect(area.page_index)) {
            (Some(_), Some(body)) if link.parent_can_split() => (body.bottom() - area.origin.y).max(0.0),
            _ => area.available.height,
        };
        let overflows = total_height > room + ctx.config.fit_tolerance;
        if overflows && !link.component_splits() && link.parent_can_split() && !at_page_top {
            log::debug!("Table {} refuses to split; asking to be moved whole.", self.root);
            self.tree.clear_descendants(self.root);
            return Ok(LayoutOutcome {
                size: Size::new(total_width, total_height),
                segments: Vec::new(),
                last_page: area.page_index,
                status: LayoutStatus::Relocate,
            });
        }

        let pagination = strategy.paginate(
            ctx,
            &mut link,
            PaginationStart {
                page_index: area.page_index,
                origin_y: area.origin.y,
                available_height: room,
                at_page_top,
                tolerance: ctx.config.fit_tolerance,
                may_request: style.overflow == OverflowAction::NewPage,
            },
        )?;
        let placements = strategy.locate(area.origin.x, &pagination);

        for ((row_node, row_style), placement) in rows.iter().zip(&placements) {
            let rect = Rect::new(area.origin.x, placement.y, total_width, placement.height);
            let mut arrangement = Arrangement::from_border_rect(
                placement.page_index,
                rect,
                row_style.clone(),
                PositionMode::Flow,
            );
            if !placement.display {
                arrangement = arrangement.hidden();
            }
            self.tree.push_arrangement(*row_node, arrangement);
        }

        for cell in grid.contents() {
            let (Some(slot), Some(styles)) = (cell.actual, cells.get(&cell.node)) else {
                continue;
            };
            let margins = styles.cell.margin;
            let border = slot.deflate(margins.top, margins.right, margins.bottom, margins.left);
            let mut arrangement = Arrangement::from_border_rect(
                cell.page_index,
                border,
                styles.cell.clone(),
                PositionMode::Flow,
            );
            let content: Vec<NodeId> = self.tree.children(cell.node).to_vec();
            for child in content {
                self.tree.translate_subtree(child, slot.x, slot.y, cell.page_index);
                if !cell.display {
                    self.tree.hide_subtree(child);
                }
            }
            if !cell.display {
                arrangement = arrangement.hidden();
            }
            self.tree.push_arrangement(cell.node, arrangement);
        }

        let segments: Vec<PageSegment> = pagination
            .segments
            .iter()
            .map(|s| PageSegment {
                page_index: s.page_index,
                origin: Point::new(area.origin.x, s.origin_y),
                size: Size::new(total_width, s.height),
            })
            .collect();
        let last_page = segments.last().map_or(area.page_index, |s| s.page_index);
        self.last_page = last_page;
        log::debug!(
            "Table {} laid out on pages {}..={} ({} segments).",
            self.root,
            segments.first().map_or(last_page, |s| s.page_index),
            last_page,
            segments.len()
        );
        Ok(LayoutOutcome {
            size: Size::new(total_width, segments.last().map_or(0.0, |s| s.size.height)),
            segments,
            last_page,
            status: match pagination.hidden_from {
                // Truncated rows end only this table; the parent flow carries on.
                Some(_) if style.overflow != OverflowAction::Truncate => LayoutStatus::Halted,
                _ => LayoutStatus::Complete,
            },
        })
    }
}

impl Engine for TableEngine<'_> {
    fn layout(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        parent: &mut dyn PageNegotiator,
        area: LayoutArea,
    ) -> Result<LayoutOutcome, LayoutError> {
        let table = self.root;
        ctx.with_measure_scope(table, |ctx| self.run(ctx, parent, area))
            .map_err(|source| LayoutError::Table {
                table,
                source: Box::new(source),
            })
    }

    fn last_page_index(&self) -> usize {
        self.last_page
    }
}
