//! Left-to-right sizing and row pagination over a closed [`TableGrid`].
//!
//! The strategy runs in fixed steps: harvest explicit sizes, distribute
//! explicit span sizes, distribute the table's own size, measure cells,
//! reconcile, paginate rows, and finally locate every cell.

use super::axis::GridAxis;
use super::grid::{ContentCell, TableGrid};
use crate::LayoutError;
use crate::interface::{LayoutContext, Negotiation, PageNegotiator, PageRequest};
use folio_types::geometry::{Rect, Size};

/// Where the table's first row starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginationStart {
    pub page_index: usize,
    pub origin_y: f32,
    pub available_height: f32,
    pub at_page_top: bool,
    pub tolerance: f32,
    /// Whether the table's overflow policy lets it ask for pages at all.
    pub may_request: bool,
}

/// The rows that landed on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSegment {
    pub page_index: usize,
    pub origin_y: f32,
    pub first_row: usize,
    /// Exclusive.
    pub end_row: usize,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowPagination {
    pub segments: Vec<TableSegment>,
    pub row_pages: Vec<usize>,
    /// First row hidden after a refused page request.
    pub hidden_from: Option<usize>,
}

impl RowPagination {
    pub fn is_row_displayed(&self, row: usize) -> bool {
        self.hidden_from.is_none_or(|h| row < h)
    }
}

/// Final placement of one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    pub page_index: usize,
    pub y: f32,
    pub height: f32,
    pub display: bool,
}

pub struct LeftToRightStrategy<'g> {
    grid: &'g mut TableGrid,
    columns: GridAxis,
    rows: GridAxis,
    fixed_width: Option<f32>,
    fixed_height: Option<f32>,
    widths: Vec<f32>,
    heights: Vec<f32>,
}

impl<'g> LeftToRightStrategy<'g> {
    pub fn new(
        grid: &'g mut TableGrid,
        fixed_width: Option<f32>,
        fixed_height: Option<f32>,
    ) -> Result<Self, LayoutError> {
        if !grid.is_closed() {
            return Err(LayoutError::GridNotClosed);
        }
        let columns = GridAxis::new("column", grid.column_count());
        let rows = GridAxis::new("row", grid.row_count());
        Ok(Self {
            grid,
            columns,
            rows,
            fixed_width,
            fixed_height,
            widths: Vec::new(),
            heights: Vec::new(),
        })
    }

    pub fn grid(&self) -> &TableGrid {
        &*self.grid
    }

    pub fn columns(&self) -> &GridAxis {
        &self.columns
    }

    pub fn rows(&self) -> &GridAxis {
        &self.rows
    }

    pub fn column_widths(&self) -> &[f32] {
        &self.widths
    }

    pub fn row_heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn total_width(&self) -> f32 {
        self.widths.iter().sum()
    }

    /// Step 1. Single-span explicit sizes, plus explicit heights declared on rows.
    pub fn harvest_explicit(&mut self, row_heights: &[Option<f32>]) -> Result<(), LayoutError> {
        for cell in self.grid.contents() {
            if cell.column_span == 1 {
                if let Some(width) = cell.explicit.width {
                    self.columns.set_explicit(cell.column, width)?;
                }
            }
            if cell.row_span == 1 {
                if let Some(height) = cell.explicit.height {
                    self.rows.set_explicit(cell.row, height)?;
                }
            }
        }
        for (row, height) in row_heights.iter().enumerate() {
            if let Some(height) = height {
                if row < self.rows.len() {
                    self.rows.set_explicit(row, *height)?;
                }
            }
        }
        self.columns.lock_explicit();
        self.rows.lock_explicit();
        Ok(())
    }

    /// Step 2. Explicit sizes of spanning cells.
    pub fn distribute_spanned_explicit(&mut self) {
        let spans: Vec<_> = self
            .grid
            .contents()
            .map(|c| (c.column, c.column_span, c.explicit.width, c.row, c.row_span, c.explicit.height))
            .collect();
        for (column, column_span, width, row, row_span, height) in spans {
            if let (true, Some(width)) = (column_span > 1, width) {
                distribute_span(&mut self.columns, column, column_span, width);
            }
            if let (true, Some(height)) = (row_span > 1, height) {
                distribute_span(&mut self.rows, row, row_span, height);
            }
        }
    }

    /// Step 3. The table's own explicit size goes to the tracks still unsized.
    pub fn distribute_table_size(&mut self) {
        if let Some(width) = self.fixed_width {
            fill_unsized(&mut self.columns, width);
        }
        if let Some(height) = self.fixed_height {
            fill_unsized(&mut self.rows, height);
        }
    }

    /// Step 4. Measures every content cell at the width its columns allot.
    /// Unsized columns share whatever `available_width` the sized ones leave.
    pub fn measure_cells<F>(&mut self, available_width: f32, mut measure: F) -> Result<(), LayoutError>
    where
        F: FnMut(&ContentCell, f32) -> Result<Size, LayoutError>,
    {
        let open = self.columns.unsized_indices().len();
        let share = if open == 0 {
            0.0
        } else {
            (available_width - self.columns.total_allotted()).max(0.0) / open as f32
        };
        for at in self.grid.content_refs() {
            let Some(cell) = self.grid.content(at) else {
                continue;
            };
            let width: f32 = (cell.column..=cell.last_column())
                .map(|c| self.columns.allotted(c).unwrap_or(share))
                .sum();
            let size = measure(cell, width)?;
            if let Some(cell) = self.grid.content_mut(at) {
                cell.measured = Some(size);
            }
        }
        Ok(())
    }

    /// Step 5. Settles final column widths and row heights.
    pub fn reconcile(&mut self) {
        let mut column_spans = Vec::new();
        let mut row_spans = Vec::new();
        for cell in self.grid.contents() {
            let Some(size) = cell.measured else { continue };
            if cell.column_span == 1 {
                self.columns.grow_measured(cell.column, size.width);
            } else {
                column_spans.push((cell.column, cell.column_span, size.width));
            }
            if cell.row_span == 1 {
                self.rows.grow_measured(cell.row, size.height);
            } else {
                row_spans.push((cell.row, cell.row_span, size.height));
            }
        }
        let fixed_width = self.fixed_width.is_some();
        let fixed_height = self.fixed_height.is_some();
        infer_span_terminals(&mut self.columns, column_spans, fixed_width);
        infer_span_terminals(&mut self.rows, row_spans, fixed_height);
        self.widths = (0..self.columns.len())
            .map(|i| resolve_track(&self.columns, i, fixed_width))
            .collect();
        self.heights = (0..self.rows.len())
            .map(|i| resolve_track(&self.rows, i, fixed_height))
            .collect();
        log::debug!("Table sizing: columns {:?}, rows {:?}", self.widths, self.heights);
    }

    /// Step 6. Assigns rows to pages, asking `link` for a page at each break.
    pub fn paginate(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        link: &mut dyn PageNegotiator,
        start: PaginationStart,
    ) -> Result<RowPagination, LayoutError> {
        let count = self.heights.len();
        let mut row_pages = vec![start.page_index; count];
        let mut segments = vec![TableSegment {
            page_index: start.page_index,
            origin_y: start.origin_y,
            first_row: 0,
            end_row: count,
            height: 0.0,
        }];
        let mut hidden_from = None;
        let mut page = start.page_index;
        let mut remaining = start.available_height;
        let mut at_top = start.at_page_top;
        let mut segment_start = 0;
        let mut used = 0.0;
        let mut row = 0;

        while row < count {
            let height = self.heights[row];
            if used + height <= remaining + start.tolerance {
                used += height;
                row_pages[row] = page;
                row += 1;
                continue;
            }

            let break_row = self.grid.first_breakable_row_before(row).max(segment_start);
            if break_row == segment_start && at_top {
                log::debug!("Row {} overflows a segment that already starts at the page top; accepting.", row);
                used += height;
                row_pages[row] = page;
                row += 1;
                continue;
            }

            let grant = if start.may_request && link.can_split_current_component() {
                let rest: f32 = self.heights[break_row..].iter().sum();
                let request = PageRequest::new(page, Size::new(self.total_width(), rest));
                Negotiation::run(link, ctx, request)?
            } else {
                None
            };
            match grant {
                Some(grant) => {
                    if let Some(last) = segments.last_mut() {
                        last.end_row = break_row;
                    }
                    page = grant.page_index;
                    remaining = grant.area.height;
                    at_top = true;
                    segment_start = break_row;
                    used = 0.0;
                    row = break_row;
                    segments.push(TableSegment {
                        page_index: page,
                        origin_y: grant.area.y,
                        first_row: break_row,
                        end_row: count,
                        height: 0.0,
                    });
                }
                None => {
                    log::warn!("Table rows from {} hidden: no page available.", row);
                    hidden_from = Some(row);
                    row_pages[row..].fill(page);
                    break;
                }
            }
        }

        for segment in &mut segments {
            let end = hidden_from.map_or(segment.end_row, |h: usize| h.clamp(segment.first_row, segment.end_row));
            segment.height = self.heights[segment.first_row..end].iter().sum();
        }
        // A table that moved whole to the next page leaves nothing behind.
        segments.retain(|s| s.end_row > s.first_row || s.first_row == 0 && count == 0);
        Ok(RowPagination {
            segments,
            row_pages,
            hidden_from,
        })
    }

    /// Step 7. Computes every content cell's rectangle, page and display flag,
    /// and returns the placement of each row.
    pub fn locate(&mut self, origin_x: f32, pagination: &RowPagination) -> Vec<RowPlacement> {
        let mut rows = Vec::with_capacity(self.heights.len());
        for segment in &pagination.segments {
            let mut y = segment.origin_y;
            for row in segment.first_row..segment.end_row {
                rows.push(RowPlacement {
                    page_index: pagination.row_pages[row],
                    y,
                    height: self.heights[row],
                    display: pagination.is_row_displayed(row),
                });
                y += self.heights[row];
            }
        }

        let column_x: Vec<f32> = self
            .widths
            .iter()
            .scan(origin_x, |x, w| {
                let at = *x;
                *x += w;
                Some(at)
            })
            .collect();
        for at in self.grid.content_refs() {
            let Some(cell) = self.grid.content_mut(at) else {
                continue;
            };
            let Some(placement) = rows.get(cell.row).copied() else {
                continue;
            };
            let last_row = cell.last_row().min(self.heights.len().saturating_sub(1));
            let last_column = cell.last_column().min(self.widths.len().saturating_sub(1));
            let width: f32 = self.widths[cell.column..=last_column].iter().sum();
            let height: f32 = self.heights[cell.row..=last_row].iter().sum();
            cell.actual = Some(Rect::new(column_x[cell.column], placement.y, width, height));
            cell.page_index = placement.page_index;
            cell.display = placement.display;
        }
        rows
    }
}

fn distribute_span(axis: &mut GridAxis, start: usize, span: usize, total: f32) {
    let end = (start + span).min(axis.len());
    if start >= end {
        return;
    }
    let open: Vec<usize> = (start..end).filter(|i| axis.allotted(*i).is_none()).collect();
    let sized: f32 = (start..end).filter_map(|i| axis.allotted(i)).sum();
    let remainder = (total - sized).max(0.0);
    match open.len() {
        1 => axis.set_calculated(open[0], remainder),
        0 => {
            if remainder > 0.0 {
                let last = end - 1;
                let grown = axis.allotted(last).unwrap_or(0.0) + remainder;
                axis.set_calculated(last, grown);
            }
        }
        n => {
            // Several unsized members split the remainder evenly.
            let share = remainder / n as f32;
            for i in open {
                axis.set_calculated(i, share);
            }
        }
    }
}

fn fill_unsized(axis: &mut GridAxis, total: f32) {
    let open = axis.unsized_indices();
    if open.is_empty() {
        return;
    }
    let share = (total - axis.total_allotted()).max(0.0) / open.len() as f32;
    for i in open {
        axis.set_calculated(i, share);
    }
}

fn resolve_track(axis: &GridAxis, index: usize, fixed: bool) -> f32 {
    match axis.allotted(index) {
        Some(allotted) if fixed => allotted,
        Some(allotted) => allotted.max(axis.measured(index).unwrap_or(0.0)),
        None => axis.measured(index).unwrap_or(0.0),
    }
}

/// Spanning cells grow their last track by whatever the others do not cover.
fn infer_span_terminals(axis: &mut GridAxis, mut spans: Vec<(usize, usize, f32)>, fixed: bool) {
    spans.sort_by_key(|(_, span, _)| *span);
    for (start, span, size) in spans {
        let end = (start + span).min(axis.len());
        if start >= end {
            continue;
        }
        let last = end - 1;
        let others: f32 = (start..last).map(|i| resolve_track(axis, i, fixed)).sum();
        let inferred = size - others;
        if inferred > 0.0 {
            axis.grow_measured(last, inferred);
        }
    }
}
