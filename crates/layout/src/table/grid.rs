//! Occupancy grid for one table.
//!
//! Columns are stored outermost (`columns[c][r]`). A cell spanning several
//! slots owns its top-left slot as [`GridCell::Content`]; every other slot it
//! covers holds a [`GridCell::Spanned`] reference back to that owner.

use crate::LayoutError;
use folio_types::NodeId;
use folio_types::geometry::{Rect, Size};
use itertools::iproduct;

/// Column/row address of a grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub column: usize,
    pub row: usize,
}

/// Explicit sizes declared by a cell's style.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExplicitSize {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentCell {
    pub node: NodeId,
    pub column: usize,
    pub row: usize,
    pub column_span: usize,
    pub row_span: usize,
    pub explicit: ExplicitSize,
    pub measured: Option<Size>,
    /// Final slot rectangle, set by the location pass.
    pub actual: Option<Rect>,
    pub page_index: usize,
    pub display: bool,
}

impl ContentCell {
    pub fn cell_ref(&self) -> CellRef {
        CellRef {
            column: self.column,
            row: self.row,
        }
    }

    pub fn last_column(&self) -> usize {
        self.column + self.column_span - 1
    }

    pub fn last_row(&self) -> usize {
        self.row + self.row_span - 1
    }

    /// Whether this cell's row span straddles the boundary above `row`.
    pub fn straddles(&self, row: usize) -> bool {
        self.row < row && row < self.row + self.row_span
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridCell {
    Content(ContentCell),
    Spanned(CellRef),
    Empty,
}

impl GridCell {
    fn is_free(&self) -> bool {
        matches!(self, GridCell::Empty)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableGrid {
    columns: Vec<Vec<GridCell>>,
    /// Per declared row: the column to start the next placement scan from.
    next_free: Vec<usize>,
    closed: bool,
}

impl TableGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new row and returns its index.
    pub fn add_row(&mut self) -> usize {
        self.next_free.push(0);
        self.next_free.len() - 1
    }

    /// Places a cell first-fit in `row`, scanning right from the row's cursor.
    pub fn place(
        &mut self,
        row: usize,
        node: NodeId,
        column_span: usize,
        row_span: usize,
    ) -> Result<CellRef, LayoutError> {
        let column_span = column_span.max(1);
        let row_span = row_span.max(1);
        while self.next_free.len() <= row {
            self.next_free.push(0);
        }
        let mut column = self.next_free[row];
        while !iproduct!(column..column + column_span, row..row + row_span)
            .all(|(c, r)| self.is_free(c, r))
        {
            column += 1;
        }

        let origin = CellRef { column, row };
        self.set(
            column,
            row,
            GridCell::Content(ContentCell {
                node,
                column,
                row,
                column_span,
                row_span,
                explicit: ExplicitSize::default(),
                measured: None,
                actual: None,
                page_index: 0,
                display: true,
            }),
        )?;
        for (c, r) in iproduct!(column..column + column_span, row..row + row_span) {
            if (c, r) != (column, row) {
                self.set(c, r, GridCell::Spanned(origin))?;
            }
        }
        self.next_free[row] = column + column_span;
        log::trace!("Placed cell {} at {:?} spanning {}x{}.", node, origin, column_span, row_span);
        Ok(origin)
    }

    /// Writes `cell` into an unoccupied slot, growing the grid as needed.
    pub fn set(&mut self, column: usize, row: usize, cell: GridCell) -> Result<(), LayoutError> {
        if !self.is_free(column, row) {
            return Err(LayoutError::CellOccupied { column, row });
        }
        while self.columns.len() <= column {
            self.columns.push(Vec::new());
        }
        let slots = &mut self.columns[column];
        while slots.len() <= row {
            slots.push(GridCell::Empty);
        }
        slots[row] = cell;
        Ok(())
    }

    fn is_free(&self, column: usize, row: usize) -> bool {
        self.cell(column, row).is_none_or(GridCell::is_free)
    }

    /// Pads every column with empty cells so the grid becomes rectangular.
    pub fn close(&mut self) {
        let rows = self.row_count();
        for column in &mut self.columns {
            column.resize(rows, GridCell::Empty);
        }
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Declared rows, or more if a row span reaches past the last declared row.
    pub fn row_count(&self) -> usize {
        let spanned = self.columns.iter().map(Vec::len).max().unwrap_or(0);
        spanned.max(self.next_free.len())
    }

    pub fn column_len(&self, column: usize) -> usize {
        self.columns.get(column).map_or(0, Vec::len)
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&GridCell> {
        self.columns.get(column).and_then(|c| c.get(row))
    }

    pub fn content(&self, at: CellRef) -> Option<&ContentCell> {
        match self.cell(at.column, at.row) {
            Some(GridCell::Content(cell)) => Some(cell),
            _ => None,
        }
    }

    pub fn content_mut(&mut self, at: CellRef) -> Option<&mut ContentCell> {
        match self.columns.get_mut(at.column).and_then(|c| c.get_mut(at.row)) {
            Some(GridCell::Content(cell)) => Some(cell),
            _ => None,
        }
    }

    /// The content cell occupying a slot, following span references.
    pub fn owner_of(&self, column: usize, row: usize) -> Option<&ContentCell> {
        match self.cell(column, row)? {
            GridCell::Content(cell) => Some(cell),
            GridCell::Spanned(origin) => self.content(*origin),
            GridCell::Empty => None,
        }
    }

    /// Content cells in row-major order.
    pub fn contents(&self) -> impl Iterator<Item = &ContentCell> {
        let rows = self.row_count();
        let columns = self.column_count();
        iproduct!(0..rows, 0..columns).filter_map(move |(r, c)| match self.cell(c, r) {
            Some(GridCell::Content(cell)) => Some(cell),
            _ => None,
        })
    }

    pub fn content_refs(&self) -> Vec<CellRef> {
        self.contents().map(ContentCell::cell_ref).collect()
    }

    /// A row is breakable when no row span crosses its top edge.
    pub fn is_breakable(&self, row: usize) -> bool {
        row == 0 || !self.contents().any(|cell| cell.straddles(row))
    }

    /// The nearest breakable row at or above `row`.
    pub fn first_breakable_row_before(&self, row: usize) -> usize {
        (0..=row).rev().find(|r| self.is_breakable(*r)).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn id(n: usize) -> NodeId {
        NodeId::new(n)
    }

    #[test]
    fn test_single_span_cells_get_distinct_slots() {
        let mut grid = TableGrid::new();
        let mut n = 0;
        for _ in 0..3 {
            let row = grid.add_row();
            for _ in 0..4 {
                grid.place(row, id(n), 1, 1).unwrap();
                n += 1;
            }
        }
        grid.close();
        let slots: HashSet<_> = grid.contents().map(|c| (c.column, c.row)).collect();
        assert_eq!(slots.len(), 12);
        assert_eq!(grid.contents().count(), 12);
    }

    #[test]
    fn test_row_span_pushes_later_rows_right() {
        let mut grid = TableGrid::new();
        let r0 = grid.add_row();
        grid.place(r0, id(0), 1, 2).unwrap();
        grid.place(r0, id(1), 1, 1).unwrap();
        let r1 = grid.add_row();
        let placed = grid.place(r1, id(2), 1, 1).unwrap();
        assert_eq!(placed, CellRef { column: 1, row: 1 });
        assert_eq!(grid.cell(0, 1), Some(&GridCell::Spanned(CellRef { column: 0, row: 0 })));
        assert_eq!(grid.owner_of(0, 1).map(|c| c.node), Some(id(0)));
    }

    #[test]
    fn test_close_makes_grid_rectangular() {
        let mut grid = TableGrid::new();
        let r0 = grid.add_row();
        grid.place(r0, id(0), 3, 1).unwrap();
        let r1 = grid.add_row();
        grid.place(r1, id(1), 1, 1).unwrap();
        let r2 = grid.add_row();
        grid.place(r2, id(2), 2, 1).unwrap();
        grid.close();
        assert!(grid.is_closed());
        let lens: HashSet<_> = (0..grid.column_count()).map(|c| grid.column_len(c)).collect();
        assert_eq!(lens, HashSet::from([3]));
        assert_eq!(grid.cell(2, 1), Some(&GridCell::Empty));
    }

    #[test]
    fn test_setting_occupied_slot_fails() {
        let mut grid = TableGrid::new();
        let r0 = grid.add_row();
        grid.place(r0, id(0), 2, 1).unwrap();
        let err = grid.set(1, 0, GridCell::Empty).unwrap_err();
        assert!(matches!(err, LayoutError::CellOccupied { column: 1, row: 0 }));
    }

    #[test]
    fn test_breakable_row_skips_active_row_span() {
        let mut grid = TableGrid::new();
        for r in 0..5 {
            let row = grid.add_row();
            let span = if r == 2 { 2 } else { 1 };
            grid.place(row, id(r * 2), 1, span).unwrap();
            grid.place(row, id(r * 2 + 1), 1, 1).unwrap();
        }
        grid.close();
        assert!(!grid.is_breakable(3));
        let row = grid.first_breakable_row_before(3);
        assert!(row <= 2);
        for candidate in 0..grid.row_count() {
            let found = grid.first_breakable_row_before(candidate);
            assert!(!grid.contents().any(|c| c.straddles(found)));
        }
    }
}
