//! Table layout: grid construction, sizing strategy and the table engine.

pub mod axis;
pub mod engine;
pub mod grid;
pub mod strategy;

pub use axis::GridAxis;
pub use engine::TableEngine;
pub use grid::{CellRef, ContentCell, ExplicitSize, GridCell, TableGrid};
pub use strategy::{LeftToRightStrategy, PaginationStart, RowPagination, RowPlacement, TableSegment};
