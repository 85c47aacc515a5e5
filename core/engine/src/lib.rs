//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the grid model.
//! CONTEXT: Re-exports public types and modules for use by the layout crates.

pub mod axis;
pub mod cell;
pub mod coord;
pub mod grid;
pub mod panel;
pub mod range;

// Re-export commonly used types at the crate root
pub use axis::{Axis, AxisChange, AxisItem, AxisListener, Column, Row, RowKind};
pub use cell::{CellError, CellValue};
pub use coord::{col_to_index, coord_to_a1, index_to_col, CellCoord};
pub use grid::Grid;
pub use panel::{GridPanel, PanelKind, PanelValues};
pub use range::{CellRange, ParseRangeError};
