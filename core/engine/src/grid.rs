//! FILENAME: core/engine/src/grid.rs
//! PURPOSE: Owns the row/column axes and the per-panel values of a grid.
//! CONTEXT: The grid is the single owner of every axis. The data rows are
//! shared by the cell and row-header panels and the data columns by the
//! cell, column-header and column-footer panels, so hiding a data row hides
//! it everywhere at once. Callers get short-lived `GridPanel` views for
//! reading and mutate the axes directly for writing.

use crate::axis::{Axis, Column, Row};
use crate::cell::CellValue;
use crate::panel::{GridPanel, PanelKind, PanelValues};
use crate::range::CellRange;

/// The grid model behind a rendered table.
#[derive(Debug, Default)]
pub struct Grid {
    /// Data rows (cells and row headers).
    pub rows: Axis<Row>,
    /// Data columns (cells, column headers and footers).
    pub columns: Axis<Column>,
    /// Rows of the column header panel (and of the top-left corner).
    pub column_header_rows: Axis<Row>,
    /// Columns of the row header panel (and of the top-left corner).
    pub row_header_columns: Axis<Column>,
    /// Rows of the column footer panel.
    pub column_footer_rows: Axis<Row>,

    /// Sparse values, one map per panel (indexed by `PanelKind::index`).
    values: [PanelValues; 5],

    /// Visible part of the data cells.
    viewport: Option<CellRange>,
}

impl Grid {
    /// Creates a new, empty Grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a cell in the given panel.
    pub fn set_value(&mut self, kind: PanelKind, row: u32, col: u32, value: impl Into<CellValue>) {
        let value = value.into();
        let values = &mut self.values[kind.index()];
        if value.is_empty() {
            values.remove(&(row, col));
        } else {
            values.insert((row, col), value);
        }
    }

    /// Retrieves the value of a cell; missing cells read as empty.
    pub fn value(&self, kind: PanelKind, row: u32, col: u32) -> &CellValue {
        self.panel(kind).value(row, col)
    }

    /// Removes every value of a panel.
    pub fn clear_values(&mut self, kind: PanelKind) {
        self.values[kind.index()].clear();
    }

    pub fn viewport(&self) -> Option<CellRange> {
        self.viewport
    }

    /// Sets the visible part of the data cells (None = everything).
    pub fn set_viewport(&mut self, viewport: Option<CellRange>) {
        self.viewport = viewport;
    }

    /// Returns a read-only view of one panel.
    pub fn panel(&self, kind: PanelKind) -> GridPanel<'_> {
        let (rows, columns) = match kind {
            PanelKind::Cell => (&self.rows, &self.columns),
            PanelKind::ColumnHeader => (&self.column_header_rows, &self.columns),
            PanelKind::RowHeader => (&self.rows, &self.row_header_columns),
            PanelKind::TopLeft => (&self.column_header_rows, &self.row_header_columns),
            PanelKind::ColumnFooter => (&self.column_footer_rows, &self.columns),
        };
        GridPanel::new(kind, rows, columns, &self.values[kind.index()], self.viewport)
    }
}
