//! FILENAME: core/engine/src/panel.rs
//! PURPOSE: Read-only views over one panel of a grid.
//! CONTEXT: A grid is split into panels (cells, headers, footers, the
//! top-left corner). A `GridPanel` borrows the row axis, column axis and
//! values of one panel so merge resolution can run as a pure read.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::axis::{Axis, Column, Row};
use crate::cell::CellValue;
use crate::coord::CellCoord;
use crate::range::CellRange;

/// Sparse values of one panel.
pub type PanelValues = FxHashMap<CellCoord, CellValue>;

static EMPTY: CellValue = CellValue::Empty;

/// The panels a grid is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelKind {
    /// Scrollable data cells.
    Cell,
    /// Column headers above the data cells.
    ColumnHeader,
    /// Row headers left of the data cells.
    RowHeader,
    /// The corner above the row headers.
    TopLeft,
    /// Column footers below the data cells.
    ColumnFooter,
}

impl PanelKind {
    pub const ALL: [PanelKind; 5] = [
        PanelKind::Cell,
        PanelKind::ColumnHeader,
        PanelKind::RowHeader,
        PanelKind::TopLeft,
        PanelKind::ColumnFooter,
    ];

    /// Position of this panel in per-panel storage.
    pub fn index(self) -> usize {
        match self {
            PanelKind::Cell => 0,
            PanelKind::ColumnHeader => 1,
            PanelKind::RowHeader => 2,
            PanelKind::TopLeft => 3,
            PanelKind::ColumnFooter => 4,
        }
    }

    /// Panels whose rows are the data rows (and scroll with them).
    pub fn shares_data_rows(self) -> bool {
        matches!(self, PanelKind::Cell | PanelKind::RowHeader)
    }

    /// Panels whose columns are the data columns (and scroll with them).
    pub fn shares_data_columns(self) -> bool {
        matches!(
            self,
            PanelKind::Cell | PanelKind::ColumnHeader | PanelKind::ColumnFooter
        )
    }
}

/// A borrowed view of one panel.
#[derive(Debug, Clone, Copy)]
pub struct GridPanel<'a> {
    kind: PanelKind,
    rows: &'a Axis<Row>,
    columns: &'a Axis<Column>,
    values: &'a PanelValues,
    /// Visible part of the data cells, in data cell coordinates.
    viewport: Option<CellRange>,
}

impl<'a> GridPanel<'a> {
    pub fn new(
        kind: PanelKind,
        rows: &'a Axis<Row>,
        columns: &'a Axis<Column>,
        values: &'a PanelValues,
        viewport: Option<CellRange>,
    ) -> Self {
        GridPanel { kind, rows, columns, values, viewport }
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn rows(&self) -> &'a Axis<Row> {
        self.rows
    }

    pub fn columns(&self) -> &'a Axis<Column> {
        self.columns
    }

    pub fn row(&self, row: u32) -> Option<&'a Row> {
        self.rows.get(row)
    }

    pub fn column(&self, col: u32) -> Option<&'a Column> {
        self.columns.get(col)
    }

    pub fn row_count(&self) -> u32 {
        self.rows.count()
    }

    pub fn col_count(&self) -> u32 {
        self.columns.count()
    }

    pub fn frozen_rows(&self) -> u32 {
        self.rows.frozen()
    }

    pub fn frozen_columns(&self) -> u32 {
        self.columns.frozen()
    }

    /// Value of a cell; missing cells read as empty.
    pub fn value(&self, row: u32, col: u32) -> &'a CellValue {
        self.values.get(&(row, col)).unwrap_or(&EMPTY)
    }

    /// The whole extent of the panel, None if it has no cells.
    pub fn full_range(&self) -> Option<CellRange> {
        if self.rows.is_empty() || self.columns.is_empty() {
            return None;
        }
        Some(CellRange::new(0, 0, self.row_count() - 1, self.col_count() - 1))
    }

    /// The part of the panel that is currently on screen.
    ///
    /// Panels that scroll with the data rows take the viewport's rows, panels
    /// that scroll with the data columns take its columns; every other
    /// dimension is shown in full.
    pub fn view_range(&self) -> Option<CellRange> {
        let full = self.full_range()?;
        let viewport = match self.viewport {
            Some(viewport) => viewport,
            None => return Some(full),
        };
        let mut view = full;
        if self.kind.shares_data_rows() {
            view.row = viewport.row;
            view.row2 = viewport.row2;
        }
        if self.kind.shares_data_columns() {
            view.col = viewport.col;
            view.col2 = viewport.col2;
        }
        full.intersection(&view)
    }
}
