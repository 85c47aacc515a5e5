//! FILENAME: core/merge-engine/src/cell_group.rs
//! Cell Groups - per-item column layout.
//!
//! A cell group turns a declarative list of cells (each spanning one or
//! more columns) into a fixed two-dimensional block that repeats for every
//! data item:
//!
//! 1. Cells are placed left to right, wrapping to a new row whenever the
//!    next cell would overflow the group width.
//! 2. The last cell of every row is stretched to fill the row.
//! 3. When the group is closed, its last row is stretched down so the group
//!    is as tall as the tallest group in the layout.
//! 4. Closing also builds the lookup tables used at render time: a dense
//!    table of owning cells and a sparse table of merge extents, both keyed
//!    by `wrap_row * colspan + wrap_col`.

use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

use engine::{CellRange, GridPanel};

use crate::definition::GroupDefinition;
use crate::error::LayoutError;

// ============================================================================
// LAYOUT CELL
// ============================================================================

/// A cell placed inside its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutCell {
    /// Name of the bound field.
    pub binding: String,
    /// Header text.
    pub header: String,
    /// Whether group rows aggregate this field.
    pub aggregate: bool,
    /// Wrap-row inside the group (0-based).
    pub row: u32,
    /// Column inside the group (0-based).
    pub col: u32,
    pub rowspan: u32,
    pub colspan: u32,
}

impl LayoutCell {
    fn is_merged(&self) -> bool {
        self.rowspan > 1 || self.colspan > 1
    }
}

/// Extent of a merged block relative to one of the cells it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeRange {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl RelativeRange {
    /// Converts to an absolute range around the cell at (row, col).
    /// Returns None if the block would start before row/column 0.
    pub fn resolve(&self, row: u32, col: u32) -> Option<CellRange> {
        Some(CellRange::new(
            row.checked_add_signed(self.top)?,
            col.checked_add_signed(self.left)?,
            row.checked_add_signed(self.bottom)?,
            col.checked_add_signed(self.right)?,
        ))
    }
}

// ============================================================================
// CELL GROUP
// ============================================================================

/// Widest layout a definition may describe, in grid columns.
pub const MAX_LAYOUT_COLUMNS: u32 = 16_384;

#[derive(Debug, Clone, PartialEq)]
pub struct CellGroup {
    /// Position of the group in its layout.
    index: usize,
    header: Option<String>,
    cells: Vec<LayoutCell>,
    /// Width in columns.
    colspan: u32,
    /// Height in rows (wrap rows, then padded by `close_group`).
    rowspan: u32,
    /// First grid column covered by the group.
    colstart: u32,
    /// Cell indices of every wrap-row, in placement order.
    row_cells: Vec<SmallVec<[usize; 4]>>,
    /// Owning cell index per offset.
    binding_table: Vec<usize>,
    /// Merge extent per offset, only for cells spanning more than one cell.
    merge_table: FxHashMap<u32, RelativeRange>,
    /// The whole group as one header cell, set when the group is closed.
    collapsed_header_range: Option<CellRange>,
}

impl CellGroup {
    /// Lays out the cells of a group definition.
    pub fn new(index: usize, definition: &GroupDefinition) -> Result<CellGroup, LayoutError> {
        if definition.cells.is_empty() {
            return Err(LayoutError::EmptyGroup { group: index });
        }

        let mut cells = Vec::with_capacity(definition.cells.len());
        for (i, cell) in definition.cells.iter().enumerate() {
            if cell.binding.trim().is_empty() {
                return Err(LayoutError::MissingBinding { group: index, cell: i });
            }
            cells.push(LayoutCell {
                binding: cell.binding.clone(),
                header: cell.header.clone().unwrap_or_else(|| cell.binding.clone()),
                aggregate: cell.aggregate,
                row: 0,
                col: 0,
                rowspan: 1,
                colspan: cell.colspan.unwrap_or(1).max(1),
            });
        }

        let widest = cells.iter().map(|c| c.colspan).max().unwrap_or(1);
        let colspan = definition.colspan.unwrap_or(0).max(widest);
        if colspan > MAX_LAYOUT_COLUMNS {
            return Err(LayoutError::SpanOverflow { group: index });
        }

        let mut row_cells: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new()];
        let (mut r, mut c) = (0u32, 0u32);
        for (i, cell) in cells.iter_mut().enumerate() {
            let fits = c.checked_add(cell.colspan).map_or(false, |end| end <= colspan);
            if !fits {
                r += 1;
                c = 0;
                row_cells.push(SmallVec::new());
            }
            cell.row = r;
            cell.col = c;
            // c + colspan <= group colspan <= MAX_LAYOUT_COLUMNS
            c += cell.colspan;
            row_cells[r as usize].push(i);
        }

        // stretch the last cell of each row to the group width
        for indices in &row_cells {
            if let Some(&last) = indices.last() {
                let cell = &mut cells[last];
                cell.colspan = colspan - cell.col;
            }
        }

        Ok(CellGroup {
            index,
            header: definition.header.clone(),
            cells,
            colspan,
            rowspan: r + 1,
            colstart: 0,
            row_cells,
            binding_table: Vec::new(),
            merge_table: FxHashMap::default(),
            collapsed_header_range: None,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Header text for the collapsed header row.
    pub fn header(&self) -> &str {
        match &self.header {
            Some(header) => header,
            None => &self.cells[0].header,
        }
    }

    pub fn cells(&self) -> &[LayoutCell] {
        &self.cells
    }

    pub fn colspan(&self) -> u32 {
        self.colspan
    }

    pub fn rowspan(&self) -> u32 {
        self.rowspan
    }

    pub fn colstart(&self) -> u32 {
        self.colstart
    }

    pub fn set_colstart(&mut self, colstart: u32) {
        self.colstart = colstart;
        if self.collapsed_header_range.is_some() {
            self.collapsed_header_range = Some(self.full_header_range());
        }
    }

    /// Returns true if grid column `col` belongs to this group.
    pub fn contains_column(&self, col: u32) -> bool {
        col >= self.colstart && col - self.colstart < self.colspan
    }

    pub fn is_closed(&self) -> bool {
        self.collapsed_header_range.is_some()
    }

    /// Pads the group to `rows_per_item` rows and builds the lookup tables.
    pub fn close_group(&mut self, rows_per_item: u32) {
        if rows_per_item > self.rowspan {
            let last_row = (self.rowspan - 1) as usize;
            for &i in &self.row_cells[last_row] {
                let cell = &mut self.cells[i];
                cell.rowspan = rows_per_item - cell.row;
            }
            self.rowspan = rows_per_item;
        }

        let size = (self.rowspan * self.colspan) as usize;
        self.binding_table = vec![usize::MAX; size];
        self.merge_table.clear();

        for (i, cell) in self.cells.iter().enumerate() {
            for dr in 0..cell.rowspan {
                for dc in 0..cell.colspan {
                    let offset = (cell.row + dr) * self.colspan + cell.col + dc;
                    self.binding_table[offset as usize] = i;
                    if cell.is_merged() {
                        self.merge_table.insert(
                            offset,
                            RelativeRange {
                                top: -(dr as i32),
                                left: -(dc as i32),
                                bottom: (cell.rowspan - 1 - dr) as i32,
                                right: (cell.colspan - 1 - dc) as i32,
                            },
                        );
                    }
                }
            }
        }
        debug_assert!(
            self.binding_table.iter().all(|&i| i < self.cells.len()),
            "cell group {} leaves offsets uncovered",
            self.index
        );

        self.collapsed_header_range = Some(self.full_header_range());
    }

    fn full_header_range(&self) -> CellRange {
        let last = self.colstart.saturating_add(self.colspan - 1);
        CellRange::new(0, self.colstart, 0, last)
    }

    /// The whole group as a single header cell (collapsed column headers).
    pub fn collapsed_header_range(&self) -> Option<CellRange> {
        self.collapsed_header_range
    }

    /// Table offset of grid cell (r, c), None if `c` is outside the group.
    fn offset(&self, panel: &GridPanel<'_>, r: u32, c: u32) -> Option<u32> {
        debug_assert!(
            self.contains_column(c),
            "column {} is not part of cell group {}",
            c,
            self.index
        );
        if !self.contains_column(c) || self.rowspan == 0 {
            return None;
        }
        let rs = panel
            .row(r)
            .and_then(|row| row.record_index)
            .unwrap_or(r % self.rowspan);
        if rs >= self.rowspan {
            return None;
        }
        Some(rs * self.colspan + (c - self.colstart))
    }

    /// Merged extent of grid cell (r, c), None if the cell is not merged.
    pub fn merged_range(&self, panel: &GridPanel<'_>, r: u32, c: u32) -> Option<CellRange> {
        let offset = self.offset(panel, r, c)?;
        self.merge_table.get(&offset)?.resolve(r, c)
    }

    /// The layout cell that supplies the data of grid cell (r, c).
    pub fn binding_column(&self, panel: &GridPanel<'_>, r: u32, c: u32) -> Option<&LayoutCell> {
        let offset = self.offset(panel, r, c)?;
        let index = *self.binding_table.get(offset as usize)?;
        self.cells.get(index)
    }

    /// Owning cell index per offset (test and diagnostics access).
    pub fn binding_table(&self) -> &[usize] {
        &self.binding_table
    }
}
