//! FILENAME: core/merge-engine/src/pivot.rs
//! Pivot Layout - hierarchical header axes with subtotals.
//!
//! A pivot axis is a flattened tree: detail rows interleaved with subtotal
//! rows and a grand total. Each row/column carries a total level:
//! - `-1` for detail rows (every field of the axis is fixed),
//! - `k` for a total over everything below the first `k` fields,
//! - `0` for the grand total.
//!
//! Header merges are not precomputed. They are discovered by scanning for
//! equal labels around the requested cell, so they always reflect the
//! current labels and visibility.

use serde::{Deserialize, Serialize};

use engine::{Axis, CellRange, Column, Grid, GridPanel, PanelKind, Row};

use crate::collapse::{self, Orientation};
use crate::definition::{AllowMerging, PivotSettings};
use crate::logging::{log_debug, CAT_LAYOUT};

// ============================================================================
// PIVOT KEYS
// ============================================================================

/// The field values that identify one row or column of a pivot axis.
/// Totals fix only a prefix of the axis fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotKey {
    pub values: Vec<String>,
}

impl PivotKey {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PivotKey {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn grand_total() -> Self {
        PivotKey { values: Vec::new() }
    }

    /// Total level of this key on an axis with `field_count` fields.
    pub fn level(&self, field_count: usize) -> i32 {
        if self.values.len() >= field_count {
            -1
        } else {
            self.values.len() as i32
        }
    }
}

// ============================================================================
// PIVOT LAYOUT
// ============================================================================

#[derive(Debug, Clone)]
pub struct PivotLayout {
    settings: PivotSettings,
}

impl PivotLayout {
    pub fn new(settings: PivotSettings) -> Self {
        PivotLayout { settings }
    }

    pub fn settings(&self) -> &PivotSettings {
        &self.settings
    }

    /// Changes which panels use value-equality merging.
    pub fn set_allow_merging(&mut self, allow_merging: AllowMerging) {
        self.settings.allow_merging = allow_merging;
    }

    pub fn row_field_count(&self) -> usize {
        self.settings.row_field_count
    }

    pub fn column_field_count(&self) -> usize {
        self.settings.column_field_count
    }

    pub fn totals_before_data(&self) -> bool {
        self.settings.totals_before_data
    }

    /// Label of header cell `field` for a key.
    fn header_label<'a>(&'a self, key: &'a PivotKey, field: usize) -> &'a str {
        match key.values.get(field) {
            Some(value) => value,
            None if key.values.is_empty() => &self.settings.grand_total_label,
            None => &self.settings.total_label,
        }
    }

    /// Recreates the data rows and row header panel from ordered row keys.
    pub fn bind_row_keys(&self, grid: &mut Grid, keys: &[PivotKey]) {
        let fields = self.row_field_count();
        let header_columns = fields.max(1);

        grid.row_header_columns.defer_update(|columns| {
            columns.clear();
            columns.extend(vec![Column::new(); header_columns]);
        });
        grid.rows.defer_update(|rows| {
            rows.clear();
            rows.extend(keys.iter().map(|key| Row::new().with_level(key.level(fields))));
        });

        grid.clear_values(PanelKind::RowHeader);
        for (r, key) in keys.iter().enumerate() {
            for c in 0..header_columns {
                let label = self.header_label(key, c).to_string();
                grid.set_value(PanelKind::RowHeader, r as u32, c as u32, label);
            }
        }
        log_debug!(CAT_LAYOUT, "pivot rows bound: keys={} fields={}", keys.len(), fields);
    }

    /// Recreates the data columns and column header panel from ordered
    /// column keys.
    pub fn bind_column_keys(&self, grid: &mut Grid, keys: &[PivotKey]) {
        let fields = self.column_field_count();
        let header_rows = fields.max(1);

        grid.column_header_rows.defer_update(|rows| {
            rows.clear();
            rows.extend(vec![Row::new(); header_rows]);
        });
        grid.columns.defer_update(|columns| {
            columns.clear();
            columns.extend(keys.iter().map(|key| Column::new().with_level(key.level(fields))));
        });

        grid.clear_values(PanelKind::ColumnHeader);
        for (c, key) in keys.iter().enumerate() {
            for r in 0..header_rows {
                let label = self.header_label(key, r).to_string();
                grid.set_value(PanelKind::ColumnHeader, r as u32, c as u32, label);
            }
        }
        log_debug!(CAT_LAYOUT, "pivot columns bound: keys={} fields={}", keys.len(), fields);
    }

    // ========================================================================
    // HEADER MERGES
    // ========================================================================

    /// Merged extent of a row header cell, scanning within `bounds`.
    pub(crate) fn row_header_range(
        &self,
        panel: &GridPanel<'_>,
        r: u32,
        c: u32,
        bounds: CellRange,
    ) -> Option<CellRange> {
        let level = panel.rows().level_of(r);
        let value = panel.value(r, c);
        if value.is_empty() {
            return None;
        }

        if is_total_label(level, c) {
            // total label: merge across the remaining header columns
            let min_col = (level as u32).max(bounds.col);
            let mut c1 = c;
            while c1 > min_col && panel.value(r, c1 - 1).merges_with(value) {
                c1 -= 1;
            }
            let mut c2 = c;
            while c2 < bounds.col2 && panel.value(r, c2 + 1).merges_with(value) {
                c2 += 1;
            }
            return Some(CellRange::new(r, c1, r, c2));
        }

        let mut r1 = r;
        while r1 > bounds.row && same_row_labels(panel, r, r1 - 1, c) {
            r1 -= 1;
        }
        let mut r2 = r;
        while r2 < bounds.row2 && same_row_labels(panel, r, r2 + 1, c) {
            r2 += 1;
        }
        Some(CellRange::new(r1, c, r2, c))
    }

    /// Merged extent of a column header cell, scanning within `bounds`.
    pub(crate) fn column_header_range(
        &self,
        panel: &GridPanel<'_>,
        r: u32,
        c: u32,
        bounds: CellRange,
    ) -> Option<CellRange> {
        let level = panel.columns().level_of(c);
        let value = panel.value(r, c);
        if value.is_empty() {
            return None;
        }

        if is_total_label(level, r) {
            // total label: merge down the remaining header rows
            let min_row = (level as u32).max(bounds.row);
            let mut r1 = r;
            while r1 > min_row && panel.value(r1 - 1, c).merges_with(value) {
                r1 -= 1;
            }
            let mut r2 = r;
            while r2 < bounds.row2 && panel.value(r2 + 1, c).merges_with(value) {
                r2 += 1;
            }
            return Some(CellRange::new(r1, c, r2, c));
        }

        let mut c1 = c;
        while c1 > bounds.col && same_column_labels(panel, c, c1 - 1, r) {
            c1 -= 1;
        }
        let mut c2 = c;
        while c2 < bounds.col2 && same_column_labels(panel, c, c2 + 1, r) {
            c2 += 1;
        }
        Some(CellRange::new(r, c1, r, c2))
    }

    /// The top-left corner is one block, unless its last row shows the row
    /// field names, in which case only the rows above it merge.
    pub(crate) fn top_left_range(&self, panel: &GridPanel<'_>, r: u32) -> Option<CellRange> {
        let full = panel.full_range()?;
        if !self.settings.show_row_field_headers {
            return Some(full);
        }
        if r >= full.row2 {
            return None;
        }
        Some(CellRange::new(0, 0, full.row2 - 1, full.col2))
    }

    // ========================================================================
    // COLLAPSE / EXPAND
    // ========================================================================

    /// The rows hidden/shown by toggling the row header cell `rng`.
    pub fn grouped_rows(&self, rows: &Axis<Row>, rng: CellRange) -> CellRange {
        collapse::grouped_range(rows, rng, Orientation::Rows, self.totals_before_data())
    }

    /// The columns hidden/shown by toggling the column header cell `rng`.
    pub fn grouped_columns(&self, columns: &Axis<Column>, rng: CellRange) -> CellRange {
        collapse::grouped_range(columns, rng, Orientation::Columns, self.totals_before_data())
    }

    pub fn rows_collapsed(&self, rows: &Axis<Row>, rng: CellRange) -> bool {
        collapse::is_collapsed(rows, rng, Orientation::Rows, self.totals_before_data())
    }

    pub fn columns_collapsed(&self, columns: &Axis<Column>, rng: CellRange) -> bool {
        collapse::is_collapsed(columns, rng, Orientation::Columns, self.totals_before_data())
    }

    pub fn set_rows_collapsed(&self, rows: &mut Axis<Row>, rng: CellRange, collapsed: bool) {
        collapse::set_collapsed(rows, rng, Orientation::Rows, self.totals_before_data(), collapsed);
    }

    pub fn set_columns_collapsed(&self, columns: &mut Axis<Column>, rng: CellRange, collapsed: bool) {
        collapse::set_collapsed(
            columns,
            rng,
            Orientation::Columns,
            self.totals_before_data(),
            collapsed,
        );
    }

    /// Shows only the totals at `level` and above; `level >= row_field_count`
    /// expands everything.
    pub fn collapse_rows_to_level(&self, rows: &mut Axis<Row>, level: i32) {
        collapse::collapse_to_level(rows, level, self.row_field_count());
    }

    /// Column counterpart of `collapse_rows_to_level`.
    pub fn collapse_columns_to_level(&self, columns: &mut Axis<Column>, level: i32) {
        collapse::collapse_to_level(columns, level, self.column_field_count());
    }
}

/// A header cell at `field` shows a total label when its row/column is a
/// total at or above that field.
fn is_total_label(level: i32, field: u32) -> bool {
    level > -1 && field as i64 >= level as i64
}

/// Row `other` continues the vertical run of row `origin` at column `c`
/// when it is not a total label there and every label up to `c` matches.
///
/// Checking all parent columns, not only the one to the left, keeps a child
/// label from merging across a change in any enclosing field: "A" under
/// East/2023 and "A" under West/2023 stay apart even though their immediate
/// parent labels are equal.
fn same_row_labels(panel: &GridPanel<'_>, origin: u32, other: u32, c: u32) -> bool {
    if is_total_label(panel.rows().level_of(other), c) {
        return false;
    }
    (0..=c).all(|k| panel.value(other, k).merges_with(panel.value(origin, k)))
}

/// Column `other` continues the horizontal run of column `origin` at row `r`.
/// Like `same_row_labels`, every parent header row down to `r` must match.
fn same_column_labels(panel: &GridPanel<'_>, origin: u32, other: u32, r: u32) -> bool {
    if is_total_label(panel.columns().level_of(other), r) {
        return false;
    }
    (0..=r).all(|k| panel.value(k, other).merges_with(panel.value(k, origin)))
}
