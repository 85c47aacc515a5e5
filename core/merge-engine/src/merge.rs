//! FILENAME: core/merge-engine/src/merge.rs
//! Merge Manager - answers "which merged block covers this cell?".
//!
//! Two strategies share one entry point:
//! - Static: merges come from the cell groups of a multi-row layout and
//!   are read from precomputed tables.
//! - Dynamic: merges come from pivot header labels and are found by
//!   scanning around the requested cell.
//!
//! Both fall back to a base policy for the panels their layout does not
//! own (group rows, footers, pivot data cells), and every result is cut at
//! the frozen row/column seam so a block never straddles the scroll split.

use engine::{CellRange, GridPanel, PanelKind};

use crate::definition::AllowMerging;
use crate::logging::{log_debug, CAT_MERGE};
use crate::multirow::{BindingColumn, MultiRowLayout};
use crate::pivot::PivotLayout;

// ============================================================================
// STRATEGY
// ============================================================================

/// Where merge information comes from.
#[derive(Debug, Clone)]
pub enum MergeStrategy {
    /// Fixed per-item cell layout.
    Static(MultiRowLayout),
    /// Hierarchical pivot headers.
    Dynamic(PivotLayout),
}

#[derive(Debug, Clone)]
pub struct MergeManager {
    strategy: MergeStrategy,
}

impl MergeManager {
    pub fn new(strategy: MergeStrategy) -> Self {
        let manager = MergeManager { strategy };
        log_debug!(
            CAT_MERGE,
            "merge manager: {} allow_merging={:?}",
            match &manager.strategy {
                MergeStrategy::Static(_) => "static",
                MergeStrategy::Dynamic(_) => "dynamic",
            },
            manager.allow_merging()
        );
        manager
    }

    pub fn multi_row(layout: MultiRowLayout) -> Self {
        Self::new(MergeStrategy::Static(layout))
    }

    pub fn pivot(layout: PivotLayout) -> Self {
        Self::new(MergeStrategy::Dynamic(layout))
    }

    pub fn strategy(&self) -> &MergeStrategy {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut MergeStrategy {
        &mut self.strategy
    }

    /// Value-equality merging for panels handled by the base policy, as
    /// configured on the layout.
    pub fn allow_merging(&self) -> AllowMerging {
        match &self.strategy {
            MergeStrategy::Static(layout) => layout.options().allow_merging,
            MergeStrategy::Dynamic(pivot) => pivot.settings().allow_merging,
        }
    }

    pub fn set_allow_merging(&mut self, allow_merging: AllowMerging) {
        match &mut self.strategy {
            MergeStrategy::Static(layout) => layout.set_allow_merging(allow_merging),
            MergeStrategy::Dynamic(pivot) => pivot.set_allow_merging(allow_merging),
        }
    }

    /// The multi-row layout, if this manager uses the static strategy.
    pub fn multi_row_layout(&self) -> Option<&MultiRowLayout> {
        match &self.strategy {
            MergeStrategy::Static(layout) => Some(layout),
            MergeStrategy::Dynamic(_) => None,
        }
    }

    /// The pivot layout, if this manager uses the dynamic strategy.
    pub fn pivot_layout(&self) -> Option<&PivotLayout> {
        match &self.strategy {
            MergeStrategy::Dynamic(pivot) => Some(pivot),
            MergeStrategy::Static(_) => None,
        }
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    /// Merged block covering (r, c), scanning only the visible part of the
    /// panel. Returns None for cells that are not merged.
    pub fn merged_range(&self, panel: &GridPanel<'_>, r: u32, c: u32) -> Option<CellRange> {
        self.resolve_merged_range(panel, r, c, true)
    }

    /// Merged block covering (r, c). With `clip` set, scanning strategies
    /// stop at the edge of the viewport; otherwise they cover the whole
    /// panel. Single-cell results are reported as None.
    pub fn resolve_merged_range(
        &self,
        panel: &GridPanel<'_>,
        r: u32,
        c: u32,
        clip: bool,
    ) -> Option<CellRange> {
        if r >= panel.row_count() || c >= panel.col_count() {
            return None;
        }
        let range = match &self.strategy {
            MergeStrategy::Static(layout) => self.static_range(layout, panel, r, c, clip),
            MergeStrategy::Dynamic(pivot) => self.dynamic_range(pivot, panel, r, c, clip),
        }?;
        let range = clip_to_frozen(panel, range, r, c);
        if range.is_single_cell() {
            None
        } else {
            Some(range)
        }
    }

    /// The layout cell (or group) bound to (r, c). Pivot grids have none.
    pub fn binding_column(&self, panel: &GridPanel<'_>, r: u32, c: u32) -> Option<BindingColumn<'_>> {
        match &self.strategy {
            MergeStrategy::Static(layout) => layout.binding_column(panel, r, c),
            MergeStrategy::Dynamic(_) => None,
        }
    }

    fn static_range(
        &self,
        layout: &MultiRowLayout,
        panel: &GridPanel<'_>,
        r: u32,
        c: u32,
        clip: bool,
    ) -> Option<CellRange> {
        match panel.kind() {
            PanelKind::Cell => {
                if panel.row(r)?.is_group_row() {
                    return self.base_range(panel, r, c, scan_bounds(panel, r, c, clip));
                }
                let range = layout.group_for_column(c)?.merged_range(panel, r, c)?;
                range.intersection(&panel.full_range()?)
            }
            PanelKind::ColumnFooter => self.base_range(panel, r, c, scan_bounds(panel, r, c, clip)),
            PanelKind::ColumnHeader => {
                let group = layout.header_group_for_column(c)?;
                let range = if layout.collapsed_headers() {
                    group.collapsed_header_range()?
                } else {
                    group.merged_range(panel, r, c)?
                };
                range.intersection(&panel.full_range()?)
            }
            PanelKind::RowHeader => {
                // one header block per data item, across every header column
                let row = panel.row(r)?;
                if row.is_group_row() {
                    return None;
                }
                let top = r.checked_sub(row.record_index?)?;
                let bottom = (top + layout.rows_per_item() - 1).min(panel.row_count() - 1);
                Some(CellRange::new(top, 0, bottom, panel.col_count() - 1))
            }
            PanelKind::TopLeft => panel.full_range(),
        }
    }

    fn dynamic_range(
        &self,
        pivot: &PivotLayout,
        panel: &GridPanel<'_>,
        r: u32,
        c: u32,
        clip: bool,
    ) -> Option<CellRange> {
        let bounds = scan_bounds(panel, r, c, clip);
        match panel.kind() {
            PanelKind::RowHeader => pivot.row_header_range(panel, r, c, bounds),
            PanelKind::ColumnHeader => pivot.column_header_range(panel, r, c, bounds),
            PanelKind::TopLeft => pivot.top_left_range(panel, r),
            PanelKind::Cell | PanelKind::ColumnFooter => self.base_range(panel, r, c, bounds),
        }
    }

    // ========================================================================
    // BASE POLICY
    // ========================================================================

    /// Group rows merge their label across non-aggregate columns. Anything
    /// else merges equal neighbours when the panel, row or column allows it.
    fn base_range(&self, panel: &GridPanel<'_>, r: u32, c: u32, bounds: CellRange) -> Option<CellRange> {
        let row = panel.row(r)?;
        if panel.kind() == PanelKind::Cell && row.is_group_row() {
            return group_row_range(panel, r, c, bounds);
        }
        if !self.allow_merging().includes(panel.kind()) {
            return None;
        }
        let value = panel.value(r, c);
        if value.is_empty() {
            return None;
        }

        let mut range = CellRange::single(r, c);
        if row.allow_merging {
            while range.col > bounds.col && panel.value(r, range.col - 1).merges_with(value) {
                range.col -= 1;
            }
            while range.col2 < bounds.col2 && panel.value(r, range.col2 + 1).merges_with(value) {
                range.col2 += 1;
            }
        }
        if range.is_single_cell() && panel.column(c).map_or(false, |col| col.allow_merging) {
            while range.row > bounds.row && panel.value(range.row - 1, c).merges_with(value) {
                range.row -= 1;
            }
            while range.row2 < bounds.row2 && panel.value(range.row2 + 1, c).merges_with(value) {
                range.row2 += 1;
            }
        }
        Some(range)
    }
}

/// A group row spans the run of columns around `c` without aggregates.
fn group_row_range(panel: &GridPanel<'_>, r: u32, c: u32, bounds: CellRange) -> Option<CellRange> {
    let aggregated = |col: u32| panel.column(col).map_or(true, |column| column.has_aggregate);
    if aggregated(c) {
        return None;
    }
    let mut c1 = c;
    while c1 > bounds.col && !aggregated(c1 - 1) {
        c1 -= 1;
    }
    let mut c2 = c;
    while c2 < bounds.col2 && !aggregated(c2 + 1) {
        c2 += 1;
    }
    Some(CellRange::new(r, c1, r, c2))
}

/// Extent a scanning policy may look at: the visible part of the panel when
/// clipping, otherwise the whole panel. Always includes (r, c).
fn scan_bounds(panel: &GridPanel<'_>, r: u32, c: u32, clip: bool) -> CellRange {
    let bounds = if clip { panel.view_range() } else { panel.full_range() };
    let mut bounds = bounds.unwrap_or_else(|| CellRange::single(r, c));
    if clip {
        // frozen cells are always on screen, so their scan covers the whole
        // frozen block whatever the scroll position
        let frozen = panel.frozen_rows().min(panel.row_count());
        if r < frozen {
            bounds.row = 0;
            bounds.row2 = frozen - 1;
        }
        let frozen = panel.frozen_columns().min(panel.col_count());
        if c < frozen {
            bounds.col = 0;
            bounds.col2 = frozen - 1;
        }
    }
    bounds.row = bounds.row.min(r);
    bounds.row2 = bounds.row2.max(r);
    bounds.col = bounds.col.min(c);
    bounds.col2 = bounds.col2.max(c);
    bounds
}

/// Cuts a range at the frozen seam, keeping the side that holds (r, c).
fn clip_to_frozen(panel: &GridPanel<'_>, mut range: CellRange, r: u32, c: u32) -> CellRange {
    let frozen = panel.frozen_rows();
    if frozen > 0 && range.row < frozen && range.row2 >= frozen {
        if r < frozen {
            range.row2 = frozen - 1;
        } else {
            range.row = frozen;
        }
    }
    let frozen = panel.frozen_columns();
    if frozen > 0 && range.col < frozen && range.col2 >= frozen {
        if c < frozen {
            range.col2 = frozen - 1;
        } else {
            range.col = frozen;
        }
    }
    range
}
