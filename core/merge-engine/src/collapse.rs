//! FILENAME: core/merge-engine/src/collapse.rs
//! Collapse/Expand - hierarchical group visibility on a pivot axis.
//!
//! Toggling a header cell in field column `c` collapses the children of
//! that field: the contiguous run of rows between two totals at level
//! `c + 1`. Where the run starts and ends depends on whether totals render
//! before or after their detail rows.
//!
//! All visibility writes happen inside one deferred update, so listeners see
//! a single notification per operation. Group discovery is a pure read.

use engine::{Axis, AxisItem, CellRange};

use crate::logging::{log_debug, log_warn, CAT_COLLAPSE};

/// Which axis of a range a collapse operation works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Rows,
    Columns,
}

/// A row/column at `level` closes a group whose totals are at `target`.
fn is_boundary(level: i32, target: i32) -> bool {
    level > -1 && level <= target
}

/// First and last index of the group toggled by `rng`, or None when the
/// scan yields an empty run.
fn group_span<T: AxisItem>(
    axis: &Axis<T>,
    rng: CellRange,
    orientation: Orientation,
    totals_before_data: bool,
) -> Option<(u32, u32)> {
    let count = axis.count();
    if count == 0 {
        return None;
    }
    let (position, level) = match orientation {
        Orientation::Rows => (rng.row, rng.col as i32 + 1),
        Orientation::Columns => (rng.col, rng.row as i32 + 1),
    };
    let position = position.min(count - 1);

    let (start, end) = if totals_before_data {
        // opening total above, closing boundary below
        let mut open = position;
        while open > 0 && axis.level_of(open) != level {
            open -= 1;
        }
        let mut close = open + 1;
        while close < count && !is_boundary(axis.level_of(close), level) {
            close += 1;
        }
        (open as i64 + 1, close as i64 - 1)
    } else {
        // closing total below, opening boundary above
        let mut close = position;
        while close < count - 1 && axis.level_of(close) != level {
            close += 1;
        }
        let mut open = close;
        while open > 0 && !is_boundary(axis.level_of(open - 1), level) {
            open -= 1;
        }
        (open as i64, close as i64 - 1)
    };

    if end < start {
        log_warn!(
            CAT_COLLAPSE,
            "empty group around {} ({:?}, level={}, start={}, end={}); ignoring",
            rng,
            orientation,
            level,
            start,
            end
        );
        return None;
    }
    Some((start as u32, end as u32))
}

/// The range of rows (or columns) toggled together with the header cell
/// `rng`. When no group can be found the original range is returned
/// unchanged; callers treat that as a no-op.
pub fn grouped_range<T: AxisItem>(
    axis: &Axis<T>,
    rng: CellRange,
    orientation: Orientation,
    totals_before_data: bool,
) -> CellRange {
    match (group_span(axis, rng, orientation, totals_before_data), orientation) {
        (Some((start, end)), Orientation::Rows) => CellRange::new(start, rng.col, end, rng.col2),
        (Some((start, end)), Orientation::Columns) => CellRange::new(rng.row, start, rng.row2, end),
        (None, _) => rng,
    }
}

/// True when no row/column of the group is visible. A partially collapsed
/// group reports false.
pub fn is_collapsed<T: AxisItem>(
    axis: &Axis<T>,
    rng: CellRange,
    orientation: Orientation,
    totals_before_data: bool,
) -> bool {
    match group_span(axis, rng, orientation, totals_before_data) {
        Some((start, end)) => !(start..=end).any(|i| axis.is_visible(i)),
        None => false,
    }
}

/// Hides (or shows) every row/column of the group in one deferred update.
pub fn set_collapsed<T: AxisItem>(
    axis: &mut Axis<T>,
    rng: CellRange,
    orientation: Orientation,
    totals_before_data: bool,
    collapsed: bool,
) {
    let (start, end) = match group_span(axis, rng, orientation, totals_before_data) {
        Some(span) => span,
        None => return,
    };
    log_debug!(
        CAT_COLLAPSE,
        "{} {:?} {}..={} from {}",
        if collapsed { "collapse" } else { "expand" },
        orientation,
        start,
        end,
        rng
    );
    axis.defer_update(|axis| {
        for i in start..=end {
            axis.set_visible(i, !collapsed);
        }
    });
}

/// Shows only totals at `level` or above (details and deeper totals are
/// hidden). A negative level, or one at or beyond `field_count`, shows
/// everything.
pub fn collapse_to_level<T: AxisItem>(axis: &mut Axis<T>, level: i32, field_count: usize) {
    let level = if level >= field_count as i32 { -1 } else { level };
    log_debug!(CAT_COLLAPSE, "collapse to level {} ({} items)", level, axis.len());
    axis.defer_update(|axis| {
        for i in 0..axis.count() {
            let item_level = axis.level_of(i);
            axis.set_visible(i, level < 0 || is_boundary(item_level, level));
        }
    });
}
