//! FILENAME: core/merge-engine/tests/test_merge.rs
//! PURPOSE: Tests for merge range resolution on multi-row and pivot grids.

mod common;

use common::{key, TestHarness};
use engine::{CellRange, PanelKind, Row};
use merge_engine::{AllowMerging, BindingColumn, MergeStrategy, MultiRowOptions};

/// Asserts that no merge in any panel crosses the frozen seams.
fn assert_respects_frozen(h: &TestHarness) {
    for kind in PanelKind::ALL {
        let panel = h.grid.panel(kind);
        let (fr, fc) = (panel.frozen_rows(), panel.frozen_columns());
        for r in 0..panel.row_count() {
            for c in 0..panel.col_count() {
                if let Some(rng) = h.manager.merged_range(&panel, r, c) {
                    assert!(rng.contains(r, c), "{:?} ({}, {}) -> {}", kind, r, c, rng);
                    assert!(!(rng.row < fr && fr <= rng.row2), "{:?} {} crosses row seam", kind, rng);
                    assert!(!(rng.col < fc && fc <= rng.col2), "{:?} {} crosses col seam", kind, rng);
                }
            }
        }
    }
}

// ============================================================================
// STATIC (MULTI-ROW) POLICY
// ============================================================================

#[test]
fn test_static_cell_merges() {
    let h = TestHarness::with_orders(2);
    let merged = |r, c| h.merged(PanelKind::Cell, r, c);

    assert_eq!(merged(0, 0), Some(CellRange::new(0, 0, 0, 1)));
    assert_eq!(merged(2, 0), Some(CellRange::new(1, 0, 2, 0)));
    assert_eq!(merged(1, 1), Some(CellRange::new(1, 1, 2, 1)));
    assert_eq!(merged(1, 2), None);
    assert_eq!(merged(0, 3), Some(CellRange::new(0, 3, 2, 3)));
    assert_eq!(merged(4, 3), Some(CellRange::new(3, 3, 5, 3)));
}

#[test]
fn test_static_merges_are_symmetric() {
    let h = TestHarness::with_orders(3);
    for kind in [PanelKind::Cell, PanelKind::ColumnHeader, PanelKind::RowHeader] {
        let panel = h.grid.panel(kind);
        for r in 0..panel.row_count() {
            for c in 0..panel.col_count() {
                let Some(rng) = h.merged(kind, r, c) else { continue };
                for rr in rng.rows() {
                    for cc in rng.cols() {
                        assert_eq!(h.merged(kind, rr, cc), Some(rng), "{:?} ({}, {})", kind, rr, cc);
                    }
                }
            }
        }
    }
}

#[test]
fn test_static_headers() {
    let h = TestHarness::with_orders(2);

    assert_eq!(h.merged(PanelKind::ColumnHeader, 0, 1), Some(CellRange::new(0, 0, 0, 1)));
    assert_eq!(h.merged(PanelKind::ColumnHeader, 1, 0), Some(CellRange::new(1, 0, 2, 0)));
    assert_eq!(h.merged(PanelKind::ColumnHeader, 1, 2), None);

    // one row header block per item
    assert_eq!(h.merged(PanelKind::RowHeader, 1, 0), Some(CellRange::new(0, 0, 2, 0)));
    assert_eq!(h.merged(PanelKind::RowHeader, 5, 0), Some(CellRange::new(3, 0, 5, 0)));

    assert_eq!(h.merged(PanelKind::TopLeft, 2, 0), Some(CellRange::new(0, 0, 2, 0)));
}

#[test]
fn test_static_collapsed_headers() {
    let mut h = TestHarness::with_orders(1);
    if let MergeStrategy::Static(layout) = h.manager.strategy_mut() {
        layout.set_collapsed_headers(true, &mut h.grid.column_header_rows);
    }
    assert_eq!(h.grid.column_header_rows.len(), 1);

    assert_eq!(h.merged(PanelKind::ColumnHeader, 0, 0), Some(CellRange::new(0, 0, 0, 1)));
    assert_eq!(h.merged(PanelKind::ColumnHeader, 0, 1), Some(CellRange::new(0, 0, 0, 1)));
    assert_eq!(h.merged(PanelKind::ColumnHeader, 0, 2), None);

    let headers = h.grid.panel(PanelKind::ColumnHeader);
    match h.manager.binding_column(&headers, 0, 2) {
        Some(BindingColumn::Group(group)) => assert_eq!(group.header(), "Customer"),
        other => panic!("expected group binding, got {:?}", other),
    }
}

#[test]
fn test_static_group_rows_use_base_policy() {
    let mut h = TestHarness::with_orders(1);
    if let Some(layout) = h.manager.multi_row_layout() {
        layout.insert_group_row(&mut h.grid.rows, 0);
    }

    // columns 0..=2 have no aggregate, column 3 does
    assert_eq!(h.merged(PanelKind::Cell, 3, 1), Some(CellRange::new(3, 0, 3, 2)));
    assert_eq!(h.merged(PanelKind::Cell, 3, 3), None);
    assert_eq!(h.merged(PanelKind::RowHeader, 3, 0), None);
    assert!(h.manager.binding_column(&h.grid.panel(PanelKind::Cell), 3, 0).is_none());
}

#[test]
fn test_static_footer_merges_when_allowed() {
    let options = MultiRowOptions {
        allow_merging: AllowMerging::Cells,
        ..Default::default()
    };
    let mut h = TestHarness::multi_row(&common::orders_layout(), options, 1);
    h.grid.column_footer_rows.push(Row::new().with_merging(true));
    for c in 0..3 {
        h.grid.set_value(PanelKind::ColumnFooter, 0, c, "n/a");
    }
    h.grid.set_value(PanelKind::ColumnFooter, 0, 3, 1250.0);

    assert_eq!(h.merged(PanelKind::ColumnFooter, 0, 2), Some(CellRange::new(0, 0, 0, 2)));
    assert_eq!(h.merged(PanelKind::ColumnFooter, 0, 3), None);

    h.manager.set_allow_merging(AllowMerging::None);
    assert_eq!(h.merged(PanelKind::ColumnFooter, 0, 2), None);
}

#[test]
fn test_static_binding_columns() {
    let h = TestHarness::with_orders(2);
    let cells = h.grid.panel(PanelKind::Cell);
    let header = |r, c| h.manager.binding_column(&cells, r, c).map(|b| b.header().to_string());

    assert_eq!(header(0, 1).as_deref(), Some("id"));
    assert_eq!(header(4, 1).as_deref(), Some("status"));
    assert_eq!(header(5, 2).as_deref(), Some("country"));
    assert_eq!(header(2, 3).as_deref(), Some("amount"));
}

#[test]
fn test_static_frozen_seams() {
    let mut h = TestHarness::with_orders(3);
    h.grid.rows.set_frozen(2);
    h.grid.columns.set_frozen(1);

    assert_eq!(h.merged(PanelKind::Cell, 0, 0), None);
    assert_eq!(h.merged(PanelKind::Cell, 1, 0), None);
    assert_eq!(h.merged(PanelKind::Cell, 0, 3), Some(CellRange::new(0, 3, 1, 3)));
    assert_eq!(h.merged(PanelKind::Cell, 2, 3), None);
    assert_eq!(h.merged(PanelKind::RowHeader, 0, 0), Some(CellRange::new(0, 0, 1, 0)));
    assert_respects_frozen(&h);
}

// ============================================================================
// DYNAMIC (PIVOT) POLICY
// ============================================================================

#[test]
fn test_pivot_equal_labels_merge_down() {
    let h = TestHarness::pivot_rows(1, &[key(&["East"]), key(&["East"]), key(&["West"])], false);

    assert_eq!(h.merged(PanelKind::RowHeader, 0, 0), Some(CellRange::new(0, 0, 1, 0)));
    assert_eq!(h.merged(PanelKind::RowHeader, 1, 0), Some(CellRange::new(0, 0, 1, 0)));
    assert_eq!(h.merged(PanelKind::RowHeader, 2, 0), None);
}

#[test]
fn test_pivot_child_labels_do_not_cross_parents() {
    let h = TestHarness::pivot_rows(2, &[key(&["East", "A"]), key(&["West", "A"])], false);
    assert_eq!(h.merged(PanelKind::RowHeader, 0, 1), None);
    assert_eq!(h.merged(PanelKind::RowHeader, 1, 1), None);
}

#[test]
fn test_pivot_row_headers_totals_after() {
    let h = TestHarness::with_sales_pivot(false);
    let merged = |r, c| h.merged(PanelKind::RowHeader, r, c);

    // region label spans its products and its subtotal
    assert_eq!(merged(1, 0), Some(CellRange::new(0, 0, 2, 0)));
    assert_eq!(merged(3, 0), Some(CellRange::new(3, 0, 4, 0)));
    // subtotal label sits alone in its field column
    assert_eq!(merged(2, 1), None);
    // grand total label spans every header column
    assert_eq!(merged(5, 0), Some(CellRange::new(5, 0, 5, 1)));
    assert_eq!(merged(5, 1), Some(CellRange::new(5, 0, 5, 1)));
    assert_eq!(merged(0, 1), None);
}

#[test]
fn test_pivot_row_headers_totals_before() {
    let h = TestHarness::with_sales_pivot(true);
    let merged = |r, c| h.merged(PanelKind::RowHeader, r, c);

    assert_eq!(merged(0, 1), Some(CellRange::new(0, 0, 0, 1)));
    assert_eq!(merged(2, 0), Some(CellRange::new(1, 0, 3, 0)));
    assert_eq!(merged(5, 0), Some(CellRange::new(4, 0, 5, 0)));
}

#[test]
fn test_pivot_column_headers() {
    let h = TestHarness::with_sales_pivot(false);
    let merged = |r, c| h.merged(PanelKind::ColumnHeader, r, c);

    assert_eq!(merged(0, 1), Some(CellRange::new(0, 0, 0, 2)));
    assert_eq!(merged(0, 4), Some(CellRange::new(0, 3, 0, 4)));
    assert_eq!(merged(1, 2), None);
    assert_eq!(merged(1, 5), Some(CellRange::new(0, 5, 1, 5)));
    assert_eq!(merged(1, 0), None);
}

#[test]
fn test_pivot_top_left_is_one_block() {
    let h = TestHarness::with_sales_pivot(false);
    assert_eq!(h.merged(PanelKind::TopLeft, 1, 1), Some(CellRange::new(0, 0, 1, 1)));
}

#[test]
fn test_pivot_cells_do_not_merge_by_default() {
    let mut h = TestHarness::with_sales_pivot(false);
    h.grid.set_value(PanelKind::Cell, 0, 0, 10.0);
    h.grid.set_value(PanelKind::Cell, 1, 0, 10.0);
    assert_eq!(h.merged(PanelKind::Cell, 0, 0), None);
}

#[test]
fn test_pivot_scan_clipped_to_viewport() {
    let mut h = TestHarness::with_sales_pivot(false);
    h.grid.set_viewport(Some(CellRange::new(1, 0, 5, 5)));

    assert_eq!(h.merged(PanelKind::RowHeader, 2, 0), Some(CellRange::new(1, 0, 2, 0)));
    assert_eq!(h.merged_unclipped(PanelKind::RowHeader, 2, 0), Some(CellRange::new(0, 0, 2, 0)));
    // the top-left corner does not scroll
    assert_eq!(h.merged(PanelKind::TopLeft, 0, 0), Some(CellRange::new(0, 0, 1, 1)));
}

#[test]
fn test_pivot_frozen_seams() {
    let mut h = TestHarness::with_sales_pivot(false);
    h.grid.rows.set_frozen(1);
    h.grid.columns.set_frozen(2);

    assert_eq!(h.merged(PanelKind::RowHeader, 0, 0), None);
    assert_eq!(h.merged(PanelKind::RowHeader, 2, 0), Some(CellRange::new(1, 0, 2, 0)));
    assert_eq!(h.merged(PanelKind::ColumnHeader, 0, 0), Some(CellRange::new(0, 0, 0, 1)));
    assert_eq!(h.merged(PanelKind::ColumnHeader, 0, 2), None);
    assert_respects_frozen(&h);
}

#[test]
fn test_pivot_frozen_rows_with_scrolled_viewport() {
    let keys = vec![key(&["East"]); 10];
    let mut h = TestHarness::pivot_rows(1, &keys, false);
    h.grid.rows.set_frozen(2);
    h.grid.set_viewport(Some(CellRange::new(5, 0, 9, 0)));

    // both frozen rows agree on their block, though neither is in the viewport
    assert_eq!(h.merged(PanelKind::RowHeader, 0, 0), Some(CellRange::new(0, 0, 1, 0)));
    assert_eq!(h.merged(PanelKind::RowHeader, 1, 0), Some(CellRange::new(0, 0, 1, 0)));
    assert_eq!(h.merged(PanelKind::RowHeader, 6, 0), Some(CellRange::new(5, 0, 9, 0)));
    assert_eq!(h.merged_unclipped(PanelKind::RowHeader, 6, 0), Some(CellRange::new(2, 0, 9, 0)));
    assert_respects_frozen(&h);
}

#[test]
fn test_pivot_frozen_columns_with_scrolled_viewport() {
    let mut h = TestHarness::with_sales_pivot(false);
    h.grid.columns.set_frozen(2);
    h.grid.set_viewport(Some(CellRange::new(0, 3, 5, 5)));

    assert_eq!(h.merged(PanelKind::ColumnHeader, 0, 0), Some(CellRange::new(0, 0, 0, 1)));
    assert_eq!(h.merged(PanelKind::ColumnHeader, 0, 1), Some(CellRange::new(0, 0, 0, 1)));
    assert_respects_frozen(&h);
}

#[test]
fn test_pivot_merges_see_hidden_rows() {
    let mut h = TestHarness::with_sales_pivot(false);
    h.set_rows_collapsed(2, 0, true);

    // collapsing changes visibility, not labels
    assert_eq!(h.merged(PanelKind::RowHeader, 2, 0), Some(CellRange::new(0, 0, 2, 0)));
}

#[test]
fn test_out_of_range_lookups_are_none() {
    let h = TestHarness::with_sales_pivot(false);
    assert_eq!(h.merged(PanelKind::RowHeader, 6, 0), None);
    assert_eq!(h.merged(PanelKind::ColumnHeader, 0, 6), None);
    assert_eq!(h.merged(PanelKind::ColumnFooter, 0, 0), None);
}
