//! FILENAME: core/merge-engine/tests/common/mod.rs
//! Test harness and fixtures for merge-engine integration tests.

#![allow(dead_code)]

use engine::{CellRange, Grid, PanelKind};
use merge_engine::{
    CellDefinition, GroupDefinition, LayoutDefinition, MergeManager, MultiRowLayout,
    MultiRowOptions, PivotKey, PivotLayout, PivotSettings,
};

/// A grid together with the merge manager that describes it.
pub struct TestHarness {
    pub grid: Grid,
    pub manager: MergeManager,
}

impl TestHarness {
    /// Multi-row grid bound to `items` data items.
    pub fn multi_row(definition: &LayoutDefinition, options: MultiRowOptions, items: usize) -> Self {
        let layout = MultiRowLayout::new(definition, options).unwrap();
        let mut grid = Grid::new();
        layout.bind_columns(&mut grid.columns);
        layout.bind_header_rows(&mut grid.column_header_rows);
        layout.bind_rows(&mut grid.rows, items);
        grid.row_header_columns.push(engine::Column::new());

        TestHarness {
            grid,
            manager: MergeManager::multi_row(layout),
        }
    }

    /// The orders layout (3 groups, 4 columns, 3 rows per item).
    pub fn with_orders(items: usize) -> Self {
        Self::multi_row(&orders_layout(), MultiRowOptions::default(), items)
    }

    /// Pivot grid with the given row keys and a single "Sales" column.
    pub fn pivot_rows(row_fields: usize, keys: &[PivotKey], totals_before_data: bool) -> Self {
        let mut settings = PivotSettings::new(row_fields, 1);
        settings.totals_before_data = totals_before_data;
        let layout = PivotLayout::new(settings);

        let mut grid = Grid::new();
        layout.bind_row_keys(&mut grid, keys);
        layout.bind_column_keys(&mut grid, &[key(&["Sales"])]);

        TestHarness {
            grid,
            manager: MergeManager::pivot(layout),
        }
    }

    /// Region/Product by Year pivot with subtotals and grand totals on both
    /// axes.
    pub fn with_sales_pivot(totals_before_data: bool) -> Self {
        let mut settings = PivotSettings::new(2, 2);
        settings.totals_before_data = totals_before_data;
        let layout = PivotLayout::new(settings);

        let mut grid = Grid::new();
        layout.bind_row_keys(&mut grid, &region_keys(totals_before_data));
        layout.bind_column_keys(&mut grid, &year_keys(totals_before_data));

        TestHarness {
            grid,
            manager: MergeManager::pivot(layout),
        }
    }

    pub fn pivot(&self) -> &PivotLayout {
        self.manager.pivot_layout().unwrap()
    }

    pub fn layout(&self) -> &MultiRowLayout {
        self.manager.multi_row_layout().unwrap()
    }

    /// Merged range of a cell, clipped to the viewport.
    pub fn merged(&self, kind: PanelKind, r: u32, c: u32) -> Option<CellRange> {
        self.manager.merged_range(&self.grid.panel(kind), r, c)
    }

    /// Merged range of a cell, scanning the whole panel.
    pub fn merged_unclipped(&self, kind: PanelKind, r: u32, c: u32) -> Option<CellRange> {
        self.manager.resolve_merged_range(&self.grid.panel(kind), r, c, false)
    }

    /// Toggles the row group under row header cell (r, c).
    pub fn set_rows_collapsed(&mut self, r: u32, c: u32, collapsed: bool) {
        let pivot = match self.manager.pivot_layout() {
            Some(pivot) => pivot,
            None => panic!("not a pivot harness"),
        };
        pivot.set_rows_collapsed(&mut self.grid.rows, CellRange::single(r, c), collapsed);
    }

    pub fn rows_collapsed(&self, r: u32, c: u32) -> bool {
        self.pivot().rows_collapsed(&self.grid.rows, CellRange::single(r, c))
    }

    pub fn visible_rows(&self) -> Vec<bool> {
        self.grid.rows.iter().map(|r| r.visible).collect()
    }

    pub fn visible_columns(&self) -> Vec<bool> {
        self.grid.columns.iter().map(|c| c.visible).collect()
    }
}

pub fn key(values: &[&str]) -> PivotKey {
    PivotKey::new(values.iter().copied())
}

/// id (2 columns wide) over date/status, customer/city/country stacked,
/// and an aggregated amount.
pub fn orders_layout() -> LayoutDefinition {
    LayoutDefinition::new(vec![
        GroupDefinition::new(vec![
            CellDefinition::new("id").with_colspan(2),
            CellDefinition::new("date"),
            CellDefinition::new("status"),
        ])
        .with_colspan(2)
        .with_header("Order"),
        GroupDefinition::new(vec![
            CellDefinition::new("customer"),
            CellDefinition::new("city"),
            CellDefinition::new("country"),
        ])
        .with_header("Customer"),
        GroupDefinition::new(vec![CellDefinition::new("amount").with_aggregate()]),
    ])
}

/// Region > Product row keys.
///
/// Totals after:  East/A, East/B, East, West/A, West, Grand Total
/// Totals before: Grand Total, East, East/A, East/B, West, West/A
pub fn region_keys(totals_before_data: bool) -> Vec<PivotKey> {
    if totals_before_data {
        vec![
            PivotKey::grand_total(),
            key(&["East"]),
            key(&["East", "A"]),
            key(&["East", "B"]),
            key(&["West"]),
            key(&["West", "A"]),
        ]
    } else {
        vec![
            key(&["East", "A"]),
            key(&["East", "B"]),
            key(&["East"]),
            key(&["West", "A"]),
            key(&["West"]),
            PivotKey::grand_total(),
        ]
    }
}

/// Year > Quarter column keys, same shape as the region keys.
pub fn year_keys(totals_before_data: bool) -> Vec<PivotKey> {
    if totals_before_data {
        vec![
            PivotKey::grand_total(),
            key(&["2023"]),
            key(&["2023", "Q1"]),
            key(&["2023", "Q2"]),
            key(&["2024"]),
            key(&["2024", "Q1"]),
        ]
    } else {
        vec![
            key(&["2023", "Q1"]),
            key(&["2023", "Q2"]),
            key(&["2023"]),
            key(&["2024", "Q1"]),
            key(&["2024"]),
            PivotKey::grand_total(),
        ]
    }
}
