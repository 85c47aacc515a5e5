//! FILENAME: core/merge-engine/src/multirow.rs
//! Multi-Row Layout - cell groups laid out side by side.
//!
//! Every data item is rendered as `rows_per_item` physical rows. The layout
//! owns the cell groups, assigns their starting columns, pads them all to
//! the same height, and keeps the grid axes in sync with the item count.

use engine::{Axis, Column, GridPanel, PanelKind, Row};

use crate::cell_group::{CellGroup, LayoutCell};
use crate::cell_group::MAX_LAYOUT_COLUMNS;
use crate::definition::{AllowMerging, LayoutDefinition, MultiRowOptions};
use crate::error::LayoutError;
use crate::logging::{log_debug, log_info, CAT_LAYOUT};

/// What supplies the content of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindingColumn<'a> {
    /// A single layout cell.
    Cell(&'a LayoutCell),
    /// A whole group (collapsed column headers).
    Group(&'a CellGroup),
}

impl<'a> BindingColumn<'a> {
    /// Header text of the binding.
    pub fn header(&self) -> &'a str {
        match self {
            BindingColumn::Cell(cell) => &cell.header,
            BindingColumn::Group(group) => group.header(),
        }
    }
}

/// Closed groups of one layout plus their column map.
#[derive(Debug, Clone)]
struct GroupSet {
    groups: Vec<CellGroup>,
    rows_per_item: u32,
    /// Group index of every grid column.
    column_groups: Vec<usize>,
}

impl GroupSet {
    fn build(definition: &LayoutDefinition) -> Result<GroupSet, LayoutError> {
        if definition.groups.is_empty() {
            return Err(LayoutError::NoGroups);
        }
        let mut groups = definition
            .groups
            .iter()
            .enumerate()
            .map(|(i, g)| CellGroup::new(i, g))
            .collect::<Result<Vec<_>, _>>()?;

        let rows_per_item = groups.iter().map(|g| g.rowspan()).max().unwrap_or(1);

        let mut colstart: u32 = 0;
        let mut column_groups = Vec::new();
        for group in groups.iter_mut() {
            // the layout must fit the column limit and its tables must be
            // addressable with u32 offsets
            let end = colstart
                .checked_add(group.colspan())
                .filter(|&end| end <= MAX_LAYOUT_COLUMNS)
                .filter(|_| rows_per_item.checked_mul(group.colspan()).is_some())
                .ok_or(LayoutError::SpanOverflow { group: group.index() })?;
            group.set_colstart(colstart);
            group.close_group(rows_per_item);
            colstart = end;
            column_groups.extend(std::iter::repeat(group.index()).take(group.colspan() as usize));
        }

        Ok(GroupSet { groups, rows_per_item, column_groups })
    }

    fn column_count(&self) -> u32 {
        self.column_groups.len() as u32
    }

    fn group_for_column(&self, col: u32) -> Option<&CellGroup> {
        let index = *self.column_groups.get(col as usize)?;
        self.groups.get(index)
    }
}

#[derive(Debug, Clone)]
pub struct MultiRowLayout {
    data: GroupSet,
    /// Separate layout for the column headers, if any.
    header: Option<GroupSet>,
    options: MultiRowOptions,
}

impl MultiRowLayout {
    /// Builds and closes every group of a layout definition.
    pub fn new(definition: &LayoutDefinition, options: MultiRowOptions) -> Result<Self, LayoutError> {
        let data = GroupSet::build(definition)?;
        log_debug!(
            CAT_LAYOUT,
            "layout built: groups={} columns={} rows_per_item={}",
            data.groups.len(),
            data.column_count(),
            data.rows_per_item
        );
        Ok(MultiRowLayout { data, header: None, options })
    }

    /// Uses a different layout for the column headers. It must span the
    /// same number of columns as the data layout.
    pub fn with_header_layout(mut self, definition: &LayoutDefinition) -> Result<Self, LayoutError> {
        let header = GroupSet::build(definition)?;
        if header.column_count() != self.data.column_count() {
            return Err(LayoutError::HeaderWidthMismatch {
                header: header.column_count(),
                data: self.data.column_count(),
            });
        }
        log_debug!(
            CAT_LAYOUT,
            "header layout: groups={} rows={}",
            header.groups.len(),
            header.rows_per_item
        );
        self.header = Some(header);
        Ok(self)
    }

    pub fn options(&self) -> MultiRowOptions {
        self.options
    }

    /// Changes which panels use value-equality merging.
    pub fn set_allow_merging(&mut self, allow_merging: AllowMerging) {
        self.options.allow_merging = allow_merging;
    }

    /// Physical rows per data item.
    pub fn rows_per_item(&self) -> u32 {
        self.data.rows_per_item
    }

    /// Physical column header rows when headers are expanded.
    pub fn header_rows_per_item(&self) -> u32 {
        self.header_set().rows_per_item
    }

    pub fn column_count(&self) -> u32 {
        self.data.column_count()
    }

    pub fn groups(&self) -> &[CellGroup] {
        &self.data.groups
    }

    /// Groups used by the column headers.
    pub fn header_groups(&self) -> &[CellGroup] {
        &self.header_set().groups
    }

    fn header_set(&self) -> &GroupSet {
        self.header.as_ref().unwrap_or(&self.data)
    }

    pub fn group_for_column(&self, col: u32) -> Option<&CellGroup> {
        self.data.group_for_column(col)
    }

    pub fn header_group_for_column(&self, col: u32) -> Option<&CellGroup> {
        self.header_set().group_for_column(col)
    }

    pub fn collapsed_headers(&self) -> bool {
        self.options.collapsed_headers
    }

    /// Collapses or expands the column headers and rebuilds the header rows.
    pub fn set_collapsed_headers(&mut self, collapsed: bool, header_rows: &mut Axis<Row>) {
        if self.options.collapsed_headers != collapsed {
            log_info!(
                CAT_LAYOUT,
                "column headers {}",
                if collapsed { "collapsed" } else { "expanded" }
            );
            self.options.collapsed_headers = collapsed;
            self.bind_header_rows(header_rows);
        }
    }

    // ========================================================================
    // GRID BINDING
    // ========================================================================

    /// Recreates the data columns, one per layout column.
    pub fn bind_columns(&self, columns: &mut Axis<Column>) {
        columns.defer_update(|columns| {
            columns.clear();
            for col in 0..self.column_count() {
                columns.push(self.layout_column(col));
            }
        });
    }

    fn layout_column(&self, col: u32) -> Column {
        let group = match self.group_for_column(col) {
            Some(group) => group,
            None => return Column::new(),
        };
        let local = col - group.colstart();
        let covers = |cell: &&LayoutCell| local >= cell.col && local < cell.col + cell.colspan;
        let binding = group
            .cells()
            .iter()
            .find(|cell| cell.row == 0 && covers(cell))
            .map(|cell| cell.binding.clone());
        let has_aggregate = group.cells().iter().filter(covers).any(|cell| cell.aggregate);
        Column {
            binding,
            has_aggregate,
            ..Column::new()
        }
    }

    /// Recreates the column header rows: one row when collapsed, otherwise
    /// one row per header layout row.
    pub fn bind_header_rows(&self, header_rows: &mut Axis<Row>) {
        header_rows.defer_update(|rows| {
            rows.clear();
            if self.collapsed_headers() {
                rows.push(Row::new());
            } else {
                rows.extend((0..self.header_rows_per_item()).map(|i| Row::record(0, i)));
            }
        });
    }

    /// Recreates the data rows for `item_count` items.
    pub fn bind_rows(&self, rows: &mut Axis<Row>, item_count: usize) {
        let rows_per_item = self.rows_per_item();
        rows.defer_update(|rows| {
            rows.clear();
            for item in 0..item_count {
                rows.extend((0..rows_per_item).map(|i| Row::record(item, i)));
            }
        });
        log_debug!(
            CAT_LAYOUT,
            "bound rows: items={} rows={}",
            item_count,
            rows.len()
        );
    }

    /// Appends the rows of one new item at the end.
    pub fn append_item(&self, rows: &mut Axis<Row>, data_index: usize) {
        let rows_per_item = self.rows_per_item();
        rows.extend((0..rows_per_item).map(|i| Row::record(data_index, i)));
    }

    /// Appends an aggregate group row.
    pub fn insert_group_row(&self, rows: &mut Axis<Row>, depth: u32) {
        rows.push(Row::group(depth));
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    /// Resolves which layout cell (or group) supplies grid cell (r, c).
    pub fn binding_column(&self, panel: &GridPanel<'_>, r: u32, c: u32) -> Option<BindingColumn<'_>> {
        match panel.kind() {
            PanelKind::Cell | PanelKind::ColumnFooter => {
                if panel.row(r).map(|row| row.is_group_row()).unwrap_or(false) {
                    return None;
                }
                self.group_for_column(c)?
                    .binding_column(panel, r, c)
                    .map(BindingColumn::Cell)
            }
            PanelKind::ColumnHeader => {
                let group = self.header_group_for_column(c)?;
                if self.collapsed_headers() {
                    Some(BindingColumn::Group(group))
                } else {
                    group.binding_column(panel, r, c).map(BindingColumn::Cell)
                }
            }
            PanelKind::RowHeader | PanelKind::TopLeft => None,
        }
    }
}
