//! FILENAME: core/merge-engine/src/definition.rs
//! Layout Definitions - The serializable configuration.
//!
//! This module contains the types that DESCRIBE a layout.
//! These structures are designed to be:
//! - Serializable (for saving/loading views, usually as JSON)
//! - Free of derived state (positions and spans are computed later)
//! - Immutable snapshots of user intent

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

// ============================================================================
// MERGING
// ============================================================================

/// Which panels take part in value-equality merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum AllowMerging {
    /// No value-equality merging anywhere.
    #[default]
    None,
    /// Data cells only.
    Cells,
    /// Column headers only.
    ColumnHeaders,
    /// Row headers only.
    RowHeaders,
    /// Column and row headers (and the top-left corner).
    AllHeaders,
    /// Every panel.
    All,
}

impl AllowMerging {
    /// Returns true if merging is enabled for the given panel.
    pub fn includes(self, kind: engine::PanelKind) -> bool {
        use engine::PanelKind;
        match self {
            AllowMerging::None => false,
            AllowMerging::Cells => matches!(kind, PanelKind::Cell | PanelKind::ColumnFooter),
            AllowMerging::ColumnHeaders => kind == PanelKind::ColumnHeader,
            AllowMerging::RowHeaders => kind == PanelKind::RowHeader,
            AllowMerging::AllHeaders => matches!(
                kind,
                PanelKind::ColumnHeader | PanelKind::RowHeader | PanelKind::TopLeft
            ),
            AllowMerging::All => true,
        }
    }
}

// ============================================================================
// MULTI-ROW LAYOUT
// ============================================================================

/// One cell of a cell group: a bound field plus how many columns it spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CellDefinition {
    /// Name of the bound field.
    #[serde(default)]
    pub binding: String,

    /// Header text (defaults to the binding).
    #[serde(default)]
    pub header: Option<String>,

    /// Number of columns the cell spans (defaults to 1).
    #[serde(default)]
    pub colspan: Option<u32>,

    /// Whether group rows show an aggregate for this field.
    #[serde(default)]
    pub aggregate: bool,
}

impl CellDefinition {
    pub fn new(binding: impl Into<String>) -> Self {
        CellDefinition {
            binding: binding.into(),
            ..Default::default()
        }
    }

    pub fn with_colspan(mut self, colspan: u32) -> Self {
        self.colspan = Some(colspan);
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_aggregate(mut self) -> Self {
        self.aggregate = true;
        self
    }
}

/// A block of cells that wrap across rows within one data item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroupDefinition {
    /// Header shown when column headers are collapsed.
    #[serde(default)]
    pub header: Option<String>,

    /// Width of the group in columns (defaults to the widest cell).
    #[serde(default)]
    pub colspan: Option<u32>,

    /// Cells in layout order.
    #[serde(default)]
    pub cells: Vec<CellDefinition>,
}

impl GroupDefinition {
    pub fn new(cells: Vec<CellDefinition>) -> Self {
        GroupDefinition {
            cells,
            ..Default::default()
        }
    }

    pub fn with_colspan(mut self, colspan: u32) -> Self {
        self.colspan = Some(colspan);
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }
}

/// A complete multi-row layout: groups laid out left to right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDefinition {
    pub groups: Vec<GroupDefinition>,
}

impl LayoutDefinition {
    pub fn new(groups: Vec<GroupDefinition>) -> Self {
        LayoutDefinition { groups }
    }

    /// Parses a layout from JSON, either `{"groups": [...]}` or a bare array
    /// of groups.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Groups(Vec<GroupDefinition>),
            Layout(LayoutDefinition),
        }

        Ok(match serde_json::from_str::<Shape>(json)? {
            Shape::Groups(groups) => LayoutDefinition { groups },
            Shape::Layout(layout) => layout,
        })
    }
}

/// Options for a multi-row grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MultiRowOptions {
    /// Show one header row per group instead of the full cell layout.
    #[serde(default)]
    pub collapsed_headers: bool,

    /// Value-equality merging for panels the layout does not own
    /// (group rows, footers).
    #[serde(default)]
    pub allow_merging: AllowMerging,
}

// ============================================================================
// PIVOT LAYOUT
// ============================================================================

/// Options for a pivot grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotSettings {
    /// Number of fields on the row axis.
    pub row_field_count: usize,

    /// Number of fields on the column axis.
    pub column_field_count: usize,

    /// Totals render before (above/left of) their detail rows/columns.
    #[serde(default)]
    pub totals_before_data: bool,

    /// The last top-left row shows the row field names.
    #[serde(default)]
    pub show_row_field_headers: bool,

    /// Value-equality merging for data cells.
    #[serde(default)]
    pub allow_merging: AllowMerging,

    /// Label shown in subtotal headers.
    #[serde(default = "default_total_label")]
    pub total_label: String,

    /// Label shown in the grand total header.
    #[serde(default = "default_grand_total_label")]
    pub grand_total_label: String,
}

fn default_total_label() -> String {
    "Total".to_string()
}

fn default_grand_total_label() -> String {
    "Grand Total".to_string()
}

impl PivotSettings {
    pub fn new(row_field_count: usize, column_field_count: usize) -> Self {
        PivotSettings {
            row_field_count,
            column_field_count,
            totals_before_data: false,
            show_row_field_headers: false,
            allow_merging: AllowMerging::None,
            total_label: default_total_label(),
            grand_total_label: default_grand_total_label(),
        }
    }
}

impl Default for PivotSettings {
    fn default() -> Self {
        PivotSettings::new(0, 0)
    }
}
