//! FILENAME: core/merge-engine/src/error.rs

use thiserror::Error;

/// Configuration errors raised while building a layout.
/// These are fatal for the layout being built; lookups never produce them.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Layout has no cell groups")]
    NoGroups,

    #[error("Cell group {group} has no cells")]
    EmptyGroup { group: usize },

    #[error("Cell {cell} of group {group} has no binding")]
    MissingBinding { group: usize, cell: usize },

    #[error("Cell group {group} is wider than the layout column limit")]
    SpanOverflow { group: usize },

    #[error("Header layout spans {header} columns but the data layout spans {data}")]
    HeaderWidthMismatch { header: u32, data: u32 },

    #[error("Invalid layout definition: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
