//! FILENAME: core/merge-engine/src/lib.rs
//! Merged cell ranges for multi-row and pivot grids.
//!
//! The crate sits on top of the `engine` grid model and answers one
//! question for the renderer and hit-testing: which block of cells does a
//! given cell belong to? It also owns the collapse/expand logic of pivot
//! axes, since both features share the same notion of hierarchy levels.
//!
//! Layers:
//! - `definition`: serializable layout and pivot settings
//! - `cell_group` / `multirow`: static layouts built from cell groups
//! - `pivot` / `collapse`: hierarchical header axes
//! - `merge`: the single lookup entry point over both strategies

pub mod logging;

pub mod cell_group;
pub mod collapse;
pub mod definition;
pub mod error;
pub mod merge;
pub mod multirow;
pub mod pivot;

pub use cell_group::{CellGroup, LayoutCell, RelativeRange, MAX_LAYOUT_COLUMNS};
pub use collapse::{collapse_to_level, grouped_range, is_collapsed, set_collapsed, Orientation};
pub use definition::{
    AllowMerging, CellDefinition, GroupDefinition, LayoutDefinition, MultiRowOptions, PivotSettings,
};
pub use error::LayoutError;
pub use merge::{MergeManager, MergeStrategy};
pub use multirow::{BindingColumn, MultiRowLayout};
pub use pivot::{PivotKey, PivotLayout};
