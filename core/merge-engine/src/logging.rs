//! FILENAME: core/merge-engine/src/logging.rs
// PURPOSE: Category-tagged logging macros.
// CONTEXT: Every line carries a category ("LAYOUT", "MERGE", "COLLAPSE")
// which becomes the `log` target, so hosts can filter per subsystem.

/// Layout construction and row binding.
pub const CAT_LAYOUT: &str = "LAYOUT";
/// Merge range resolution.
pub const CAT_MERGE: &str = "MERGE";
/// Collapse/expand of hierarchical groups.
pub const CAT_COLLAPSE: &str = "COLLAPSE";

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        ::log::info!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        ::log::warn!(target: $cat, $($arg)*)
    };
}

// Re-export the macros so they can be imported via `use crate::logging::log_info;`
pub use log_debug;
pub use log_info;
pub use log_warn;
