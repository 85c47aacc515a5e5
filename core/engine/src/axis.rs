//! FILENAME: core/engine/src/axis.rs
//! PURPOSE: Row and column collections ("axes") with batched change notification.
//! CONTEXT: Every panel of a grid is the cross product of one row axis and
//! one column axis. Axes are plain arenas: the merge and collapse code refer
//! to rows and columns by index only, never by pointer.
//!
//! Mutations notify listeners once per change. Inside a deferred update
//! scope (`begin_update`/`end_update` or `defer_update`) the changes are
//! coalesced and a single notification fires when the outermost scope ends.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// AXIS ITEMS
// ============================================================================

/// Shared behavior of rows and columns as seen by merge/collapse logic.
pub trait AxisItem {
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    /// Total level of this row/column on a hierarchical axis.
    /// -1 means the item is not a total.
    fn level(&self) -> i32;

    /// Whether value-equality merging may extend along this item.
    fn allow_merging(&self) -> bool;
}

/// What a row represents in the data panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    /// One wrap-row of a bound data item.
    Data,
    /// An aggregate (group header) row; `depth` is its grouping depth.
    Group { depth: u32 },
}

/// A physical row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub visible: bool,
    pub kind: RowKind,
    /// Wrap-row offset of this row within its data item.
    pub record_index: Option<u32>,
    /// Index of the source item this row belongs to.
    pub data_index: Option<usize>,
    /// Total level (see `AxisItem::level`).
    pub level: i32,
    pub allow_merging: bool,
}

impl Row {
    pub fn new() -> Self {
        Row {
            visible: true,
            kind: RowKind::Data,
            record_index: None,
            data_index: None,
            level: -1,
            allow_merging: false,
        }
    }

    /// Creates the `record_index`-th wrap-row of data item `data_index`.
    pub fn record(data_index: usize, record_index: u32) -> Self {
        Row {
            record_index: Some(record_index),
            data_index: Some(data_index),
            ..Row::new()
        }
    }

    /// Creates an aggregate group row.
    pub fn group(depth: u32) -> Self {
        Row {
            kind: RowKind::Group { depth },
            ..Row::new()
        }
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_merging(mut self, allow_merging: bool) -> Self {
        self.allow_merging = allow_merging;
        self
    }

    pub fn is_group_row(&self) -> bool {
        matches!(self.kind, RowKind::Group { .. })
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

impl AxisItem for Row {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn level(&self) -> i32 {
        self.level
    }

    fn allow_merging(&self) -> bool {
        self.allow_merging
    }
}

/// A physical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub visible: bool,
    /// Name of the bound field, if the column is bound directly.
    pub binding: Option<String>,
    /// Whether group rows show an aggregate in this column.
    pub has_aggregate: bool,
    /// Total level (see `AxisItem::level`).
    pub level: i32,
    pub allow_merging: bool,
}

impl Column {
    pub fn new() -> Self {
        Column {
            visible: true,
            binding: None,
            has_aggregate: false,
            level: -1,
            allow_merging: false,
        }
    }

    pub fn bound(binding: impl Into<String>) -> Self {
        Column {
            binding: Some(binding.into()),
            ..Column::new()
        }
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_aggregate(mut self, has_aggregate: bool) -> Self {
        self.has_aggregate = has_aggregate;
        self
    }

    pub fn with_merging(mut self, allow_merging: bool) -> Self {
        self.allow_merging = allow_merging;
        self
    }
}

impl Default for Column {
    fn default() -> Self {
        Self::new()
    }
}

impl AxisItem for Column {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn level(&self) -> i32 {
        self.level
    }

    fn allow_merging(&self) -> bool {
        self.allow_merging
    }
}

// ============================================================================
// CHANGE NOTIFICATION
// ============================================================================

/// A change notification fired by an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisChange {
    /// Visibility of one or more items changed.
    Visibility,
    /// `count` items were appended starting at `start`.
    Appended { start: usize, count: usize },
    /// The frozen count changed.
    Frozen,
    /// Anything else, or a mix of changes: re-read the whole axis.
    Reset,
}

impl AxisChange {
    /// Merges two changes that happened inside the same deferred scope.
    fn coalesce(self, next: AxisChange) -> AxisChange {
        match (self, next) {
            (AxisChange::Visibility, AxisChange::Visibility) => AxisChange::Visibility,
            (AxisChange::Frozen, AxisChange::Frozen) => AxisChange::Frozen,
            (
                AxisChange::Appended { start, count },
                AxisChange::Appended { start: next_start, count: next_count },
            ) if next_start == start + count => AxisChange::Appended {
                start,
                count: count + next_count,
            },
            _ => AxisChange::Reset,
        }
    }
}

/// Callback invoked when an axis changes.
pub type AxisListener = Box<dyn FnMut(AxisChange)>;

// ============================================================================
// AXIS
// ============================================================================

/// An ordered collection of rows or columns.
pub struct Axis<T> {
    items: Vec<T>,
    /// Number of leading items that do not scroll.
    frozen: u32,
    /// Nesting depth of deferred update scopes.
    update_depth: u32,
    /// Change accumulated inside the current deferred scope.
    pending: Option<AxisChange>,
    listeners: Vec<AxisListener>,
}

impl<T: AxisItem> Axis<T> {
    pub fn new() -> Self {
        Axis {
            items: Vec::new(),
            frozen: 0,
            update_depth: 0,
            pending: None,
            listeners: Vec::new(),
        }
    }

    /// Creates an axis from existing items without notifying anyone.
    pub fn with_items(items: Vec<T>) -> Self {
        Axis { items, ..Axis::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Item count as a panel coordinate.
    pub fn count(&self) -> u32 {
        self.items.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&T> {
        self.items.get(index as usize)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Level of the item at `index`, -1 when out of range.
    pub fn level_of(&self, index: u32) -> i32 {
        self.get(index).map(|item| item.level()).unwrap_or(-1)
    }

    pub fn is_visible(&self, index: u32) -> bool {
        self.get(index).map(|item| item.is_visible()).unwrap_or(false)
    }

    pub fn frozen(&self) -> u32 {
        self.frozen
    }

    pub fn set_frozen(&mut self, frozen: u32) {
        if self.frozen != frozen {
            self.frozen = frozen;
            self.notify(AxisChange::Frozen);
        }
    }

    /// Sets the visibility of one item. Returns true if anything changed.
    pub fn set_visible(&mut self, index: u32, visible: bool) -> bool {
        match self.items.get_mut(index as usize) {
            Some(item) if item.is_visible() != visible => {
                item.set_visible(visible);
                self.notify(AxisChange::Visibility);
                true
            }
            _ => false,
        }
    }

    pub fn push(&mut self, item: T) {
        let start = self.items.len();
        self.items.push(item);
        self.notify(AxisChange::Appended { start, count: 1 });
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        let start = self.items.len();
        self.items.extend(items);
        let count = self.items.len() - start;
        if count > 0 {
            self.notify(AxisChange::Appended { start, count });
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.notify(AxisChange::Reset);
    }

    pub fn truncate(&mut self, len: usize) {
        if len < self.items.len() {
            self.items.truncate(len);
            self.notify(AxisChange::Reset);
        }
    }

    /// Registers a change listener.
    pub fn on_change(&mut self, listener: impl FnMut(AxisChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // ========================================================================
    // DEFERRED UPDATES
    // ========================================================================

    /// Opens a deferred update scope. Scopes nest.
    pub fn begin_update(&mut self) {
        self.update_depth += 1;
    }

    /// Closes a deferred update scope. When the outermost scope closes,
    /// the coalesced change (if any) is delivered once.
    pub fn end_update(&mut self) {
        if self.update_depth == 0 {
            return;
        }
        self.update_depth -= 1;
        if self.update_depth == 0 {
            if let Some(change) = self.pending.take() {
                self.fire(change);
            }
        }
    }

    pub fn is_updating(&self) -> bool {
        self.update_depth > 0
    }

    /// Runs `f` inside a deferred update scope.
    pub fn defer_update<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_update();
        let result = f(self);
        self.end_update();
        result
    }

    fn notify(&mut self, change: AxisChange) {
        if self.update_depth > 0 {
            self.pending = Some(match self.pending {
                Some(pending) => pending.coalesce(change),
                None => change,
            });
        } else {
            self.fire(change);
        }
    }

    fn fire(&mut self, change: AxisChange) {
        for listener in self.listeners.iter_mut() {
            listener(change);
        }
    }
}

impl<T: AxisItem> Default for Axis<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Axis<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axis")
            .field("items", &self.items)
            .field("frozen", &self.frozen)
            .field("update_depth", &self.update_depth)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
