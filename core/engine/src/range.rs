//! FILENAME: core/engine/src/range.rs
//! PURPOSE: Rectangular cell ranges.
//! CONTEXT: A `CellRange` is the currency of the merge and collapse code:
//! merge resolution returns one, collapse group discovery takes and returns
//! one. Ranges are small `Copy` values, so "clone before mutation" is just
//! binding a new variable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coord::{col_to_index, coord_to_a1};

/// An inclusive rectangle of cells, normalized so that
/// `row <= row2` and `col <= col2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRange {
    /// Top row (inclusive).
    pub row: u32,
    /// Left column (inclusive).
    pub col: u32,
    /// Bottom row (inclusive).
    pub row2: u32,
    /// Right column (inclusive).
    pub col2: u32,
}

impl CellRange {
    /// Creates a range from two corners, in any order.
    pub fn new(row: u32, col: u32, row2: u32, col2: u32) -> Self {
        CellRange {
            row: row.min(row2),
            col: col.min(col2),
            row2: row.max(row2),
            col2: col.max(col2),
        }
    }

    /// Creates a range covering exactly one cell.
    pub fn single(row: u32, col: u32) -> Self {
        CellRange { row, col, row2: row, col2: col }
    }

    pub fn is_single_cell(&self) -> bool {
        self.row == self.row2 && self.col == self.col2
    }

    pub fn row_count(&self) -> u32 {
        self.row2 - self.row + 1
    }

    pub fn col_count(&self) -> u32 {
        self.col2 - self.col + 1
    }

    pub fn top_left(&self) -> (u32, u32) {
        (self.row, self.col)
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.row && row <= self.row2 && col >= self.col && col <= self.col2
    }

    pub fn contains_row(&self, row: u32) -> bool {
        row >= self.row && row <= self.row2
    }

    pub fn contains_col(&self, col: u32) -> bool {
        col >= self.col && col <= self.col2
    }

    pub fn contains_range(&self, other: &CellRange) -> bool {
        self.contains(other.row, other.col) && self.contains(other.row2, other.col2)
    }

    pub fn intersects(&self, other: &CellRange) -> bool {
        !(self.row2 < other.row
            || self.row > other.row2
            || self.col2 < other.col
            || self.col > other.col2)
    }

    /// Returns the overlapping part of two ranges, if any.
    pub fn intersection(&self, other: &CellRange) -> Option<CellRange> {
        if !self.intersects(other) {
            return None;
        }
        Some(CellRange {
            row: self.row.max(other.row),
            col: self.col.max(other.col),
            row2: self.row2.min(other.row2),
            col2: self.col2.min(other.col2),
        })
    }

    /// Iterates the row indices covered by this range.
    pub fn rows(&self) -> std::ops::RangeInclusive<u32> {
        self.row..=self.row2
    }

    /// Iterates the column indices covered by this range.
    pub fn cols(&self) -> std::ops::RangeInclusive<u32> {
        self.col..=self.col2
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", coord_to_a1(self.top_left()))
        } else {
            write!(
                f,
                "{}:{}",
                coord_to_a1(self.top_left()),
                coord_to_a1((self.row2, self.col2))
            )
        }
    }
}

/// Error returned when an A1-style range string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRangeError(pub String);

impl fmt::Display for ParseRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cell range: '{}'", self.0)
    }
}

impl std::error::Error for ParseRangeError {}

fn parse_a1(part: &str) -> Option<(u32, u32)> {
    let split = part.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = part.split_at(split);
    let col = col_to_index(letters)?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col))
}

impl FromStr for CellRange {
    type Err = ParseRangeError;

    /// Parses "B3" or "B3:C4".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRangeError(s.to_string());
        let mut parts = s.trim().split(':');
        let first = parts.next().and_then(parse_a1).ok_or_else(err)?;
        let second = match parts.next() {
            Some(p) => parse_a1(p).ok_or_else(err)?,
            None => first,
        };
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(CellRange::new(first.0, first.1, second.0, second.1))
    }
}
