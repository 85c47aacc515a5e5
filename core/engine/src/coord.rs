//! FILENAME: core/engine/src/coord.rs
//! PURPOSE: Cell coordinates and A1-style column labels.
//! CONTEXT: Coordinates are 0-based (row, col) pairs local to one panel.
//! The A1 helpers are only used to print ranges in logs and test output,
//! where "B3:C4" reads much better than a tuple dump.

/// A cell coordinate as (row, col) with 0-based indices.
pub type CellCoord = (u32, u32);

/// Converts a column label (e.g., "A", "AA") to a 0-based column index.
/// Returns None for an empty label or one containing non-letters.
pub fn col_to_index(col_str: &str) -> Option<u32> {
    if col_str.is_empty() {
        return None;
    }
    let mut result: u32 = 0;
    for c in col_str.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        result = result.checked_mul(26)?.checked_add(digit)?;
    }
    Some(result - 1)
}

/// Converts a 0-based column index to its label.
/// 0 -> "A", 25 -> "Z", 26 -> "AA".
pub fn index_to_col(mut col_index: u32) -> String {
    let mut result = Vec::new();
    loop {
        result.push(b'A' + (col_index % 26) as u8);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }
    result.reverse();
    String::from_utf8_lossy(&result).into_owned()
}

/// Formats a coordinate as an A1-style reference ((2, 1) -> "B3").
pub fn coord_to_a1(coord: CellCoord) -> String {
    let (row, col) = coord;
    format!("{}{}", index_to_col(col), row as u64 + 1)
}
