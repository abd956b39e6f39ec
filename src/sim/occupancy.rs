//! Per-row occupancy for the level generator
//!
//! Each row records one contiguous span of columns already claimed by
//! placements. The endpoints are margin cells: placed objects occupy the
//! columns strictly between `left` and `right`. A row whose endpoints are
//! equal is empty. Rows are only ever added, and only at the end.

use serde::{Deserialize, Serialize};

/// Occupied column span of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnRange {
    pub left: i32,
    pub right: i32,
}

impl ColumnRange {
    /// Sentinel for a row with nothing placed
    pub const EMPTY: ColumnRange = ColumnRange { left: 0, right: 0 };

    pub fn new(left: i32, right: i32) -> Self {
        Self { left, right }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.left == self.right
    }

    /// Span covering both (used when merging a band of rows)
    pub fn merge(&self, other: &ColumnRange) -> ColumnRange {
        ColumnRange::new(self.left.min(other.left), self.right.max(other.right))
    }

    /// Whether `column` is claimed by a placement in this row
    #[inline]
    pub fn occupies(&self, column: i32) -> bool {
        !self.is_empty() && column > self.left && column < self.right
    }
}

/// Growable table of occupied spans, indexed by row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyTable {
    rows: Vec<ColumnRange>,
}

impl OccupancyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with `rows` empty rows
    pub fn with_rows(rows: usize) -> Self {
        Self {
            rows: vec![ColumnRange::EMPTY; rows],
        }
    }

    /// Grow to cover `max_row`. Never shrinks.
    pub fn extend(&mut self, max_row: usize) {
        if self.rows.len() < max_row + 1 {
            self.rows.resize(max_row + 1, ColumnRange::EMPTY);
        }
    }

    /// Span of `row`.
    ///
    /// # Panics
    /// When `row` has not been covered by [`extend`](Self::extend) yet.
    pub fn get(&self, row: usize) -> ColumnRange {
        assert!(
            row < self.rows.len(),
            "occupancy row {row} read before the table was extended (len {})",
            self.rows.len()
        );
        self.rows[row]
    }

    /// Overwrite the span of `row`.
    ///
    /// # Panics
    /// When `row` has not been covered by [`extend`](Self::extend) yet.
    pub fn set(&mut self, row: usize, range: ColumnRange) {
        assert!(
            row < self.rows.len(),
            "occupancy row {row} written before the table was extended (len {})",
            self.rows.len()
        );
        self.rows[row] = range;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnRange> {
        self.rows.iter()
    }
}
