//! Cell reference and range types

use crate::column::{index_to_letters, letters_to_index};
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell reference (e.g., "A1", "O7")
///
/// Column and row are 0-based internally. In A1 notation the column is a
/// bijective base-26 numeral and the row is 1-based, so `CellReference::new(6, 14)`
/// displays as `O7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellReference {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u32,
}

impl CellReference {
    /// Create a new cell reference from 0-based indices
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a cell reference from A1-style notation
    ///
    /// `$` absolute markers are accepted and dropped; they carry no meaning here.
    ///
    /// # Examples
    /// ```
    /// use cellpic_core::CellReference;
    ///
    /// let r = CellReference::parse("O7").unwrap();
    /// assert_eq!(r.row, 6);
    /// assert_eq!(r.col, 14);
    ///
    /// let r = CellReference::parse("$b$2").unwrap();
    /// assert_eq!(r.to_string(), "B2");
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let unmarked: String = s.chars().filter(|&c| c != '$').collect();
        let split = unmarked
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(unmarked.len());
        let (letters, digits) = unmarked.split_at(split);

        if letters.is_empty() {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }
        if digits.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }

        let col = letters_to_index(letters).map_err(|_| {
            Error::InvalidAddress(format!("invalid column letters in '{}'", s))
        })?;

        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        // Rows are 1-based in A1 notation, 0-based internally
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }
        let row = row - 1;

        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }

        Ok(Self { row, col })
    }

    /// The 1-based row number as written in A1 notation
    pub fn row_number(&self) -> u32 {
        self.row + 1
    }

    /// The column letters of this reference
    pub fn column_letters(&self) -> String {
        index_to_letters(self.col)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", self.column_letters(), self.row_number())
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A rectangular range of cells (e.g., "A5:A7"), inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Start reference (top-left)
    pub start: CellReference,
    /// End reference (bottom-right)
    pub end: CellReference,
}

impl CellRange {
    /// Create a new cell range, normalized so `start` is the top-left corner
    pub fn new(start: CellReference, end: CellReference) -> Self {
        Self {
            start: CellReference::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellReference::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// Create a single-cell range
    pub fn single(cell: CellReference) -> Self {
        Self {
            start: cell,
            end: cell,
        }
    }

    /// Parse a range from A1:B10 notation
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        match s.split_once(':') {
            Some((start, end)) => {
                let start = CellReference::parse(start)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                let end = CellReference::parse(end)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                Ok(Self::new(start, end))
            }
            None => Ok(Self::single(CellReference::parse(s)?)),
        }
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        let rows = (self.end.row - self.start.row) as u64 + 1;
        let cols = (self.end.col - self.start.col) as u64 + 1;
        rows * cols
    }

    /// Iterate over all cell references in the range (row by row)
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_row: self.start.row,
            current_col: self.start.col,
            remaining: self.cell_count(),
        }
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Iterator over cells in a range
pub struct CellRangeIterator {
    range: CellRange,
    current_row: u32,
    current_col: u32,
    remaining: u64,
}

impl Iterator for CellRangeIterator {
    type Item = CellReference;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let cell = CellReference::new(self.current_row, self.current_col);
        self.remaining -= 1;

        // Move to next cell
        if self.current_col >= self.range.end.col {
            self.current_col = self.range.start.col;
            self.current_row += 1;
        } else {
            self.current_col += 1;
        }

        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellRangeIterator {}
