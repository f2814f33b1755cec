//! Anchor geometry
//!
//! Floating images are positioned by an offset and an extent in EMU relative to
//! the worksheet's top-left corner. To find the cells an image sits on, the
//! declared column widths and row heights are accumulated into two
//! [`BoundarySequence`]s and each anchor edge is snapped to its nearest
//! boundary.

use crate::cell::CellReference;
use crate::error::{Error, Result};

/// EMU per typographic point
pub const EMU_PER_POINT: f64 = 12_700.0;

/// Convert points to EMU
pub fn points_to_emu(points: f64) -> f64 {
    points * EMU_PER_POINT
}

/// Cumulative grid-line offsets along one axis, in EMU
///
/// Index 0 is the grid origin (always zero). Index `i` is the offset of the
/// far edge of column/row `i - 1`. Offsets never decrease.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySequence {
    offsets: Vec<f64>,
}

impl BoundarySequence {
    /// Build a sequence from per-column (or per-row) sizes given in points.
    ///
    /// The running total is kept in points and converted to EMU after every
    /// addition. Negative and non-finite sizes count as zero.
    ///
    /// # Examples
    /// ```
    /// use cellpic_core::BoundarySequence;
    ///
    /// let b = BoundarySequence::from_sizes([72.0, 72.0]);
    /// assert_eq!(b.offsets(), &[0.0, 914_400.0, 1_828_800.0]);
    /// ```
    pub fn from_sizes<I>(sizes: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut offsets = vec![0.0];
        let mut total = 0.0;

        for size in sizes {
            if size.is_finite() && size > 0.0 {
                total += size;
            }
            offsets.push(points_to_emu(total));
        }

        Self { offsets }
    }

    /// Build a sequence from explicit EMU offsets.
    ///
    /// The first offset must be zero and offsets must not decrease.
    pub fn from_offsets(offsets: Vec<f64>) -> Result<Self> {
        match offsets.first() {
            None => return Err(Error::InvalidBoundaries("no offsets".into())),
            Some(&first) if first != 0.0 => {
                return Err(Error::InvalidBoundaries(format!(
                    "first offset is {}, expected 0",
                    first
                )))
            }
            Some(_) => {}
        }

        if let Some(i) = offsets.windows(2).position(|w| !(w[1] >= w[0])) {
            return Err(Error::InvalidBoundaries(format!(
                "offset {} decreases ({} < {})",
                i + 1,
                offsets[i + 1],
                offsets[i]
            )));
        }

        Ok(Self { offsets })
    }

    /// The offsets, starting with the origin
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Index of the last boundary
    pub fn last_index(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Find the boundary closest to `value`.
    ///
    /// Values before the first boundary snap to 0 and values past the last one
    /// snap to the last index. Otherwise boundaries are scanned in order until
    /// the first one at or past `value`; the result is whichever of it and its
    /// predecessor is closer, with ties going to the later boundary.
    pub fn nearest_index(&self, value: f64) -> usize {
        let last = self.last_index();
        if value < self.offsets[0] {
            return 0;
        }
        if value > self.offsets[last] {
            return last;
        }

        let mut previous_margin = 0.0_f64;
        for (i, &boundary) in self.offsets.iter().enumerate() {
            let margin = value - boundary;
            if margin <= 0.0 {
                return if previous_margin.abs() >= margin.abs() {
                    i
                } else {
                    i.saturating_sub(1)
                };
            }
            previous_margin = margin;
        }

        last
    }
}

/// Offset and extent of a floating image, in EMU from the worksheet origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorGeometry {
    /// Horizontal offset
    pub x: f64,
    /// Vertical offset
    pub y: f64,
    /// Width
    pub cx: f64,
    /// Height
    pub cy: f64,
}

impl AnchorGeometry {
    /// Create a new anchor geometry
    pub fn new(x: f64, y: f64, cx: f64, cy: f64) -> Self {
        Self { x, y, cx, cy }
    }

    /// Snap this anchor onto the grid.
    ///
    /// The column end gets one extra column while the row end does not: an
    /// image ending near a column line still claims the column it ends in.
    pub fn span(&self, columns: &BoundarySequence, rows: &BoundarySequence) -> GridSpan {
        GridSpan {
            start_col: columns.nearest_index(self.x) as u32,
            start_row: rows.nearest_index(self.y) as u32,
            end_col: columns.nearest_index(self.x + self.cx) as u32 + 1,
            end_row: rows.nearest_index(self.y + self.cy) as u32,
        }
    }

    /// All cells covered by this anchor, columns outer and rows inner
    pub fn covered_cells(
        &self,
        columns: &BoundarySequence,
        rows: &BoundarySequence,
    ) -> Vec<CellReference> {
        self.span(columns, rows).cells()
    }
}

/// A half-open block of grid cells: `start <= index < end` on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpan {
    /// First column (inclusive)
    pub start_col: u32,
    /// Last column (exclusive)
    pub end_col: u32,
    /// First row (inclusive)
    pub start_row: u32,
    /// Last row (exclusive)
    pub end_row: u32,
}

impl GridSpan {
    /// Check if the span covers no cells
    pub fn is_empty(&self) -> bool {
        self.start_col >= self.end_col || self.start_row >= self.end_row
    }

    /// Enumerate the covered cells, columns outer and rows inner
    pub fn cells(&self) -> Vec<CellReference> {
        (self.start_col..self.end_col)
            .flat_map(|col| {
                (self.start_row..self.end_row).map(move |row| CellReference::new(row, col))
            })
            .collect()
    }
}
