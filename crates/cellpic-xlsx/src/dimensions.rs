//! Column widths and row heights of a worksheet
//!
//! Sizes are read from `cols/col` and `sheetData/row`, with `sheetFormatPr`
//! supplying the defaults for everything not declared. Widths are taken as
//! points like heights are; this is an approximation of how spreadsheet
//! applications convert character widths, and it is what the anchor mapping
//! is calibrated against.

use std::collections::BTreeMap;

use cellpic_core::geometry::points_to_emu;
use cellpic_core::{BoundarySequence, MAX_COLS, MAX_ROWS};

use crate::dom::XmlElement;
use crate::error::{XlsxError, XlsxResult};

/// Default column width when the sheet declares none
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Default row height when the sheet declares none
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;

/// Declared sizes of one worksheet, in points, keyed by 1-based index
#[derive(Debug, Clone, PartialEq)]
pub struct SheetDimensions {
    default_column_width: f64,
    default_row_height: f64,
    columns: BTreeMap<u32, f64>,
    rows: BTreeMap<u32, f64>,
}

impl SheetDimensions {
    /// Read the declared sizes from a worksheet root.
    ///
    /// `part` names the worksheet in errors.
    pub fn read(part: &str, worksheet: &XmlElement) -> XlsxResult<Self> {
        let format = worksheet.child("sheetFormatPr");
        let default_column_width = match format.and_then(|f| f.attr("defaultColWidth")) {
            Some(v) => parse_number(part, "defaultColWidth", v)?,
            None => DEFAULT_COLUMN_WIDTH,
        };
        let default_row_height = match format.and_then(|f| f.attr("defaultRowHeight")) {
            Some(v) => parse_number(part, "defaultRowHeight", v)?,
            None => DEFAULT_ROW_HEIGHT,
        };

        let mut columns = BTreeMap::new();
        for col in worksheet.select(&["cols", "col"]) {
            let min = parse_index(part, "col@min", col.attr("min"), MAX_COLS)?;
            let max = match col.attr("max") {
                Some(_) => parse_index(part, "col@max", col.attr("max"), MAX_COLS)?,
                None => min,
            };
            let width = if is_hidden(col) {
                0.0
            } else {
                match col.attr("width") {
                    Some(v) => parse_number(part, "col@width", v)?,
                    None => default_column_width,
                }
            };
            for index in min..=max {
                columns.insert(index, width);
            }
        }

        let mut rows = BTreeMap::new();
        let mut previous = 0;
        for row in worksheet.select(&["sheetData", "row"]) {
            let index = match row.attr("r") {
                Some(_) => parse_index(part, "row@r", row.attr("r"), MAX_ROWS)?,
                None => previous + 1,
            };
            previous = index;

            let height = if is_hidden(row) {
                0.0
            } else {
                match row.attr("ht") {
                    Some(v) => parse_number(part, "row@ht", v)?,
                    None => default_row_height,
                }
            };
            rows.insert(index, height);
        }

        Ok(Self {
            default_column_width,
            default_row_height,
            columns,
            rows,
        })
    }

    /// Width of a column (1-based) in points
    pub fn column_width(&self, index: u32) -> f64 {
        self.columns
            .get(&index)
            .copied()
            .unwrap_or(self.default_column_width)
    }

    /// Height of a row (1-based) in points
    pub fn row_height(&self, index: u32) -> f64 {
        self.rows
            .get(&index)
            .copied()
            .unwrap_or(self.default_row_height)
    }

    /// Column boundaries covering every declared column and reaching at least
    /// `extent` EMU from the origin
    pub fn column_boundaries(&self, extent: f64) -> BoundarySequence {
        let last = self.columns.keys().next_back().copied().unwrap_or(0);
        BoundarySequence::from_sizes(sizes_until(extent, last, MAX_COLS, |i| {
            self.column_width(i)
        }))
    }

    /// Row boundaries covering every declared row and reaching at least
    /// `extent` EMU from the origin
    pub fn row_boundaries(&self, extent: f64) -> BoundarySequence {
        let last = self.rows.keys().next_back().copied().unwrap_or(0);
        BoundarySequence::from_sizes(sizes_until(extent, last, MAX_ROWS, |i| self.row_height(i)))
    }
}

fn sizes_until<F>(extent: f64, last_declared: u32, limit: u32, size_of: F) -> Vec<f64>
where
    F: Fn(u32) -> f64,
{
    let mut sizes = Vec::new();
    let mut total = 0.0;
    let mut index = 1;

    while index <= limit && (index <= last_declared || points_to_emu(total) < extent) {
        let size = size_of(index);
        if size > 0.0 {
            total += size;
        }
        sizes.push(size);
        index += 1;
    }

    sizes
}

fn is_hidden(el: &XmlElement) -> bool {
    matches!(el.attr("hidden"), Some("1") | Some("true"))
}

fn parse_number(part: &str, what: &str, value: &str) -> XlsxResult<f64> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(XlsxError::malformed(
            part,
            format!("{} is not a number: {:?}", what, value),
        )),
    }
}

fn parse_index(part: &str, what: &str, value: Option<&str>, limit: u32) -> XlsxResult<u32> {
    let value = value.ok_or_else(|| XlsxError::malformed(part, format!("{} is missing", what)))?;
    match value.trim().parse::<u32>() {
        Ok(n) if (1..=limit).contains(&n) => Ok(n),
        _ => Err(XlsxError::malformed(
            part,
            format!("{} is not a valid index: {:?}", what, value),
        )),
    }
}
