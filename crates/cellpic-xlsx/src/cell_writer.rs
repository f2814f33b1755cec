//! Writing the output column into worksheet rows

use cellpic_core::{column, CellReference, MAX_COLS};

use crate::dom::{XmlElement, XmlNode};
use crate::error::{XlsxError, XlsxResult};

/// Worksheet children that come before `sheetData`
const BEFORE_SHEET_DATA: [&str; 5] = ["sheetPr", "dimension", "sheetViews", "sheetFormatPr", "cols"];

/// Writes `prefix + file name` as a string cell in a fixed column
#[derive(Debug, Clone)]
pub struct CellWriter {
    column: u32,
    letters: String,
    prefix: String,
}

impl CellWriter {
    /// Create a writer for a column given as letters (e.g. `"O"`)
    pub fn new(column_letters: &str, prefix: impl Into<String>) -> XlsxResult<Self> {
        let column = column::letters_to_index(column_letters)
            .ok()
            .filter(|&c| c < MAX_COLS)
            .ok_or_else(|| {
                XlsxError::InvalidOption(format!("invalid output column {:?}", column_letters))
            })?;

        Ok(Self {
            column,
            letters: column::index_to_letters(column),
            prefix: prefix.into(),
        })
    }

    /// The value written for a file name
    pub fn value_for(&self, file_name: &str) -> String {
        format!("{}{}", self.prefix, file_name)
    }

    /// Write the value for `file_name` into row `row` (0-based) of a worksheet.
    ///
    /// Missing `sheetData`, rows and cells are created in order. An existing
    /// cell keeps its other attributes but loses its content.
    pub fn write(&self, worksheet: &mut XmlElement, row: u32, file_name: &str) -> XlsxResult<()> {
        let row_number = row + 1;
        let reference = CellReference::new(row, self.column);
        let address = format!("{}{}", self.letters, row_number);

        let sheet_data = sheet_data_mut(worksheet)?;
        let row_el = row_mut(sheet_data, row_number)?;

        let cell = match row_el.find_child(|c| is_cell(c, &reference)) {
            Some(idx) => idx,
            None => {
                let new_cell = XmlElement::new(row_el.sibling_name("c")).with_attr("r", &address);
                let column = self.column;
                let at = row_el
                    .find_child(|c| {
                        c.local_name() == "c" && cell_column(c).is_some_and(|col| col > column)
                    })
                    .unwrap_or(row_el.children().len());
                row_el.insert_child(at, XmlNode::Element(new_cell));
                at
            }
        };

        let value_name = row_el.sibling_name("v");
        let cell = row_el
            .element_at_mut(cell)
            .ok_or_else(|| XlsxError::MissingPart(format!("cell {}", address)))?;
        cell.set_attr("t", "str");
        cell.replace_children(vec![XmlNode::Element(
            XmlElement::new(value_name).with_text(self.value_for(file_name)),
        )]);

        Ok(())
    }
}

fn sheet_data_mut(worksheet: &mut XmlElement) -> XlsxResult<&mut XmlElement> {
    let idx = match worksheet.find_child(|e| e.local_name() == "sheetData") {
        Some(idx) => idx,
        None => {
            let at = worksheet
                .children()
                .iter()
                .rposition(|n| {
                    n.as_element()
                        .is_some_and(|e| BEFORE_SHEET_DATA.contains(&e.local_name()))
                })
                .map_or(0, |i| i + 1);
            let name = worksheet.sibling_name("sheetData");
            worksheet.insert_child(at, XmlNode::Element(XmlElement::new(name)));
            at
        }
    };
    worksheet
        .element_at_mut(idx)
        .ok_or_else(|| XlsxError::MissingPart("sheetData".into()))
}

fn row_mut(sheet_data: &mut XmlElement, row_number: u32) -> XlsxResult<&mut XmlElement> {
    let rows = row_numbers(sheet_data);
    let idx = match rows.iter().find(|&&(_, n)| n == row_number) {
        Some(&(idx, _)) => idx,
        None => {
            // A row following this one always carries an explicit `r`
            let at = rows
                .iter()
                .find(|&&(_, n)| n > row_number)
                .map_or(sheet_data.children().len(), |&(idx, _)| idx);
            let name = sheet_data.sibling_name("row");
            let row = XmlElement::new(name).with_attr("r", row_number.to_string());
            sheet_data.insert_child(at, XmlNode::Element(row));
            at
        }
    };
    sheet_data
        .element_at_mut(idx)
        .ok_or_else(|| XlsxError::MissingPart(format!("row {}", row_number)))
}

/// `(node index, 1-based row number)` of each row. A row without a usable
/// `r` follows the previous one.
fn row_numbers(sheet_data: &XmlElement) -> Vec<(usize, u32)> {
    let mut previous = 0;
    sheet_data
        .children()
        .iter()
        .enumerate()
        .filter_map(|(idx, node)| {
            let row = node.as_element().filter(|e| e.local_name() == "row")?;
            let number = row
                .attr("r")
                .and_then(|r| r.parse::<u32>().ok())
                .unwrap_or(previous + 1);
            previous = number;
            Some((idx, number))
        })
        .collect()
}

fn is_cell(el: &XmlElement, reference: &CellReference) -> bool {
    el.local_name() == "c"
        && el
            .attr("r")
            .and_then(|r| CellReference::parse(r).ok())
            .is_some_and(|r| r == *reference)
}

fn cell_column(el: &XmlElement) -> Option<u32> {
    el.attr("r")
        .and_then(|r| CellReference::parse(r).ok())
        .map(|r| r.col)
}
