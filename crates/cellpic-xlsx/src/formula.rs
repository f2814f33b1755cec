//! `DISPIMG` formula scanning

use std::sync::OnceLock;

use cellpic_core::{CellReference, ImageKind, ImageReference};
use log::debug;
use regex::Regex;

use crate::cell_images::CellImageIndex;
use crate::dom::XmlElement;
use crate::error::XlsxResult;

static DISPIMG: OnceLock<Regex> = OnceLock::new();

fn dispimg_regex() -> &'static Regex {
    DISPIMG.get_or_init(|| {
        // Literal pattern, cannot fail to compile
        Regex::new(r#"\bDISPIMG\("([^"]+)"#).unwrap_or_else(|e| panic!("invalid DISPIMG regex: {e}"))
    })
}

/// Extract the image name from a `DISPIMG("<name>", ...)` formula
///
/// # Examples
/// ```
/// use cellpic_xlsx::formula::dispimg_id;
///
/// assert_eq!(dispimg_id(r#"_xlfn.DISPIMG("ID_1F2E",1)"#), Some("ID_1F2E"));
/// assert_eq!(dispimg_id("SUM(A1:A3)"), None);
/// ```
pub fn dispimg_id(formula: &str) -> Option<&str> {
    dispimg_regex()
        .captures(formula)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Result of scanning a worksheet's cells
#[derive(Debug, Default)]
pub struct FormulaScan {
    /// Shared-image references, in document order
    pub references: Vec<ImageReference>,
    /// Image names with no resolved file
    pub warnings: Vec<String>,
}

/// Scan every `sheetData/row/c` of a worksheet for `DISPIMG` formulas.
///
/// The cell's formula is checked first. Its cached value is checked when the
/// formula is missing, empty (shared formulas) or has no `DISPIMG` call.
pub fn scan_worksheet(worksheet: &XmlElement, index: &CellImageIndex) -> XlsxResult<FormulaScan> {
    let mut scan = FormulaScan::default();

    for cell in worksheet.select(&["sheetData", "row", "c"]) {
        let formula = cell.child("f").map(|f| f.text());
        let value = cell.child("v").map(|v| v.text());
        let Some(id) = formula
            .as_deref()
            .and_then(dispimg_id)
            .or_else(|| value.as_deref().and_then(dispimg_id))
        else {
            continue;
        };

        let Some(address) = cell.attr("r") else {
            debug!("Skipping DISPIMG cell without a reference");
            continue;
        };
        let Ok(reference) = CellReference::parse(address) else {
            debug!("Skipping DISPIMG cell with unparsable reference {}", address);
            continue;
        };

        match index.file_name(id) {
            Some(file_name) => scan.references.push(ImageReference::new(
                reference,
                ImageKind::Shared,
                file_name,
            )?),
            None => scan.warnings.push(format!("Image file for {} not found", id)),
        }
    }

    Ok(scan)
}
