//! Package conversion
//!
//! Every worksheet is rewritten in memory before anything is written out, so
//! a failure in any sheet produces no output at all.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use std::sync::OnceLock;

use cellpic_core::consolidate::latest_per_row;
use cellpic_core::merge::expand_merges;
use cellpic_core::{CellRange, ImageKind, ImageReference};
use log::{debug, info};
use regex::Regex;

use crate::cell_images::CellImageIndex;
use crate::cell_writer::CellWriter;
use crate::dimensions::SheetDimensions;
use crate::dom::{XmlDocument, XmlElement};
use crate::drawing::{floating_images, FloatingImage};
use crate::error::{XlsxError, XlsxResult};
use crate::formula::scan_worksheet;
use crate::options::ConvertOptions;
use crate::package::{normalize_path, Package};

static WORKSHEET_PART: OnceLock<Regex> = OnceLock::new();

/// Check if an entry name is a worksheet part (`xl/worksheets/<word>.xml`)
pub fn is_worksheet_part(name: &str) -> bool {
    WORKSHEET_PART
        .get_or_init(|| {
            Regex::new(r"^xl/worksheets/\w+\.xml$")
                .unwrap_or_else(|e| panic!("invalid worksheet regex: {e}"))
        })
        .is_match(&normalize_path(name))
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    /// The rewritten package
    pub bytes: Vec<u8>,
    /// Non-fatal problems, in discovery order
    pub warnings: Vec<String>,
    /// Number of rows that received a file name, over all worksheets
    pub rows_written: usize,
}

/// Rewrites packages so each row with an image records the image's file name
#[derive(Debug, Clone)]
pub struct Converter {
    writer: CellWriter,
}

impl Converter {
    /// Create a converter. Fails if the output column is not valid.
    pub fn new(options: &ConvertOptions) -> XlsxResult<Self> {
        let writer = CellWriter::new(&options.output_column, options.resolved_prefix())?;
        Ok(Self { writer })
    }

    /// Convert the package at `path`
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> XlsxResult<Conversion> {
        let file = File::open(path.as_ref())?;
        let conversion = self.convert(BufReader::new(file))?;
        info!(
            "Converted {}: {} rows, {} warnings",
            path.as_ref().display(),
            conversion.rows_written,
            conversion.warnings.len()
        );
        Ok(conversion)
    }

    /// Convert a package held in memory
    pub fn convert_bytes(&self, bytes: &[u8]) -> XlsxResult<Conversion> {
        self.convert(Cursor::new(bytes))
    }

    /// Convert a package from a reader
    pub fn convert<R: Read + Seek>(&self, reader: R) -> XlsxResult<Conversion> {
        let mut package = Package::open(reader)?;

        let sheets: Vec<String> = package
            .entry_names()
            .iter()
            .filter(|n| is_worksheet_part(n))
            .cloned()
            .collect();
        if sheets.is_empty() {
            return Err(XlsxError::NoWorksheets);
        }

        // Shared cell images (absent part means formulas are not scanned)
        let index = CellImageIndex::load(&mut package)?;

        let mut warnings = Vec::new();
        let mut rows_written = 0;
        let mut replacements = HashMap::new();

        for sheet in &sheets {
            let (xml, rows) = self.convert_sheet(&mut package, sheet, index.as_ref(), &mut warnings)?;
            rows_written += rows;
            replacements.insert(sheet.clone(), xml);
        }

        // Only now is the output assembled
        let bytes = package
            .write_patched(&replacements, Cursor::new(Vec::new()))?
            .into_inner();

        Ok(Conversion {
            bytes,
            warnings,
            rows_written,
        })
    }

    fn convert_sheet<R: Read + Seek>(
        &self,
        package: &mut Package<R>,
        part: &str,
        index: Option<&CellImageIndex>,
        warnings: &mut Vec<String>,
    ) -> XlsxResult<(String, usize)> {
        let text = package.read_text(part)?;
        let mut doc = XmlDocument::parse(part, &text)?;
        let root = doc
            .root()
            .ok_or_else(|| XlsxError::MissingPart(part.to_string()))?;

        // Formula-referenced shared images, then their merge expansions
        let mut references = match index {
            Some(index) => {
                let scan = scan_worksheet(root, index)?;
                warnings.extend(scan.warnings);
                scan.references
            }
            None => Vec::new(),
        };
        let expanded = expand_merges(&references, &merge_ranges(root));
        references.extend(expanded);
        let shared = references.len();

        // Floating pictures, mapped onto the grid
        let floating = floating_images(package, part)?;
        if !floating.is_empty() {
            references.extend(place_floating(part, root, &floating)?);
        }

        debug!(
            "{}: {} shared and {} floating references",
            part,
            shared,
            references.len() - shared
        );

        let chosen = latest_per_row(&references);
        let root = doc
            .root_mut()
            .ok_or_else(|| XlsxError::MissingPart(part.to_string()))?;
        for (&row, reference) in &chosen {
            self.writer.write(root, row, reference.file_name())?;
        }

        Ok((doc.to_xml_string()?, chosen.len()))
    }
}

fn merge_ranges(worksheet: &XmlElement) -> Vec<CellRange> {
    worksheet
        .select(&["mergeCells", "mergeCell"])
        .into_iter()
        .filter_map(|m| {
            let r = m.attr("ref")?;
            match CellRange::parse(r) {
                Ok(range) => Some(range),
                Err(e) => {
                    debug!("Skipping merge {:?}: {}", r, e);
                    None
                }
            }
        })
        .collect()
}

fn place_floating(
    part: &str,
    worksheet: &XmlElement,
    images: &[FloatingImage],
) -> XlsxResult<Vec<ImageReference>> {
    let dimensions = SheetDimensions::read(part, worksheet)?;

    let (width, height) = images.iter().fold((0.0_f64, 0.0_f64), |(w, h), img| {
        (
            w.max(img.anchor.x + img.anchor.cx),
            h.max(img.anchor.y + img.anchor.cy),
        )
    });
    let columns = dimensions.column_boundaries(width);
    let rows = dimensions.row_boundaries(height);

    let mut references = Vec::new();
    for image in images {
        for cell in image.anchor.covered_cells(&columns, &rows) {
            references.push(ImageReference::new(
                cell,
                ImageKind::Floating,
                image.file_name.as_str(),
            )?);
        }
    }
    Ok(references)
}
