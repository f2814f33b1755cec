//! Archive-level behaviour: untouched entries, ordering, failures.

use std::io::{Cursor, Read};

use crate::{convert, read_entry, row_cells, worksheet, PackageBuilder};
use cellpic_xlsx::{ConvertOptions, XlsxError};
use pretty_assertions::assert_eq;
use zip::ZipArchive;

/// `(name, crc32, raw compressed bytes)` of every entry, in archive order.
fn raw_entries(bytes: &[u8]) -> Vec<(String, u32, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index_raw(i).unwrap();
            let mut raw = Vec::new();
            file.read_to_end(&mut raw).unwrap();
            (file.name().to_string(), file.crc32(), raw)
        })
        .collect()
}

fn sample() -> Vec<u8> {
    PackageBuilder::new()
        .cell_images(&[("ID_1", "rId1")], &[("rId1", "media/image1.png")])
        .stored_entry("xl/media/image1.png", "\u{89}PNG fake image data")
        .sheet(
            "sheet1",
            r#"<sheetData><row r="2"><c r="A2"><v>a</v></c><c r="B2" t="str"><f>_xlfn.DISPIMG("ID_1",1)</f></c><c r="Q2"><v>q</v></c></row></sheetData>"#,
        )
        .entry("docProps/app.xml", "<Properties/>")
        .build()
}

#[test]
fn test_untouched_entries_are_byte_identical() {
    let input = sample();
    let conversion = convert(&input, &ConvertOptions::default()).unwrap();

    let before = raw_entries(&input);
    let after = raw_entries(&conversion.bytes);

    let names = |entries: &[(String, u32, Vec<u8>)]| {
        entries.iter().map(|(n, _, _)| n.clone()).collect::<Vec<_>>()
    };
    assert_eq!(names(&before), names(&after));

    for (old, new) in before.iter().zip(&after) {
        if old.0 == "xl/worksheets/sheet1.xml" {
            assert_ne!(old.2, new.2);
        } else {
            assert_eq!(old, new, "entry {} changed", old.0);
        }
    }
}

#[test]
fn test_output_cell_inserted_in_column_order() {
    let conversion = convert(&sample(), &ConvertOptions::default()).unwrap();
    assert_eq!(
        row_cells(&conversion.bytes, "sheet1", 2),
        vec!["A2", "B2", "O2", "Q2"]
    );
}

#[test]
fn test_sheet_without_images_keeps_its_content() {
    let body = r#"<sheetViews><sheetView workbookViewId="0"/></sheetViews><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c></row></sheetData><!-- note --><pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#;
    let input = PackageBuilder::new().sheet("sheet1", body).build();

    let conversion = convert(&input, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.rows_written, 0);
    assert_eq!(
        read_entry(&conversion.bytes, "xl/worksheets/sheet1.xml"),
        worksheet(body)
    );
}

#[test]
fn test_conversion_is_deterministic() {
    let input = sample();
    let first = convert(&input, &ConvertOptions::default()).unwrap();
    let second = convert(&input, &ConvertOptions::default()).unwrap();

    assert_eq!(
        read_entry(&first.bytes, "xl/worksheets/sheet1.xml"),
        read_entry(&second.bytes, "xl/worksheets/sheet1.xml")
    );
}

#[test]
fn test_package_without_worksheets_is_rejected() {
    let input = PackageBuilder::new().build();
    assert!(matches!(
        convert(&input, &ConvertOptions::default()),
        Err(XlsxError::NoWorksheets)
    ));
}

#[test]
fn test_invalid_worksheet_xml_is_rejected() {
    let input = PackageBuilder::new()
        .entry("xl/worksheets/sheet1.xml", "<worksheet><sheetData></worksheet>")
        .build();
    assert!(convert(&input, &ConvertOptions::default()).is_err());
}
