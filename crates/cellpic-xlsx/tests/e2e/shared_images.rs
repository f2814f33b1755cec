//! Shared cell images referenced by `DISPIMG` formulas.

use crate::{column_values, convert, PackageBuilder};
use cellpic_xlsx::ConvertOptions;
use pretty_assertions::assert_eq;

fn dispimg(cell: &str, id: &str) -> String {
    format!(
        r#"<c r="{}" t="str"><f>_xlfn.DISPIMG("{}",1)</f><v>=DISPIMG("{}",1)</v></c>"#,
        cell, id, id
    )
}

fn pairs(values: &[(&str, &str)]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|(r, v)| (r.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_shared_image_written_to_default_column() {
    let bytes = PackageBuilder::new()
        .cell_images(&[("ID_1", "rId1")], &[("rId1", "media/image1.png")])
        .sheet(
            "sheet1",
            &format!(
                r#"<sheetData><row r="1"><c r="A1"><v>1</v></c></row><row r="2">{}</row></sheetData>"#,
                dispimg("A2", "ID_1")
            ),
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert!(conversion.warnings.is_empty());
    assert_eq!(conversion.rows_written, 1);
    assert_eq!(
        column_values(&conversion.bytes, "sheet1", "O"),
        pairs(&[("O2", "image1.png")])
    );
}

#[test]
fn test_merge_expansion_fills_every_row() {
    let bytes = PackageBuilder::new()
        .cell_images(&[("ID_1", "rId1")], &[("rId1", "media/img1.png")])
        .sheet(
            "sheet1",
            &format!(
                r#"<sheetData><row r="5">{}</row><row r="6"><c r="A6"/></row></sheetData><mergeCells count="2"><mergeCell ref="A5:A7"/><mergeCell ref="bogus"/></mergeCells>"#,
                dispimg("A5", "ID_1")
            ),
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.rows_written, 3);
    assert_eq!(
        column_values(&conversion.bytes, "sheet1", "O"),
        pairs(&[("O5", "img1.png"), ("O6", "img1.png"), ("O7", "img1.png")])
    );
}

#[test]
fn test_unresolved_identifier_warns_and_skips_cell() {
    let bytes = PackageBuilder::new()
        .cell_images(&[("ID_1", "rId1")], &[("rId1", "media/image1.png")])
        .sheet(
            "sheet1",
            &format!(
                r#"<sheetData><row r="2">{}</row><row r="3">{}</row></sheetData>"#,
                dispimg("A2", "ID_GONE"),
                dispimg("A3", "ID_1")
            ),
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.warnings, vec!["Image file for ID_GONE not found"]);
    assert_eq!(
        column_values(&conversion.bytes, "sheet1", "O"),
        pairs(&[("O3", "image1.png")])
    );
}

#[test]
fn test_prefix_and_column_options() {
    let bytes = PackageBuilder::new()
        .cell_images(&[("ID_1", "rId1")], &[("rId1", "media/image1.png")])
        .sheet(
            "sheet1",
            &format!(r#"<sheetData><row r="4">{}</row></sheetData>"#, dispimg("B4", "ID_1")),
        )
        .build();

    let options = ConvertOptions::new()
        .with_output_column("c")
        .with_path_prefix("https://cdn.example.com/{{FILE_NAME}}")
        .with_source_path("/tmp/My Book.xlsx");
    let conversion = convert(&bytes, &options).unwrap();

    assert_eq!(
        column_values(&conversion.bytes, "sheet1", "C"),
        pairs(&[("C4", "https://cdn.example.com/My%20Book/image1.png")])
    );
}

#[test]
fn test_formulas_ignored_without_cell_image_part() {
    let bytes = PackageBuilder::new()
        .sheet(
            "sheet1",
            &format!(r#"<sheetData><row r="1">{}</row></sheetData>"#, dispimg("A1", "ID_1")),
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert!(conversion.warnings.is_empty());
    assert_eq!(conversion.rows_written, 0);
    assert!(column_values(&conversion.bytes, "sheet1", "O").is_empty());
}

#[test]
fn test_cell_image_part_without_relationships() {
    let bytes = PackageBuilder::new()
        .entry(
            "xl/cellimages.xml",
            r#"<etc:cellImages xmlns:etc="urn:etc"><etc:cellImage/></etc:cellImages>"#,
        )
        .sheet(
            "sheet1",
            &format!(r#"<sheetData><row r="1">{}</row></sheetData>"#, dispimg("A1", "ID_1")),
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.warnings, vec!["Image file for ID_1 not found"]);
    assert_eq!(conversion.rows_written, 0);
}

#[test]
fn test_each_worksheet_converted() {
    let bytes = PackageBuilder::new()
        .cell_images(
            &[("ID_1", "rId1"), ("ID_2", "rId2")],
            &[("rId1", "media/image1.png"), ("rId2", "media/image2.png")],
        )
        .sheet(
            "sheet1",
            &format!(r#"<sheetData><row r="1">{}</row></sheetData>"#, dispimg("A1", "ID_1")),
        )
        .sheet(
            "sheet2",
            &format!(r#"<sheetData><row r="9">{}</row></sheetData>"#, dispimg("D9", "ID_2")),
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.rows_written, 2);
    assert_eq!(
        column_values(&conversion.bytes, "sheet1", "O"),
        pairs(&[("O1", "image1.png")])
    );
    assert_eq!(
        column_values(&conversion.bytes, "sheet2", "O"),
        pairs(&[("O9", "image2.png")])
    );
}
