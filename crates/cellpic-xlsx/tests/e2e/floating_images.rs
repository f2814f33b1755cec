//! Floating pictures placed on the grid by their anchor geometry.

use crate::{
    column_values, convert, drawing, relationships, PackageBuilder, DRAWING_REL, IMAGE_REL,
};
use cellpic_xlsx::{ConvertOptions, XlsxError};
use pretty_assertions::assert_eq;

/// Three 72pt (one inch, 914400 EMU) columns and rows.
const INCH_GRID: &str = r#"<cols><col min="1" max="3" width="72" customWidth="1"/></cols><sheetData><row r="1" ht="72" customHeight="1"/><row r="2" ht="72" customHeight="1"/><row r="3" ht="72" customHeight="1"/></sheetData>"#;

fn pairs(values: &[(&str, &str)]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|(r, v)| (r.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_picture_snaps_to_nearest_cell() {
    let bytes = PackageBuilder::new()
        .sheet("sheet1", INCH_GRID)
        .drawing(
            "sheet1",
            &[("rId1", 1_000_000, 0, 200_000, 1_000_000)],
            &[("rId1", "../media/image2.png")],
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.rows_written, 1);
    assert_eq!(
        column_values(&conversion.bytes, "sheet1", "O"),
        pairs(&[("O1", "image2.png")])
    );
}

#[test]
fn test_tall_picture_covers_every_row() {
    let bytes = PackageBuilder::new()
        .sheet("sheet1", INCH_GRID)
        .drawing(
            "sheet1",
            &[("rId1", 0, 0, 100_000, 2_743_200)],
            &[("rId1", "../media/tall.png")],
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert_eq!(
        column_values(&conversion.bytes, "sheet1", "O"),
        pairs(&[("O1", "tall.png"), ("O2", "tall.png"), ("O3", "tall.png")])
    );
}

#[test]
fn test_picture_below_declared_rows_uses_default_height() {
    // 15pt default rows are 190500 EMU; row 10 starts at 1714500
    let bytes = PackageBuilder::new()
        .sheet("sheet1", r#"<sheetData/>"#)
        .drawing(
            "sheet1",
            &[("rId1", 0, 1_714_500, 100, 190_500)],
            &[("rId1", "../media/image1.png")],
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert_eq!(
        column_values(&conversion.bytes, "sheet1", "O"),
        pairs(&[("O10", "image1.png")])
    );
}

#[test]
fn test_floating_picture_overrides_shared_image_in_row() {
    let bytes = PackageBuilder::new()
        .cell_images(&[("ID_A", "rId1")], &[("rId1", "media/a.png")])
        .sheet(
            "sheet1",
            r#"<sheetData><row r="10"><c r="A10" t="str"><f>_xlfn.DISPIMG("ID_A",1)</f></c></row></sheetData>"#,
        )
        .drawing(
            "sheet1",
            &[("rId1", 0, 1_714_500, 100, 190_500)],
            &[("rId1", "../media/b.png")],
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.rows_written, 1);
    assert_eq!(
        column_values(&conversion.bytes, "sheet1", "O"),
        pairs(&[("O10", "b.png")])
    );
}

#[test]
fn test_last_picture_in_row_wins() {
    let bytes = PackageBuilder::new()
        .sheet("sheet1", INCH_GRID)
        .drawing(
            "sheet1",
            &[
                ("rId2", 1_000_000, 0, 200_000, 1_000_000),
                ("rId1", 0, 0, 100_000, 1_000_000),
            ],
            &[("rId1", "../media/left.png"), ("rId2", "../media/right.png")],
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert_eq!(
        column_values(&conversion.bytes, "sheet1", "O"),
        pairs(&[("O1", "left.png")])
    );
}

#[test]
fn test_unknown_blip_is_skipped() {
    let bytes = PackageBuilder::new()
        .sheet("sheet1", INCH_GRID)
        .drawing(
            "sheet1",
            &[("rId7", 0, 0, 100_000, 1_000_000)],
            &[("rId1", "../media/image1.png")],
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.rows_written, 0);
    assert!(column_values(&conversion.bytes, "sheet1", "O").is_empty());
}

#[test]
fn test_missing_drawing_part_is_skipped() {
    let bytes = PackageBuilder::new()
        .sheet("sheet1", INCH_GRID)
        .entry(
            "xl/worksheets/_rels/sheet1.xml.rels",
            &relationships(DRAWING_REL, &[("rId1", "../drawings/drawing9.xml")]),
        )
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.rows_written, 0);
}

#[test]
fn test_chart_anchor_is_ignored() {
    let chart = r#"<xdr:twoCellAnchor><xdr:from/><xdr:to/><xdr:graphicFrame macro=""><xdr:nvGraphicFramePr><xdr:cNvPr id="3" name="Chart 1"/></xdr:nvGraphicFramePr></xdr:graphicFrame><xdr:clientData/></xdr:twoCellAnchor>"#;
    let bytes = PackageBuilder::new()
        .sheet("sheet1", INCH_GRID)
        .entry(
            "xl/worksheets/_rels/sheet1.xml.rels",
            &relationships(DRAWING_REL, &[("rId1", "../drawings/drawing1.xml")]),
        )
        .entry("xl/drawings/drawing1.xml", &drawing(chart))
        .entry("xl/drawings/_rels/drawing1.xml.rels", &relationships(IMAGE_REL, &[]))
        .build();

    let conversion = convert(&bytes, &ConvertOptions::default()).unwrap();

    assert_eq!(conversion.rows_written, 0);
}

#[test]
fn test_malformed_geometry_aborts_conversion() {
    let anchor = r#"<xdr:twoCellAnchor><xdr:pic><xdr:blipFill><a:blip r:embed="rId1"/></xdr:blipFill><xdr:spPr><a:xfrm><a:off x="left" y="0"/><a:ext cx="10" cy="10"/></a:xfrm></xdr:spPr></xdr:pic><xdr:clientData/></xdr:twoCellAnchor>"#;
    let bytes = PackageBuilder::new()
        .sheet("sheet1", INCH_GRID)
        .entry(
            "xl/worksheets/_rels/sheet1.xml.rels",
            &relationships(DRAWING_REL, &[("rId1", "../drawings/drawing1.xml")]),
        )
        .entry("xl/drawings/drawing1.xml", &drawing(anchor))
        .entry(
            "xl/drawings/_rels/drawing1.xml.rels",
            &relationships(IMAGE_REL, &[("rId1", "../media/image1.png")]),
        )
        .build();

    let err = convert(&bytes, &ConvertOptions::default()).unwrap_err();

    match err {
        XlsxError::MalformedGeometry { part, .. } => assert_eq!(part, "xl/drawings/drawing1.xml"),
        other => panic!("expected malformed geometry, got {:?}", other),
    }
}

#[test]
fn test_malformed_row_height_aborts_conversion() {
    let bytes = PackageBuilder::new()
        .sheet("sheet1", r#"<sheetData><row r="1" ht="tall"/></sheetData>"#)
        .drawing(
            "sheet1",
            &[("rId1", 0, 0, 100, 100)],
            &[("rId1", "../media/image1.png")],
        )
        .build();

    assert!(matches!(
        convert(&bytes, &ConvertOptions::default()),
        Err(XlsxError::MalformedGeometry { .. })
    ));
}
