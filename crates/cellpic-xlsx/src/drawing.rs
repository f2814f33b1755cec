//! Floating pictures from a worksheet's drawing parts
//!
//! The chain is: worksheet, its relationships, the drawing parts they point
//! to, and each drawing's own relationships, where the picture's blip id
//! names the media file.

use std::io::{Read, Seek};

use cellpic_core::AnchorGeometry;
use log::{debug, warn};

use crate::dom::XmlElement;
use crate::error::{XlsxError, XlsxResult};
use crate::package::Package;
use crate::relationships::{
    file_name_of, rels_path_for, resolve_target, Relationships, REL_TYPE_DRAWING,
};

/// Anchor elements that can hold a picture
const ANCHORS: [&str; 3] = ["twoCellAnchor", "oneCellAnchor", "absoluteAnchor"];

/// A picture placed on a worksheet by offset and extent
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingImage {
    /// Media file name
    pub file_name: String,
    /// Position and size in EMU
    pub anchor: AnchorGeometry,
}

/// Collect the floating pictures of a worksheet, in drawing then anchor order.
///
/// A missing link anywhere in the chain yields no pictures for that drawing.
pub fn floating_images<R: Read + Seek>(
    package: &mut Package<R>,
    sheet_part: &str,
) -> XlsxResult<Vec<FloatingImage>> {
    let sheet_rels_path = rels_path_for(sheet_part);
    let Some(sheet_rels) = package.read_xml(&sheet_rels_path)? else {
        debug!("{} has no relationships", sheet_part);
        return Ok(Vec::new());
    };
    let sheet_rels = Relationships::parse(&sheet_rels);

    let mut images = Vec::new();
    for rel in sheet_rels.of_type(REL_TYPE_DRAWING) {
        let drawing_part = resolve_target(sheet_part, &rel.target);

        let Some(drawing) = package.read_xml(&drawing_part)? else {
            warn!("Drawing {} referenced by {} not found", drawing_part, sheet_part);
            continue;
        };
        let Some(drawing_rels) = package.read_xml(&rels_path_for(&drawing_part))? else {
            warn!("Drawing {} has no relationships", drawing_part);
            continue;
        };
        let drawing_rels = Relationships::parse(&drawing_rels);

        let Some(root) = drawing.root() else {
            continue;
        };
        for anchor in root.elements().filter(|e| ANCHORS.contains(&e.local_name())) {
            if let Some(image) = read_anchor(&drawing_part, anchor, &drawing_rels)? {
                images.push(image);
            }
        }
    }

    debug!("{} has {} floating pictures", sheet_part, images.len());
    Ok(images)
}

fn read_anchor(
    part: &str,
    anchor: &XmlElement,
    rels: &Relationships,
) -> XlsxResult<Option<FloatingImage>> {
    // Charts, shapes and linked pictures carry no embedded blip
    let Some(pic) = anchor.select_first(&["pic"]) else {
        return Ok(None);
    };
    let Some(rid) = pic
        .select_first(&["blipFill", "blip"])
        .and_then(|b| b.attr_local("embed"))
    else {
        return Ok(None);
    };

    let xfrm = pic
        .select_first(&["spPr", "xfrm"])
        .ok_or_else(|| XlsxError::malformed(part, format!("picture {} has no xfrm", rid)))?;
    let off = xfrm
        .child("off")
        .ok_or_else(|| XlsxError::malformed(part, format!("picture {} has no offset", rid)))?;
    let ext = xfrm
        .child("ext")
        .ok_or_else(|| XlsxError::malformed(part, format!("picture {} has no extent", rid)))?;

    let geometry = AnchorGeometry::new(
        coordinate(part, off, "x")?,
        coordinate(part, off, "y")?,
        coordinate(part, ext, "cx")?,
        coordinate(part, ext, "cy")?,
    );

    let Some(rel) = rels.by_id(rid) else {
        warn!("Picture {} in {} has no relationship", rid, part);
        return Ok(None);
    };
    let file_name = file_name_of(&rel.target);
    if file_name.is_empty() {
        warn!("Picture {} in {} has an empty target", rid, part);
        return Ok(None);
    }

    Ok(Some(FloatingImage {
        file_name: file_name.to_string(),
        anchor: geometry,
    }))
}

fn coordinate(part: &str, el: &XmlElement, name: &str) -> XlsxResult<f64> {
    let value = el
        .attr(name)
        .ok_or_else(|| XlsxError::malformed(part, format!("{}@{} is missing", el.name(), name)))?;
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(XlsxError::malformed(
            part,
            format!("{}@{} is not a number: {:?}", el.name(), name, value),
        )),
    }
}
