//! Per-row selection of the image to record
//!
//! References are produced in discovery order: formula-scanned shared images,
//! then their merge expansions, then floating images in drawing order. When a
//! row has several, the last one discovered wins regardless of its column, so
//! a floating image overrides a shared one on the same row.

use std::collections::BTreeMap;

use crate::image::ImageReference;

/// Group `references` by row and keep the last one discovered in each row.
///
/// Keys are 0-based row indices in ascending order. Rows without references
/// are absent.
pub fn latest_per_row(references: &[ImageReference]) -> BTreeMap<u32, &ImageReference> {
    let mut rows = BTreeMap::new();
    for reference in references {
        rows.insert(reference.cell().row, reference);
    }
    rows
}
