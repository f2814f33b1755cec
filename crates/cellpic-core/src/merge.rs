//! Shared-image propagation across merged ranges
//!
//! A `DISPIMG` formula lives only in the top-left cell of a merge, but the
//! image visually belongs to every row the merge spans.

use crate::cell::CellRange;
use crate::image::{ImageKind, ImageReference};

/// Clone shared-image references from merge start cells onto the rest of each merge.
///
/// Only the references in `scanned` are considered as sources, and only shared
/// ones: floating anchors already cover the area they are drawn over. The
/// returned clones are in merge declaration order, row-major within a merge,
/// and never include the start cell itself.
pub fn expand_merges(scanned: &[ImageReference], merges: &[CellRange]) -> Vec<ImageReference> {
    let mut expanded = Vec::new();

    for merge in merges {
        let Some(source) = scanned
            .iter()
            .find(|r| r.kind() == ImageKind::Shared && r.cell() == merge.start)
        else {
            continue;
        };

        expanded.extend(
            merge
                .cells()
                .skip(1)
                .map(|cell| source.moved_to(cell)),
        );
    }

    expanded
}
