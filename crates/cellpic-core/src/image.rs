//! Image references resolved onto worksheet cells

use crate::cell::CellReference;
use crate::error::{Error, Result};

/// How an image is attached to the worksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// Placed by offset and extent against the grid (drawing anchor)
    Floating,
    /// Embedded once and referenced from cells by a `DISPIMG` formula
    Shared,
}

/// An image file name attached to a specific cell
///
/// These are transient: produced and consumed while one worksheet is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    cell: CellReference,
    kind: ImageKind,
    file_name: String,
}

impl ImageReference {
    /// Create a new image reference
    ///
    /// Fails if `file_name` is empty.
    pub fn new(cell: CellReference, kind: ImageKind, file_name: impl Into<String>) -> Result<Self> {
        let file_name = file_name.into();
        if file_name.is_empty() {
            return Err(Error::EmptyFileName(cell.to_string()));
        }
        Ok(Self {
            cell,
            kind,
            file_name,
        })
    }

    /// The cell this image is attached to
    pub fn cell(&self) -> CellReference {
        self.cell
    }

    /// The attachment mechanism
    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// The image's file name inside the package media folder
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Clone this reference onto another cell
    pub fn moved_to(&self, cell: CellReference) -> Self {
        Self {
            cell,
            kind: self.kind,
            file_name: self.file_name.clone(),
        }
    }
}
