//! Shared cell images (`xl/cellimages.xml`)
//!
//! Cells reference shared images by name through a `DISPIMG("<name>", ...)`
//! formula. The name is declared on a picture in the cell-image part, and the
//! picture's blip points through the part's relationships to a media file.

use std::collections::HashMap;
use std::io::{Read, Seek};

use log::{debug, warn};

use crate::dom::XmlDocument;
use crate::error::XlsxResult;
use crate::package::Package;
use crate::relationships::{file_name_of, rels_path_for, Relationships, REL_TYPE_IMAGE};

/// Path of the cell-image definitions part
pub const CELL_IMAGES_PART: &str = "xl/cellimages.xml";

/// Resolved mapping from image name to media file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellImageIndex {
    files: HashMap<String, String>,
}

impl CellImageIndex {
    /// Load the index from a package.
    ///
    /// Returns `None` if the package has no cell-image part, in which case
    /// formula references are not looked at all.
    pub fn load<R: Read + Seek>(package: &mut Package<R>) -> XlsxResult<Option<Self>> {
        let Some(images) = package.read_xml(CELL_IMAGES_PART)? else {
            return Ok(None);
        };

        let rels_path = rels_path_for(CELL_IMAGES_PART);
        let Some(rels) = package.read_xml(&rels_path)? else {
            warn!("{} has no relationship part, shared images cannot be resolved", CELL_IMAGES_PART);
            return Ok(Some(Self::default()));
        };

        let index = Self::from_parts(&images, &Relationships::parse(&rels));
        debug!("Resolved {} shared cell images", index.len());
        Ok(Some(index))
    }

    /// Build the index from the definitions part and its relationships
    pub fn from_parts(images: &XmlDocument, rels: &Relationships) -> Self {
        let mut names_by_rid: HashMap<&str, Vec<&str>> = HashMap::new();

        if let Some(root) = images.root() {
            for image in root.descendants("cellImage") {
                let name = image
                    .select_first(&["cNvPr"])
                    .and_then(|e| e.attr_local("name"));
                let rid = image
                    .select_first(&["blipFill", "blip"])
                    .and_then(|e| e.attr_local("embed"));

                if let (Some(name), Some(rid)) = (name, rid) {
                    names_by_rid.entry(rid).or_default().push(name);
                }
            }
        }

        let mut files = HashMap::new();
        for rel in rels.of_type(REL_TYPE_IMAGE) {
            let Some(names) = names_by_rid.get(rel.id.as_str()) else {
                continue;
            };
            let target = file_name_of(&rel.target);
            if target.is_empty() {
                continue;
            }
            for name in names {
                files.insert(name.to_string(), target.to_string());
            }
        }

        Self { files }
    }

    /// File name for an image name
    pub fn file_name(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    /// Number of resolved names
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if nothing resolved
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
