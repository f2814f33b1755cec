//! Relationship parts (`_rels/*.rels`)

use std::collections::HashMap;

use crate::dom::XmlDocument;

/// Relationship type suffix for images
pub const REL_TYPE_IMAGE: &str = "/image";

/// Relationship type suffix for drawings
pub const REL_TYPE_DRAWING: &str = "/drawing";

/// A single `Relationship` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g. "rId1")
    pub id: String,
    /// Full relationship type URI
    pub rel_type: String,
    /// Target, as written (usually relative to the owning part's directory)
    pub target: String,
}

impl Relationship {
    /// Check if the relationship type ends with `suffix`
    pub fn is_type(&self, suffix: &str) -> bool {
        self.rel_type.ends_with(suffix)
    }
}

/// Relationships of one owning part, keyed by ID
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
    by_id: HashMap<String, usize>,
}

impl Relationships {
    /// Collect every `Relationship` element with both `Id` and `Target`
    pub fn parse(doc: &XmlDocument) -> Self {
        let mut rels = Self::default();
        let Some(root) = doc.root() else {
            return rels;
        };

        for el in root.descendants("Relationship") {
            let (Some(id), Some(target)) = (el.attr_local("Id"), el.attr_local("Target")) else {
                continue;
            };
            let rel = Relationship {
                id: id.to_string(),
                rel_type: el.attr_local("Type").unwrap_or_default().to_string(),
                target: target.to_string(),
            };
            rels.by_id.insert(rel.id.clone(), rels.entries.len());
            rels.entries.push(rel);
        }

        rels
    }

    /// Look up a relationship by ID
    pub fn by_id(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// Relationships whose type ends with `suffix`, in document order
    pub fn of_type<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.entries.iter().filter(move |r| r.is_type(suffix))
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no relationships
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Path of the relationship part for `part`:
/// `xl/worksheets/sheet1.xml` becomes `xl/worksheets/_rels/sheet1.xml.rels`
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the directory of `source_part`.
///
/// Absolute targets (leading `/`) are package-rooted. `.` and `..`
/// segments are collapsed.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    let target = target.replace('\\', "/");

    let mut segments: Vec<&str> = Vec::new();
    if !target.starts_with('/') {
        if let Some((dir, _)) = source_part.rsplit_once('/') {
            segments.extend(dir.split('/').filter(|s| !s.is_empty()));
        }
    }

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    segments.join("/")
}

/// Last path segment of a target
pub fn file_name_of(target: &str) -> &str {
    target
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(target)
}
