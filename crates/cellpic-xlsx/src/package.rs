//! ZIP package access
//!
//! Reads parts out of an OOXML package and writes a patched copy where only
//! the replaced parts are recompressed. Every other entry is copied with
//! `raw_copy_file`, so its compressed bytes and metadata stay identical.

use std::collections::HashMap;
use std::io::{Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::dom::XmlDocument;
use crate::error::{XlsxError, XlsxResult};

/// An opened OOXML package
pub struct Package<R> {
    archive: ZipArchive<R>,
    names: Vec<String>,
}

impl<R: Read + Seek> Package<R> {
    /// Open a package from a reader
    pub fn open(reader: R) -> XlsxResult<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            names.push(archive.by_index_raw(i)?.name().to_string());
        }

        Ok(Self { archive, names })
    }

    /// Entry names in archive order, exactly as stored
    pub fn entry_names(&self) -> &[String] {
        &self.names
    }

    /// The stored name of the entry matching `path`, comparing with `/` separators
    pub fn resolve(&self, path: &str) -> Option<&str> {
        let wanted = normalize_path(path);
        self.names
            .iter()
            .find(|n| normalize_path(n) == wanted)
            .map(String::as_str)
    }

    /// Check if the package has an entry at `path`
    pub fn contains(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    /// Read an entry's bytes
    pub fn read_bytes(&mut self, path: &str) -> XlsxResult<Vec<u8>> {
        let name = self
            .resolve(path)
            .ok_or_else(|| XlsxError::MissingPart(path.to_string()))?
            .to_string();

        let mut file = self.archive.by_name(&name)?;
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Read an entry as UTF-8 text, dropping a leading byte order mark
    pub fn read_text(&mut self, path: &str) -> XlsxResult<String> {
        let bytes = self.read_bytes(path)?;
        let text = String::from_utf8(bytes).map_err(|_| XlsxError::NotUtf8(path.to_string()))?;
        Ok(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }

    /// Read and parse an XML part, or `None` if the package has no such entry
    pub fn read_xml(&mut self, path: &str) -> XlsxResult<Option<XmlDocument>> {
        if !self.contains(path) {
            return Ok(None);
        }
        let text = self.read_text(path)?;
        XmlDocument::parse(path, &text).map(Some)
    }

    /// Write a copy of the package to `writer`, replacing the contents of the
    /// entries named in `replacements` (keyed by stored entry name).
    ///
    /// Entry order is preserved. Returns the writer once the archive is finished.
    pub fn write_patched<W: Write + Seek>(
        &mut self,
        replacements: &HashMap<String, String>,
        writer: W,
    ) -> XlsxResult<W> {
        let mut zip = ZipWriter::new(writer);

        for i in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(i)?;

            if let Some(content) = replacements.get(entry.name()) {
                let name = entry.name().to_string();
                let method = match entry.compression() {
                    CompressionMethod::Stored => CompressionMethod::Stored,
                    _ => CompressionMethod::Deflated,
                };
                let modified = entry.last_modified();
                drop(entry);

                // Keep the source timestamp so equal inputs give equal archives
                let mut options = SimpleFileOptions::default().compression_method(method);
                if let Some(modified) = modified {
                    options = options.last_modified_time(modified);
                }
                zip.start_file(name, options)?;
                zip.write_all(content.as_bytes())?;
                continue;
            }

            // Pass through unmodified entry (raw copy, no re-compression)
            zip.raw_copy_file(entry)?;
        }

        Ok(zip.finish()?)
    }
}

/// Normalize a part path for comparison: `/` separators, no leading slash
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches('/').to_string()
}
