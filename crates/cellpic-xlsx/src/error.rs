//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that abort the conversion of a package
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed XML attribute
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Structurally broken XML part
    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    /// Part is not valid UTF-8
    #[error("Part {0} is not valid UTF-8")]
    NotUtf8(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// The package contains no worksheets
    #[error("Invalid XLSX format: no worksheet parts found")]
    NoWorksheets,

    /// A width, height, offset or extent is not a number
    #[error("Malformed geometry in {part}: {detail}")]
    MalformedGeometry {
        /// Part the bad value was read from
        part: String,
        /// What was wrong
        detail: String,
    },

    /// Rejected conversion option
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] cellpic_core::Error),
}

impl XlsxError {
    pub(crate) fn malformed(part: &str, detail: impl Into<String>) -> Self {
        XlsxError::MalformedGeometry {
            part: part.to_string(),
            detail: detail.into(),
        }
    }
}
