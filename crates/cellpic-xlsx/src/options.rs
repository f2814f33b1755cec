//! Conversion options

use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Placeholder in the prefix replaced by the source base name
pub const FILE_NAME_PLACEHOLDER: &str = "{{FILE_NAME}}";

/// Characters escaped in a URI component (everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`)
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Options for converting one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Column that receives the file names (default: "O")
    pub output_column: String,
    /// Prefix written before each file name (default: empty)
    pub path_prefix: String,
    /// Base name of the source file, substituted for `{{FILE_NAME}}` in the prefix
    pub source_base_name: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_column: "O".to_string(),
            path_prefix: String::new(),
            source_base_name: String::new(),
        }
    }
}

impl ConvertOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the output column
    pub fn with_output_column(mut self, column: impl Into<String>) -> Self {
        self.output_column = column.into();
        self
    }

    /// Builder: set the path prefix
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    /// Builder: set the source base name
    pub fn with_source_base_name(mut self, name: impl Into<String>) -> Self {
        self.source_base_name = name.into();
        self
    }

    /// Builder: take the source base name from a file path
    pub fn with_source_path(self, path: impl AsRef<Path>) -> Self {
        let name = base_name_of(path.as_ref());
        self.with_source_base_name(name)
    }

    /// The prefix as written into cells.
    ///
    /// `{{FILE_NAME}}` becomes the percent-encoded source base name, and a
    /// prefix that contains `/` always ends with one.
    ///
    /// # Examples
    /// ```
    /// use cellpic_xlsx::ConvertOptions;
    ///
    /// let options = ConvertOptions::new()
    ///     .with_path_prefix("https://cdn.example.com/{{FILE_NAME}}")
    ///     .with_source_base_name("Q3 report");
    /// assert_eq!(options.resolved_prefix(), "https://cdn.example.com/Q3%20report/");
    /// ```
    pub fn resolved_prefix(&self) -> String {
        let encoded = utf8_percent_encode(&self.source_base_name, URI_COMPONENT).to_string();
        let mut prefix = self.path_prefix.replace(FILE_NAME_PLACEHOLDER, &encoded);
        if prefix.contains('/') && !prefix.ends_with('/') {
            prefix.push('/');
        }
        prefix
    }
}

/// Base name of a path: its file name up to the first `.`
///
/// # Examples
/// ```
/// use cellpic_xlsx::options::base_name_of;
/// use std::path::Path;
///
/// assert_eq!(base_name_of(Path::new("/data/sales.2024.xlsx")), "sales");
/// ```
pub fn base_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .and_then(|n| n.split('.').next().map(str::to_string))
        .unwrap_or_default()
}
