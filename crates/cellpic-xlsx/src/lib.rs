//! # cellpic-xlsx
//!
//! Finds the images in an XLSX package and writes each one's file name into a
//! chosen column of the row it sits on.
//!
//! Two kinds of images are recognised:
//! - shared cell images, referenced from cells by `DISPIMG("<name>", ...)`
//!   formulas and declared in `xl/cellimages.xml`
//! - floating pictures in a worksheet's drawing, placed by offset and extent
//!
//! ## Example
//!
//! ```rust,no_run
//! use cellpic_xlsx::{ConvertOptions, Converter};
//!
//! let options = ConvertOptions::new()
//!     .with_output_column("P")
//!     .with_path_prefix("https://cdn.example.com/{{FILE_NAME}}")
//!     .with_source_path("report.xlsx");
//!
//! let conversion = Converter::new(&options)?.convert_file("report.xlsx")?;
//! std::fs::write("report_with_images.xlsx", &conversion.bytes)?;
//! for warning in &conversion.warnings {
//!     eprintln!("{}", warning);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cell_images;
pub mod cell_writer;
pub mod converter;
pub mod dimensions;
pub mod dom;
pub mod drawing;
pub mod error;
pub mod formula;
pub mod options;
pub mod package;
pub mod relationships;

pub use cell_images::CellImageIndex;
pub use cell_writer::CellWriter;
pub use converter::{Conversion, Converter};
pub use dom::{XmlDocument, XmlElement, XmlNode};
pub use error::{XlsxError, XlsxResult};
pub use options::ConvertOptions;
pub use package::Package;
