//! # cellpic-core
//!
//! Core data structures and algorithms for the cellpic image-to-cell engine.
//!
//! This crate has no knowledge of ZIP containers or XML. It provides:
//! - [`CellReference`] and [`CellRange`] - Cell addressing (e.g. "O7", "A5:A7")
//! - [`column`] - Bijective base-26 column letter codec
//! - [`ImageReference`] - An image resolved onto a cell
//! - [`geometry`] - Boundary sequences and anchor-to-cell mapping
//! - [`merge`] - Propagation of shared images across merged ranges
//! - [`consolidate`] - Per-row selection of the winning image
//!
//! ## Example
//!
//! ```rust
//! use cellpic_core::{CellReference, ImageKind, ImageReference};
//! use cellpic_core::consolidate::latest_per_row;
//!
//! let refs = vec![
//!     ImageReference::new(CellReference::parse("A10").unwrap(), ImageKind::Shared, "a.png").unwrap(),
//!     ImageReference::new(CellReference::parse("C10").unwrap(), ImageKind::Floating, "b.png").unwrap(),
//! ];
//!
//! let rows = latest_per_row(&refs);
//! assert_eq!(rows[&9].file_name(), "b.png");
//! ```

pub mod cell;
pub mod column;
pub mod consolidate;
pub mod error;
pub mod geometry;
pub mod image;
pub mod merge;

// Re-exports for convenience
pub use cell::{CellRange, CellReference};
pub use error::{Error, Result};
pub use geometry::{AnchorGeometry, BoundarySequence, EMU_PER_POINT};
pub use image::{ImageKind, ImageReference};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;
