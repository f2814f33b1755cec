//! Cell addressing
//!
//! This module contains:
//! - [`CellReference`] - A cell's location (e.g., "O7")
//! - [`CellRange`] - A rectangular range of cells (e.g., "A5:A7")

mod address;

pub use address::{CellRange, CellRangeIterator, CellReference};
