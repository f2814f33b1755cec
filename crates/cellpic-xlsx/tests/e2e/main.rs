//! End-to-end tests for cellpic-xlsx.
//!
//! Each test builds the exact package it needs in memory, converts it and
//! inspects the rewritten archive.

mod floating_images;
mod packaging;
mod shared_images;

// Re-export common utilities for submodules
pub use common::*;
