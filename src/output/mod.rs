//! Output writers for coverage data and reports.
//!
//! This module handles writing data to disk in various formats:
//! - Combined coverage data (JSON)
//! - LCOV reports

pub mod json;
pub mod lcov;

// Re-export main functions
pub use json::{read_coverage, write_coverage};
pub use lcov::{relative_name, FileRecord, HitSource, LcovFormatter, LcovTotals};
