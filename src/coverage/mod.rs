//! Coverage derived from reconciled profiles.
//!
//! This module handles:
//! - Deciding which source lines are statements
//! - Executed lines and arcs per script
//! - The combined, mergeable coverage data

pub mod data;
pub mod executable;
pub mod lines;

// Re-export main types and functions
pub use data::{CoverageData, FileCoverage};
pub use executable::{find_executable_files, ExecutableLines};
pub use lines::{arcs, executed_lines, line_count, profiled_statements};
