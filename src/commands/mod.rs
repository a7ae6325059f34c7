//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod combine;
pub mod models;
pub mod report;
pub mod utils;

// Re-export main command functions
pub use combine::{execute_combine, validate_args, CombineSummary};
pub use models::{CombineArgs, LcovArgs, ReportArgs, ReportInput};
pub use report::{execute_lcov, execute_report};
pub use utils::{display_version, load_settings, validate_profile_file};
