use crate::utils::config::DEFAULT_DATA_FILE;
use std::path::PathBuf;

/// Arguments for the combine command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct CombineArgs {
    /// Profiles and data files to combine (directories are searched for
    /// data files)
    pub inputs: Vec<PathBuf>,

    /// Combined data file to write
    pub data_file: PathBuf,

    /// Merge into the existing data file instead of replacing it
    pub append: bool,

    /// Record arcs instead of lines
    pub branch: bool,
}

impl Default for CombineArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            append: false,
            branch: false,
        }
    }
}

/// Where a report takes its execution data from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportInput {
    /// A profile report; counts are exact
    Profile(PathBuf),
    /// A combined data file; lines are executed or not
    Data(PathBuf),
}

/// Arguments for the lcov command
#[derive(Debug, Clone)]
pub struct LcovArgs {
    pub input: ReportInput,

    /// Output path for the LCOV report
    pub output: PathBuf,

    /// Directory whose `*.vim` files are reported even if never run
    pub source: Option<PathBuf>,

    /// Written to every `TN:` line
    pub test_name: Option<String>,

    /// Fail when total coverage is below this percentage
    pub fail_under: Option<f64>,
}

impl Default for LcovArgs {
    fn default() -> Self {
        Self {
            input: ReportInput::Data(PathBuf::from(DEFAULT_DATA_FILE)),
            output: PathBuf::from("coverage.lcov"),
            source: None,
            test_name: None,
            fail_under: None,
        }
    }
}

/// Arguments for the report command
#[derive(Debug, Clone)]
pub struct ReportArgs {
    pub input: ReportInput,

    /// List the line numbers of missed statements
    pub show_missing: bool,

    /// Directory whose `*.vim` files are reported even if never run
    pub source: Option<PathBuf>,

    /// Fail when total coverage is below this percentage
    pub fail_under: Option<f64>,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            input: ReportInput::Data(PathBuf::from(DEFAULT_DATA_FILE)),
            show_missing: false,
            source: None,
            fail_under: None,
        }
    }
}
