//! Configuration and constants for the CLI.

use crate::utils::error::ConfigError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current coverage data schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// File tracer recorded for every script measured from a profile
pub const FILE_TRACER: &str = "vimprof_coverage.VimScript";

/// Settings file looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = ".vimcov.toml";

/// Default combined data file
pub const DEFAULT_DATA_FILE: &str = ".vimcov.json";

// Record markers written by Vim's `:profile`
pub const SCRIPT_MARKER: &str = "SCRIPT  ";
pub const SOURCED_MARKER: &str = "Sourced ";
pub const FUNCTION_MARKER: &str = "FUNCTION  ";
pub const DEFINED_MARKER: &str = "    Defined: ";
pub const CALLED_MARKER: &str = "Called ";
pub const TOTAL_TIME_MARKER: &str = "Total time: ";
pub const SELF_TIME_MARKER: &str = " Self time: ";
pub const SORT_MARKER: &str = "FUNCTIONS SORTED ON ";

// Column headers. The wide one carries three extra digits of precision
// (Vim 9.0.1411+).
pub const NARROW_HEADER: &str = "count  total (s)   self (s)";
pub const WIDE_HEADER: &str = "count     total (s)      self (s)";

/// Width of the count column in every layout
pub const COUNT_WIDTH: usize = "count".len();

/// Name prefix Vim gives to lambda expressions
pub const LAMBDA_PREFIX: &str = "<lambda>";

/// User settings, read from `.vimcov.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Settings {
    /// Treat `elseif`/`catch`/`finally` as executable
    pub cond: bool,

    /// Treat `endif`/`endwhile`/`endfor`/`endtry`/`endfunction` as executable
    pub end: bool,

    /// Record arcs instead of lines
    pub branch: bool,

    /// Profile read when none is given on the command line
    pub profile: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cond: true,
            end: false,
            branch: false,
            profile: "profile.txt".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a settings file
    ///
    /// # Errors
    /// * `ConfigError::ReadFailed` - the file cannot be read
    /// * `ConfigError::Invalid` - the file is not valid settings TOML
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load settings, falling back to defaults
    ///
    /// A missing file is silent; an unreadable or malformed one is logged.
    pub fn load_optional(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(ConfigError::ReadFailed(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                warn!("{} ({})", err, path.display());
                Self::default()
            }
        }
    }
}
