//! Combine command implementation.
//!
//! The combine command:
//! 1. Reads each input as a profile report
//! 2. Hands inputs that are not profiles to the data file reader
//! 3. Folds everything into one coverage data set
//! 4. Writes the combined data file

use super::models::CombineArgs;
use crate::coverage::CoverageData;
use crate::output::{read_coverage, write_coverage};
use crate::parser::schema::Profile;
use crate::utils::config::DEFAULT_DATA_FILE;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What a combine run consumed and produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineSummary {
    /// Profile reports read
    pub profiles: usize,
    /// Coverage data files merged
    pub data_files: usize,
    /// Source files in the written data
    pub files: usize,
    /// Functions that could not be placed (lambdas excluded)
    pub unmapped: Vec<String>,
}

/// Execute the combine command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Combine command arguments
///
/// # Returns
/// Summary of what was combined
///
/// # Errors
/// * No input was a profile or a data file
/// * The existing data file cannot be read when appending
/// * The data file cannot be written
pub fn execute_combine(args: &CombineArgs) -> Result<CombineSummary> {
    let start_time = Instant::now();
    let mut summary = CombineSummary::default();

    let mut data = if args.append && args.data_file.is_file() {
        info!("Appending to: {}", args.data_file.display());
        read_coverage(&args.data_file)
            .with_context(|| format!("Failed to read {}", args.data_file.display()))?
    } else {
        CoverageData::new()
    };

    for path in expand_inputs(&args.inputs) {
        if !path.is_file() {
            debug!("Skipping {}: not a file", path.display());
            continue;
        }
        match Profile::load(&path) {
            Ok(profile) => {
                for function in profile.unmapped_functions() {
                    warn!("Could not find line for function: {}", function.name);
                    summary.unmapped.push(function.name.clone());
                }
                data.add_profile(&profile, args.branch);
                summary.profiles += 1;
            }
            Err(e) => {
                debug!("Not a profile ({}), trying as data file", e.location());
                match read_coverage(&path) {
                    Ok(other) => {
                        data.merge(other);
                        summary.data_files += 1;
                    }
                    Err(err) => warn!("Skipping {}: {}", path.display(), err),
                }
            }
        }
    }

    if summary.profiles == 0 && summary.data_files == 0 {
        anyhow::bail!("No data to combine");
    }

    data.generated_at = chrono::Utc::now().to_rfc3339();
    summary.files = data.files.len();
    write_coverage(&data, &args.data_file).context("Failed to write coverage data")?;

    info!(
        "Combined {} profiles and {} data files into {} ({} files) in {:.2}s",
        summary.profiles,
        summary.data_files,
        args.data_file.display(),
        summary.files,
        start_time.elapsed().as_secs_f64()
    );
    Ok(summary)
}

/// Validate combine arguments
///
/// **Public** - can be called before execute_combine for early validation
pub fn validate_args(args: &CombineArgs) -> Result<()> {
    if args.inputs.is_empty() {
        anyhow::bail!("No data to combine");
    }
    if args.data_file.as_os_str().is_empty() {
        anyhow::bail!("Data file path cannot be empty");
    }
    if args.inputs.iter().any(|p| p == &args.data_file) {
        anyhow::bail!("Data file {} is also an input", args.data_file.display());
    }
    Ok(())
}

/// Files named by the inputs; a directory contributes its data files
///
/// **Private** - internal helper for execute_combine
fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            paths.extend(data_files_in(input));
        } else {
            paths.push(input.clone());
        }
    }
    paths
}

/// `.vimcov.json` and `.vimcov.*.json` files directly inside `dir`
fn data_files_in(dir: &Path) -> Vec<PathBuf> {
    let stem = DEFAULT_DATA_FILE.trim_end_matches(".json");
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut found: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n == DEFAULT_DATA_FILE || (n.starts_with(stem) && n.ends_with(".json")))
        })
        .collect();
    found.sort();
    found
}
