//! Coverage data JSON reader/writer.
//!
//! Writes `CoverageData` to the combined data file and reads it back,
//! rejecting JSON that is not coverage data.

use crate::coverage::CoverageData;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write coverage data to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `data` - Coverage data to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_coverage(data: &CoverageData, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing coverage data to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
    }

    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), data)?;

    debug!(
        "Coverage data written ({} files, {} bytes)",
        data.files.len(),
        calculate_file_size(output_path)
    );
    Ok(())
}

/// Read coverage data from a JSON file
///
/// **Public** - used by combine for files that are not profiles
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::InvalidData` - the file is not coverage data JSON
pub fn read_coverage(input_path: impl AsRef<Path>) -> Result<CoverageData, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading coverage data from: {}", input_path.display());

    let file = File::open(input_path)?;
    let data: CoverageData = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| OutputError::InvalidData(format!("{}: {}", input_path.display(), e)))?;

    debug!("Coverage data loaded: version {}, {} files", data.version, data.files.len());
    Ok(data)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
