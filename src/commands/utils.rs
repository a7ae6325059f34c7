use crate::parser::schema::Profile;
use crate::utils::config::{Settings, DEFAULT_SETTINGS_FILE, SCHEMA_VERSION};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Parse a profile report and print what it contains
///
/// # Errors
/// * The report is malformed; the error names the report line
pub fn validate_profile_file(file_path: &Path) -> Result<Profile> {
    println!("Validating profile: {}", file_path.display());

    let profile = Profile::load(file_path).map_err(|e| anyhow::anyhow!(e.location()))?;
    let functions = profile.functions.iter().filter(|f| !f.is_lambda()).count();
    let mapped = profile.functions.iter().filter(|f| f.mapped).count();
    let lambdas = profile.functions.len() - functions;

    println!("✓ Valid profile report");
    println!("  Scripts: {}", profile.scripts.len());
    for script in &profile.scripts {
        println!("    {} ({} lines, sourced {})", script.path, script.lines.len(), script.sourced);
    }
    println!("  Functions: {} ({} lambdas)", functions, lambdas);
    println!("  Mapped: {}", mapped);
    for function in profile.unmapped_functions() {
        println!("    not found: {}", function.name);
    }

    Ok(profile)
}

/// Settings from `--config`, else `.vimcov.toml` in the working directory
pub fn load_settings(config: Option<&Path>) -> Settings {
    let path = config.map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE), Path::to_path_buf);
    Settings::load_optional(&path)
}

/// Display version information
pub fn display_version() {
    println!("vimprof-coverage v{}", env!("CARGO_PKG_VERSION"));
    println!("Coverage Data Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Line and branch coverage for Vim script from :profile reports.");
}
