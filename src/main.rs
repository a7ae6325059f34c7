//! vimcov CLI
//!
//! Coverage for Vim script from Vim's built-in profiler reports.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use vimprof_coverage::commands::{
    display_version, execute_combine, execute_lcov, execute_report, load_settings, validate_args,
    validate_profile_file, CombineArgs, LcovArgs, ReportArgs, ReportInput,
};
use vimprof_coverage::utils::config::{Settings, DEFAULT_DATA_FILE};

/// vimcov - coverage for Vim script
#[derive(Parser, Debug)]
#[command(name = "vimcov")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to .vimcov.toml)
    #[arg(long, global = true, env = "VIMCOV_CONFIG")]
    config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Combine profiles and data files into one coverage data file
    Combine {
        /// Profile reports or data files (directories are searched for data
        /// files); defaults to the `profile` setting
        inputs: Vec<PathBuf>,

        /// Combined data file to write
        #[arg(long = "data-file", default_value = DEFAULT_DATA_FILE)]
        data_file: PathBuf,

        /// Merge into the existing data file
        #[arg(short, long)]
        append: bool,

        /// Record arcs instead of lines (overrides the settings file)
        #[arg(long)]
        branch: bool,
    },

    /// Write an LCOV report
    Lcov {
        /// Profile report giving exact counts (defaults to the combined data)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Combined data file to read when no profile is given
        #[arg(long = "data-file", default_value = DEFAULT_DATA_FILE)]
        data_file: PathBuf,

        /// Output path for the LCOV report
        #[arg(short, long, default_value = "coverage.lcov")]
        output: PathBuf,

        /// Also report `*.vim` files under this directory that never ran
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Test name written to each `TN:` line
        #[arg(long)]
        test_name: Option<String>,

        /// Fail when total coverage is below this percentage
        #[arg(long)]
        fail_under: Option<f64>,
    },

    /// Print a coverage summary
    Report {
        /// Profile report giving exact counts (defaults to the combined data)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Combined data file to read when no profile is given
        #[arg(long = "data-file", default_value = DEFAULT_DATA_FILE)]
        data_file: PathBuf,

        /// List missed line numbers
        #[arg(short = 'm', long)]
        show_missing: bool,

        /// Also report `*.vim` files under this directory that never ran
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Fail when total coverage is below this percentage
        #[arg(long)]
        fail_under: Option<f64>,
    },

    /// Parse a profile report and show what it contains
    Validate {
        /// Profile report (defaults to the `profile` setting)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let settings = load_settings(cli.config.as_deref());

    match cli.command {
        Commands::Combine {
            inputs,
            data_file,
            append,
            branch,
        } => {
            let inputs = if inputs.is_empty() {
                vec![default_profile(&settings)]
            } else {
                inputs
            };
            let args = CombineArgs {
                inputs,
                data_file,
                append,
                branch: branch || settings.branch,
            };
            validate_args(&args)?;
            execute_combine(&args)?;
        }

        Commands::Lcov {
            profile,
            data_file,
            output,
            source,
            test_name,
            fail_under,
        } => {
            let args = LcovArgs {
                input: report_input(profile, data_file),
                output,
                source,
                test_name,
                fail_under,
            };
            execute_lcov(&args, &settings)?;
        }

        Commands::Report {
            profile,
            data_file,
            show_missing,
            source,
            fail_under,
        } => {
            let args = ReportArgs {
                input: report_input(profile, data_file),
                show_missing,
                source,
                fail_under,
            };
            execute_report(&args, &settings)?;
        }

        Commands::Validate { file } => {
            let file = file.unwrap_or_else(|| default_profile(&settings));
            validate_profile_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// **Private** - a profile wins over the data file
fn report_input(profile: Option<PathBuf>, data_file: PathBuf) -> ReportInput {
    match profile {
        Some(path) => ReportInput::Profile(path),
        None => ReportInput::Data(data_file),
    }
}

fn default_profile(settings: &Settings) -> PathBuf {
    PathBuf::from(&settings.profile)
}
