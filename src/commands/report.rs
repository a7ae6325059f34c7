//! Report command implementations: LCOV export and a text summary.

use super::models::{LcovArgs, ReportArgs, ReportInput};
use crate::coverage::{find_executable_files, CoverageData, ExecutableLines};
use crate::output::lcov::totals;
use crate::output::{read_coverage, FileRecord, HitSource, LcovFormatter, LcovTotals};
use crate::parser::schema::Profile;
use crate::utils::config::Settings;
use anyhow::{Context, Result};
use log::{info, warn};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// A loaded report input, owning what `HitSource` borrows
enum Loaded {
    Profile(Profile),
    Data(CoverageData),
}

impl Loaded {
    fn read(input: &ReportInput) -> Result<Self> {
        match input {
            ReportInput::Profile(path) => {
                let profile = Profile::load(path)
                    .map_err(|e| anyhow::anyhow!(e.location()))
                    .context("Failed to load profile")?;
                for function in profile.unmapped_functions() {
                    warn!("Could not find line for function: {}", function.name);
                }
                Ok(Self::Profile(profile))
            }
            ReportInput::Data(path) => Ok(Self::Data(
                read_coverage(path).with_context(|| format!("Failed to read {}", path.display()))?,
            )),
        }
    }

    fn hits(&self) -> HitSource<'_> {
        match self {
            Self::Profile(profile) => HitSource::Profile(profile),
            Self::Data(data) => HitSource::Data(data),
        }
    }
}

/// Execute the lcov command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Totals over every reported file
///
/// # Errors
/// * The input cannot be loaded
/// * The report cannot be written
/// * Coverage is below `fail_under`
pub fn execute_lcov(args: &LcovArgs, settings: &Settings) -> Result<LcovTotals> {
    let loaded = Loaded::read(&args.input)?;
    let executable = ExecutableLines::from_settings(settings)?;
    let base_dir = std::env::current_dir().context("Failed to get working directory")?;

    let sources = discover_sources(args.source.as_deref(), &base_dir);
    let mut formatter = LcovFormatter::new(loaded.hits(), &executable, base_dir).with_sources(sources);
    if let Some(name) = &args.test_name {
        formatter = formatter.with_test_name(name.as_str());
    }
    let totals = formatter.save(&args.output).context("Failed to write LCOV report")?;

    info!("✓ LCOV report written to: {}", args.output.display());
    check_fail_under(&totals, args.fail_under)?;
    Ok(totals)
}

/// Execute the report command, printing the summary table to stdout
///
/// **Public** - main entry point called from main.rs
pub fn execute_report(args: &ReportArgs, settings: &Settings) -> Result<LcovTotals> {
    let loaded = Loaded::read(&args.input)?;
    let executable = ExecutableLines::from_settings(settings)?;
    let base_dir = std::env::current_dir().context("Failed to get working directory")?;

    let sources = discover_sources(args.source.as_deref(), &base_dir);
    let records = LcovFormatter::new(loaded.hits(), &executable, base_dir)
        .with_sources(sources)
        .records();
    print!("{}", render_table(&records, args.show_missing));

    if let Loaded::Profile(profile) = &loaded {
        let total = profile.functions.iter().filter(|f| !f.is_lambda()).count();
        let unmapped: Vec<&str> = profile.unmapped_functions().map(|f| f.name.as_str()).collect();
        println!();
        println!("Functions: {}/{} mapped", total - unmapped.len(), total);
        for name in unmapped {
            println!("  not found: {name}");
        }
    }

    let totals = totals(&records);
    check_fail_under(&totals, args.fail_under)?;
    Ok(totals)
}

/// `*.vim` files under `source`, resolved against the working directory
///
/// **Private** - unmeasured files for both commands
fn discover_sources(source: Option<&Path>, base_dir: &Path) -> Vec<PathBuf> {
    let Some(root) = source else {
        return Vec::new();
    };
    let files = find_executable_files(&base_dir.join(root));
    info!("Found {} source files under {}", files.len(), root.display());
    files
}

/// Summary table in the usual `Name Stmts Miss Cover` layout
///
/// **Public** - pure rendering, used by execute_report
pub fn render_table(records: &[FileRecord], show_missing: bool) -> String {
    let width = records
        .iter()
        .map(|r| r.name.len())
        .chain(["TOTAL".len(), "Name".len()])
        .max()
        .unwrap_or(0);

    let mut header = format!("{:<width$}   Stmts   Miss  Cover", "Name");
    if show_missing {
        header.push_str("   Missing");
    }
    let rule = "-".repeat(header.len());

    let mut out = String::new();
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{rule}");

    let mut total = LcovTotals::default();
    for record in records {
        let stmts = record.lines.len();
        let hit = record.hit();
        total.statements += stmts;
        total.hit += hit;

        let _ = write!(out, "{:<width$}   {:>5}  {:>5}  {:>5}", record.name, stmts, stmts - hit, percent(hit, stmts));
        if show_missing {
            let missed: Vec<usize> = record
                .lines
                .iter()
                .filter(|(_, count)| *count == 0)
                .map(|(line, _)| *line)
                .collect();
            let _ = write!(out, "   {}", format_ranges(&missed));
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<width$}   {:>5}  {:>5}  {:>5}",
        "TOTAL",
        total.statements,
        total.statements - total.hit,
        percent(total.hit, total.statements)
    );
    out
}

/// Collapse sorted line numbers into `1-3, 7` form
pub fn format_ranges(lines: &[usize]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut iter = lines.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        parts.push(if start == end {
            start.to_string()
        } else {
            format!("{start}-{end}")
        });
    }
    parts.join(", ")
}

fn percent(hit: usize, statements: usize) -> String {
    format!("{:.0}%", LcovTotals { statements, hit }.percent())
}

/// **Private** - shared by both commands
fn check_fail_under(totals: &LcovTotals, fail_under: Option<f64>) -> Result<()> {
    if let Some(minimum) = fail_under {
        let covered = totals.percent();
        if covered < minimum {
            anyhow::bail!(
                "Coverage failure: total of {:.0}% is less than fail-under={}",
                covered,
                minimum
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str, lines: &[(usize, u64)]) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            lines: lines.to_vec(),
        }
    }

    #[test]
    fn test_format_ranges() {
        assert_eq!(format_ranges(&[]), "");
        assert_eq!(format_ranges(&[3]), "3");
        assert_eq!(format_ranges(&[1, 2, 3, 7, 9, 10]), "1-3, 7, 9-10");
    }

    #[test]
    fn test_render_table() {
        let records = vec![record("spam.vim", &[(1, 11), (2, 0), (3, 5), (4, 0)])];
        let expected = "\
Name       Stmts   Miss  Cover   Missing
----------------------------------------
spam.vim       4      2    50%   2, 4
----------------------------------------
TOTAL          4      2    50%
";
        assert_eq!(render_table(&records, true), expected);
    }

    #[test]
    fn test_check_fail_under() {
        let totals = LcovTotals { statements: 4, hit: 3 };
        assert!(check_fail_under(&totals, None).is_ok());
        assert!(check_fail_under(&totals, Some(75.0)).is_ok());
        let err = check_fail_under(&totals, Some(80.0)).unwrap_err();
        assert_eq!(err.to_string(), "Coverage failure: total of 75% is less than fail-under=80");
    }

    #[test]
    fn test_nothing_to_cover_passes_fail_under() {
        let totals = LcovTotals::default();
        assert!(check_fail_under(&totals, Some(100.0)).is_ok());
        assert_eq!(percent(0, 0), "100%");
        assert!(render_table(&[], false).ends_with("TOTAL       0      0   100%\n"));
    }
}
