//! LCOV report writer.
//!
//! ```text
//! TN:
//! SF:<source file>
//! DA:<line>,<execution count>
//! LF:<lines found>
//! LH:<lines hit>
//! end_of_record
//! ```
//!
//! Counts come from a reconciled profile when one is available. From
//! combined coverage data alone, every statement is reported as 1 or 0.

use crate::coverage::{line_count, profiled_statements, CoverageData, ExecutableLines};
use crate::parser::schema::Profile;
use crate::utils::error::OutputError;
use log::{info, warn};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Where DA counts come from
#[derive(Debug, Clone, Copy)]
pub enum HitSource<'a> {
    /// Execution counts of a reconciled profile
    Profile(&'a Profile),
    /// Executed / not executed from combined data
    Data(&'a CoverageData),
}

/// Per-file totals of a report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LcovTotals {
    pub statements: usize,
    pub hit: usize,
}

impl LcovTotals {
    /// Percentage of statements hit; nothing to cover counts as 100
    pub fn percent(&self) -> f64 {
        if self.statements == 0 {
            100.0
        } else {
            self.hit as f64 / self.statements as f64 * 100.0
        }
    }
}

/// One file's section of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path as written to `SF:`
    pub name: String,
    /// `(line, count)` per statement
    pub lines: Vec<(usize, u64)>,
}

impl FileRecord {
    pub fn hit(&self) -> usize {
        self.lines.iter().filter(|(_, count)| *count > 0).count()
    }
}

/// LCOV report generator
#[derive(Debug)]
pub struct LcovFormatter<'a> {
    source: HitSource<'a>,
    executable: &'a ExecutableLines,
    base_dir: PathBuf,
    test_name: Option<String>,
    sources: Vec<PathBuf>,
}

impl<'a> LcovFormatter<'a> {
    /// Create a formatter; `SF:` paths are made relative to `base_dir`
    pub fn new(source: HitSource<'a>, executable: &'a ExecutableLines, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            executable,
            base_dir: base_dir.into(),
            test_name: None,
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_test_name(mut self, name: impl Into<String>) -> Self {
        self.test_name = Some(name.into());
        self
    }

    /// Also report these source files, with every statement at 0 unless
    /// they were measured
    #[must_use]
    pub fn with_sources(mut self, files: Vec<PathBuf>) -> Self {
        self.sources = files;
        self
    }

    /// Per-file records, sorted by relative path
    ///
    /// A file whose source cannot be read falls back to the lines the
    /// profiler instrumented; without a profile it is skipped. Source files
    /// nobody measured follow, keyed by the same relative name.
    pub fn records(&self) -> Vec<FileRecord> {
        let mut records: BTreeMap<String, FileRecord> = BTreeMap::new();
        for path in self.files() {
            let Some(lines) = self.file_lines(path) else {
                warn!("Skipping {}: source not readable", path);
                continue;
            };
            let name = relative_name(Path::new(path), &self.base_dir);
            records.insert(name.clone(), FileRecord { name, lines });
        }
        for path in &self.sources {
            let name = relative_name(path, &self.base_dir);
            if records.contains_key(&name) {
                continue;
            }
            let Some(statements) = self.executable.statements_in_file(path) else {
                continue;
            };
            let lines = statements.into_iter().map(|n| (n, 0)).collect();
            records.insert(name.clone(), FileRecord { name, lines });
        }
        records.into_values().collect()
    }

    /// Generate the report text
    pub fn generate(&self) -> String {
        render(&self.records(), self.test_name.as_deref())
    }

    /// Statement totals over every file
    pub fn totals(&self) -> LcovTotals {
        totals(&self.records())
    }

    /// Write the report to `path`
    ///
    /// # Returns
    /// Totals of the written report
    ///
    /// # Errors
    /// * `OutputError::WriteFailed` - I/O error during write
    pub fn save(&self, path: &Path) -> Result<LcovTotals, OutputError> {
        let records = self.records();
        std::fs::write(path, render(&records, self.test_name.as_deref()))?;
        info!("LCOV report written to: {}", path.display());
        Ok(totals(&records))
    }

    fn files(&self) -> Vec<&'a str> {
        match self.source {
            HitSource::Profile(profile) => profile.scripts.iter().map(|s| s.path.as_str()).collect(),
            HitSource::Data(data) => data.measured_files().collect(),
        }
    }

    fn file_lines(&self, path: &str) -> Option<Vec<(usize, u64)>> {
        let statements = self.executable.statements_in_file(Path::new(path));
        match self.source {
            HitSource::Profile(profile) => {
                let script = profile.script(path)?;
                let statements = statements.unwrap_or_else(|| profiled_statements(script));
                Some(
                    statements
                        .into_iter()
                        .map(|n| (n, line_count(script, n)))
                        .collect(),
                )
            }
            HitSource::Data(data) => {
                let executed = data.lines(path).unwrap_or_default();
                Some(
                    statements?
                        .into_iter()
                        .map(|n| (n, u64::from(executed.contains(&n))))
                        .collect(),
                )
            }
        }
    }
}

fn render(records: &[FileRecord], test_name: Option<&str>) -> String {
    let mut output = String::new();
    for record in records {
        let _ = writeln!(output, "TN:{}", test_name.unwrap_or_default());
        let _ = writeln!(output, "SF:{}", record.name);
        for (line, count) in &record.lines {
            let _ = writeln!(output, "DA:{line},{count}");
        }
        let _ = writeln!(output, "LF:{}", record.lines.len());
        let _ = writeln!(output, "LH:{}", record.hit());
        output.push_str("end_of_record\n");
    }
    output
}

/// Statement totals over `records`
pub fn totals(records: &[FileRecord]) -> LcovTotals {
    records.iter().fold(LcovTotals::default(), |acc, r| LcovTotals {
        statements: acc.statements + r.lines.len(),
        hit: acc.hit + r.hit(),
    })
}

/// `path` relative to `base`, or unchanged when outside it
pub fn relative_name(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
