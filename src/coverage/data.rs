//! Measured coverage, per source file.
//!
//! This is the combined data file: every profile folded into one map of
//! script path to executed lines (or arcs, when measuring branches).

use super::lines::{arcs, executed_lines};
use crate::parser::schema::Profile;
use crate::utils::config::{FILE_TRACER, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Combined coverage data
///
/// **Public** - serialized by `output::json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageData {
    /// Schema version (e.g., "1.0.0")
    pub version: String,

    /// ISO 8601 timestamp of the last write
    pub generated_at: String,

    /// Script path to what was measured in it
    pub files: BTreeMap<String, FileCoverage>,
}

/// What was measured in one script
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    /// Plugin that measured the file
    pub file_tracer: String,

    /// Executed lines, ascending
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<usize>,

    /// Executed arcs, ascending
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arcs: Vec<(i64, i64)>,
}

impl CoverageData {
    pub fn new() -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            files: BTreeMap::new(),
        }
    }

    /// Whether any file was measured by arcs
    pub fn has_arcs(&self) -> bool {
        self.files.values().any(|f| !f.arcs.is_empty())
    }

    /// Add every script of a reconciled profile
    ///
    /// # Arguments
    /// * `profile` - Reconciled profile
    /// * `branch` - Record arcs instead of lines
    pub fn add_profile(&mut self, profile: &Profile, branch: bool) {
        for script in &profile.scripts {
            let measured = if branch {
                FileCoverage {
                    file_tracer: FILE_TRACER.to_string(),
                    arcs: arcs(script),
                    ..Default::default()
                }
            } else {
                FileCoverage {
                    file_tracer: FILE_TRACER.to_string(),
                    lines: executed_lines(script),
                    ..Default::default()
                }
            };
            self.add_file(script.path.clone(), measured);
        }
    }

    /// Fold another data file into this one
    pub fn merge(&mut self, other: CoverageData) {
        for (path, measured) in other.files {
            self.add_file(path, measured);
        }
    }

    /// Executed lines of a file, derived from arcs when measured by branch
    pub fn lines(&self, path: &str) -> Option<BTreeSet<usize>> {
        let file = self.files.get(path)?;
        let mut lines: BTreeSet<usize> = file.lines.iter().copied().collect();
        lines.extend(
            file.arcs
                .iter()
                .filter_map(|&(_, to)| usize::try_from(to).ok())
                .filter(|&to| to > 0),
        );
        Some(lines)
    }

    pub fn measured_files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    fn add_file(&mut self, path: String, measured: FileCoverage) {
        let entry = self.files.entry(path).or_default();
        if entry.file_tracer.is_empty() {
            entry.file_tracer = measured.file_tracer;
        }
        entry.lines = union(&entry.lines, measured.lines);
        entry.arcs = union(&entry.arcs, measured.arcs);
    }
}

impl Default for CoverageData {
    fn default() -> Self {
        Self::new()
    }
}

fn union<T: Ord + Copy>(existing: &[T], added: Vec<T>) -> Vec<T> {
    let mut all: BTreeSet<T> = existing.iter().copied().collect();
    all.extend(added);
    all.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{Line, Script};
    use pretty_assertions::assert_eq;

    fn profile(counts: &[Option<u64>]) -> Profile {
        let mut script = Script::new("plugin/spam.vim", 1, 0.0, 0.0);
        script.lines = counts.iter().map(|&c| Line::new(c, None, None, "echo")).collect();
        let mut profile = Profile::new("profile.txt");
        profile.scripts.push(script);
        profile
    }

    #[test]
    fn test_add_profile_lines() {
        let mut data = CoverageData::new();
        data.add_profile(&profile(&[Some(1), None, Some(2)]), false);

        let file = &data.files["plugin/spam.vim"];
        assert_eq!(file.file_tracer, FILE_TRACER);
        assert_eq!(file.lines, vec![1, 3]);
        assert!(file.arcs.is_empty());
        assert!(!data.has_arcs());
    }

    #[test]
    fn test_add_profile_arcs() {
        let mut data = CoverageData::new();
        data.add_profile(&profile(&[Some(1), None, Some(2)]), true);

        assert!(data.has_arcs());
        assert_eq!(data.files["plugin/spam.vim"].arcs, vec![(-1, 1), (2, 3), (3, -1)]);
        let lines: Vec<_> = data.lines("plugin/spam.vim").unwrap().into_iter().collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_merge_unions_lines() {
        let mut data = CoverageData::new();
        data.add_profile(&profile(&[Some(1), None, Some(0)]), false);
        let mut other = CoverageData::new();
        other.add_profile(&profile(&[None, Some(1), Some(1)]), false);

        data.merge(other);
        assert_eq!(data.files["plugin/spam.vim"].lines, vec![1, 2, 3]);
        assert_eq!(data.measured_files().collect::<Vec<_>>(), vec!["plugin/spam.vim"]);
    }

    #[test]
    fn test_json_omits_empty_measurements() {
        let mut data = CoverageData::new();
        data.add_profile(&profile(&[Some(1)]), false);
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"lines\":[1]"));
        assert!(!json.contains("arcs"));
    }
}
