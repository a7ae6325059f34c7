//! Which source lines count as statements.
//!
//! Blank lines, comments and continuation rows never do. Closing commands
//! (`endif`, `endfor`, ...) and the secondary branches of a conditional
//! (`elseif`, `catch`, `finally`) are configurable, since Vim's profiler
//! only counts them in some positions.

use crate::reconcile::patterns::is_continuation;
use crate::utils::config::Settings;
use log::debug;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const CONDITIONAL_COMMANDS: &[&str] = &[
    "elsei(?:f)?",            // :elsei[f]
    "cat(?:c(?:h)?)?",        // :cat[ch]
    "fina(?:l(?:l(?:y)?)?)?", // :fina[lly]
];

const END_COMMANDS: &[&str] = &[
    "en(?:d(?:i(?:f)?)?)?",                            // :en[dif]
    "endw(?:h(?:i(?:l(?:e)?)?)?)?",                    // :endw[hile]
    "endfo(?:r)?",                                     // :endfo[r]
    "endt(?:r(?:y)?)?",                                // :endt[ry]
    "endf(?:u(?:n(?:c(?:t(?:i(?:o(?:n)?)?)?)?)?)?)?",  // :endf[unction]
];

/// Statement detector for Vim script sources
#[derive(Debug, Clone)]
pub struct ExecutableLines {
    non_executable: Regex,
}

impl ExecutableLines {
    /// Build a detector
    ///
    /// # Arguments
    /// * `cond` - count `elseif`/`catch`/`finally` as statements
    /// * `end` - count the `end*` commands as statements
    pub fn new(cond: bool, end: bool) -> Result<Self, regex::Error> {
        let mut alternatives = vec!["$".to_string(), "\"".to_string()];
        let mut commands: Vec<&str> = Vec::new();
        if !cond {
            commands.extend_from_slice(CONDITIONAL_COMMANDS);
        }
        if !end {
            commands.extend_from_slice(END_COMMANDS);
        }
        if !commands.is_empty() {
            alternatives.push(format!(r"\b(?:{})\b", commands.join("|")));
        }
        let non_executable = Regex::new(&format!(r"^\s*(?:{})", alternatives.join("|")))?;
        Ok(Self { non_executable })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, regex::Error> {
        Self::new(settings.cond, settings.end)
    }

    pub fn is_statement(&self, line: &str) -> bool {
        !(is_continuation(line) || self.non_executable.is_match(line))
    }

    /// 1-based numbers of the statement lines in `source`
    pub fn statements(&self, source: &str) -> BTreeSet<usize> {
        source
            .lines()
            .enumerate()
            .filter(|(_, l)| self.is_statement(l))
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Statements of a file on disk, `None` if it cannot be read
    pub fn statements_in_file(&self, path: &Path) -> Option<BTreeSet<usize>> {
        match std::fs::read_to_string(path) {
            Ok(source) => Some(self.statements(&source)),
            Err(e) => {
                debug!("Cannot read source {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Every `*.vim` file below `root`, in directory order
pub fn find_executable_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "vim"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "echo 0\n\
                          \\ 1\n\
                          if 0\n  echo 'if'\n\
                          elseif 1\n  echo 'elseif 1'\n\
                          elseif 2\n  echo 'elseif 2'\n\
                          endif\n";

    fn statements(cond: bool, end: bool) -> Vec<usize> {
        ExecutableLines::new(cond, end)
            .unwrap()
            .statements(SOURCE)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_statements_by_option() {
        assert_eq!(statements(false, false), vec![1, 3, 4, 6, 8]);
        assert_eq!(statements(false, true), vec![1, 3, 4, 6, 8, 9]);
        assert_eq!(statements(true, false), vec![1, 3, 4, 5, 6, 7, 8]);
        assert_eq!(statements(true, true), vec![1, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_abbreviated_end_commands() {
        let lines = ExecutableLines::new(true, false).unwrap();
        for line in ["en", "endfo", "endw", "endt", "endf", "  endfunction", "\" note", ""] {
            assert!(!lines.is_statement(line), "{line:?}");
        }
        for line in ["endfunc_helper()", "call End()", "enew"] {
            assert!(lines.is_statement(line), "{line:?}");
        }
    }

    #[test]
    fn test_find_executable_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("autoload")).unwrap();
        std::fs::write(dir.path().join("spam.vim"), "").unwrap();
        std::fs::write(dir.path().join("autoload").join("eggs.vim"), "").unwrap();
        std::fs::write(dir.path().join("ham.txt"), "").unwrap();

        let files = find_executable_files(dir.path());
        assert_eq!(
            files,
            vec![
                dir.path().join("autoload").join("eggs.vim"),
                dir.path().join("spam.vim"),
            ]
        );
    }
}
