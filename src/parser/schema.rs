//! In-memory model of a parsed profile report.
//!
//! One `Profile` per report file. Scripts and functions own their per-line
//! records; reconciliation only ever fills in count/time fields.

use crate::reconcile::patterns::is_continuation;
use crate::utils::config::LAMBDA_PREFIX;
use serde::Serialize;
use std::path::PathBuf;

/// Top-level result of parsing one report
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    /// Report file this profile was read from
    pub path: PathBuf,

    /// Scripts in first-sourced order, unique by path
    pub scripts: Vec<Script>,

    /// Functions in report order
    pub functions: Vec<Function>,
}

impl Profile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            scripts: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Look up a script by its recorded path
    pub fn script(&self, path: &str) -> Option<&Script> {
        self.scripts.iter().find(|s| s.path == path)
    }

    pub(crate) fn script_index(&self, path: &str) -> Option<usize> {
        self.scripts.iter().position(|s| s.path == path)
    }

    /// Insert a script, replacing an earlier record for the same path in place
    pub(crate) fn insert_script(&mut self, script: Script) {
        match self.script_index(&script.path) {
            Some(i) => self.scripts[i] = script,
            None => self.scripts.push(script),
        }
    }

    /// Functions left unmapped that are worth a warning
    ///
    /// Lambdas are excluded: Vim never records a usable location for them.
    pub fn unmapped_functions(&self) -> impl Iterator<Item = &Function> {
        self.functions
            .iter()
            .filter(|f| !f.mapped && !f.is_lambda())
    }
}

/// One source file as profiled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Script {
    pub path: String,
    pub sourced: u64,
    pub total_time: f64,
    pub self_time: f64,
    pub lines: Vec<Line>,
}

impl Script {
    pub fn new(path: impl Into<String>, sourced: u64, total_time: f64, self_time: f64) -> Self {
        Self {
            path: path.into(),
            sourced,
            total_time,
            self_time,
            lines: Vec::new(),
        }
    }
}

/// Definition site recorded by Vim 8.1.0365+
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Defined {
    pub path: String,
    /// 1-based line of the `:function` command
    pub line: usize,
}

/// One function as profiled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    /// Not unique: dictionary functions get numeric names, and `:execute`
    /// can define the same name twice
    pub name: String,
    pub defined: Option<Defined>,
    pub called: u64,
    pub total_time: f64,
    pub self_time: f64,
    pub lines: Vec<Line>,

    /// Set once the body has been located in its owning block
    pub mapped: bool,
}

impl Function {
    pub fn new(name: impl Into<String>, called: u64, total_time: f64, self_time: f64) -> Self {
        Self {
            name: name.into(),
            defined: None,
            called,
            total_time,
            self_time,
            lines: Vec::new(),
            mapped: false,
        }
    }

    pub fn is_lambda(&self) -> bool {
        self.name.starts_with(LAMBDA_PREFIX)
    }
}

/// One row of a script or function table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    /// `None` when the profiler did not instrument the line
    pub count: Option<u64>,
    pub total_time: Option<f64>,
    pub self_time: Option<f64>,
    /// Source text, byte-exact including indentation
    pub line: String,
}

impl Line {
    pub fn new(
        count: Option<u64>,
        total_time: Option<f64>,
        self_time: Option<f64>,
        line: impl Into<String>,
    ) -> Self {
        Self {
            count,
            total_time,
            self_time,
            line: line.into(),
        }
    }

    /// Whether the text continues the previous line (`\` after indentation)
    pub fn is_continuation(&self) -> bool {
        is_continuation(&self.line)
    }

    pub fn executed(&self) -> bool {
        self.count.is_some_and(|c| c > 0)
    }

    /// Copy execution data from `other` unless this row already has a count
    pub(crate) fn fill_from(&mut self, other: &Line) {
        if self.count.is_none() {
            self.count = other.count;
            self.total_time = other.total_time;
            self.self_time = other.self_time;
        }
    }
}
