//! Parser for Vim's `:profile` report.
//!
//! The report is a flat sequence of SCRIPT and FUNCTION records, each a few
//! header lines followed by a fixed-width table of rows, terminated by the
//! `FUNCTIONS SORTED ON ...` trailer. Layout details vary by Vim version;
//! what was seen is recorded in a [`FormatVariant`].

use super::layout::{parse_fields, row_boundary, source_text, ColumnLayout, RowFields};
use super::schema::{Defined, Function, Line, Profile, Script};
use crate::reconcile::patterns::is_continuation;
use crate::utils::config::{
    CALLED_MARKER, DEFINED_MARKER, FUNCTION_MARKER, SCRIPT_MARKER, SELF_TIME_MARKER,
    SORT_MARKER, SOURCED_MARKER, TOTAL_TIME_MARKER,
};
use crate::utils::error::ProfileError;
use log::debug;
use std::path::Path;
use std::str::Lines;

/// How a FUNCTION record spells its definition site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefinedStyle {
    /// No `Defined:` line (Vim 8.1.0364 and older)
    #[default]
    Absent,
    /// `Defined: <path> line <n>` (Vim 8.1.0365 - 8.1.2054)
    LineKeyword,
    /// `Defined: <path>:<n>` (Vim 8.1.2055+)
    Colon,
}

/// Report layout sniffed while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatVariant {
    /// Widest table header seen, `None` if the report had no tables
    pub layout: Option<ColumnLayout>,
    pub defined: DefinedStyle,
}

impl FormatVariant {
    /// Oldest reports: no definition sites, narrow tables. These omit the
    /// count of a script's first line and drop trailing continuation rows.
    pub fn is_legacy(&self) -> bool {
        self.defined == DefinedStyle::Absent && self.layout != Some(ColumnLayout::Wide)
    }

    fn saw_layout(&mut self, layout: ColumnLayout) {
        if self.layout != Some(ColumnLayout::Wide) {
            self.layout = Some(layout);
        }
    }
}

/// Parse report text into a profile, without reconciliation
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `text` - Report contents
/// * `path` - Report path, used for error positions
///
/// # Errors
/// * `ProfileError` - an unexpected top-level line, or a SCRIPT/FUNCTION
///   record that cannot be read up to its table header
pub fn parse_report(text: &str, path: &Path) -> Result<(Profile, FormatVariant), ProfileError> {
    let mut parser = ReportParser {
        path,
        lines: text.lines(),
        lineno: 0,
        profile: Profile::new(path),
        variant: FormatVariant::default(),
    };
    parser.parse()?;

    debug!(
        "Parsed {} scripts and {} functions from {} ({:?})",
        parser.profile.scripts.len(),
        parser.profile.functions.len(),
        path.display(),
        parser.variant
    );
    Ok((parser.profile, parser.variant))
}

/// Which record a table belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordKind {
    Script,
    Function,
}

impl RecordKind {
    fn error_message(self) -> &'static str {
        match self {
            Self::Script => "cannot parse SCRIPT",
            Self::Function => "cannot parse FUNCTION",
        }
    }
}

struct ReportParser<'a> {
    path: &'a Path,
    lines: Lines<'a>,
    lineno: usize,
    profile: Profile,
    variant: FormatVariant,
}

impl<'a> ReportParser<'a> {
    fn parse(&mut self) -> Result<(), ProfileError> {
        loop {
            let line = self.readline();
            if let Some(name) = line.and_then(|l| l.strip_prefix(SCRIPT_MARKER)) {
                self.parse_script(name)?;
            } else if let Some(name) = line.and_then(|l| l.strip_prefix(FUNCTION_MARKER)) {
                self.parse_function(name)?;
            } else if line.is_some_and(|l| l.starts_with(SORT_MARKER)) {
                return Ok(());
            } else {
                return Err(self.error("unexpected line"));
            }
        }
    }

    fn parse_script(&mut self, name: &str) -> Result<(), ProfileError> {
        let kind = RecordKind::Script;
        let mut sourced = 0;
        let mut total_time = 0.0;
        let mut self_time = 0.0;

        let layout = loop {
            let Some(line) = self.readline() else {
                return Err(self.error(kind.error_message()));
            };
            if line.starts_with(SOURCED_MARKER) {
                sourced = self.parse_times_field(line, kind)?;
            } else if line.starts_with(TOTAL_TIME_MARKER) {
                total_time = self.parse_seconds(line, kind)?;
            } else if line.starts_with(SELF_TIME_MARKER) {
                self_time = self.parse_seconds(line, kind)?;
            } else if let Some(layout) = ColumnLayout::from_header(line) {
                break layout;
            } else if !line.is_empty() {
                return Err(self.error(kind.error_message()));
            }
        };

        let mut script = Script::new(name, sourced, total_time, self_time);
        script.lines = self.parse_rows(kind, layout)?;
        self.profile.insert_script(script);
        Ok(())
    }

    fn parse_function(&mut self, name: &str) -> Result<(), ProfileError> {
        let kind = RecordKind::Function;
        let mut called = 0;
        let mut total_time = 0.0;
        let mut self_time = 0.0;
        let mut defined = None;

        let layout = loop {
            let Some(line) = self.readline() else {
                return Err(self.error(kind.error_message()));
            };
            if line.starts_with(CALLED_MARKER) {
                called = self.parse_times_field(line, kind)?;
            } else if line.starts_with(TOTAL_TIME_MARKER) {
                total_time = self.parse_seconds(line, kind)?;
            } else if line.starts_with(SELF_TIME_MARKER) {
                self_time = self.parse_seconds(line, kind)?;
            } else if let Some(rest) = line.strip_prefix(DEFINED_MARKER) {
                let (site, style) =
                    parse_defined(rest).ok_or_else(|| self.error(kind.error_message()))?;
                self.variant.defined = style;
                defined = Some(site);
            } else if let Some(layout) = ColumnLayout::from_header(line) {
                break layout;
            } else if !line.is_empty() {
                return Err(self.error(kind.error_message()));
            }
        };

        let mut function = Function::new(name, called, total_time, self_time);
        function.defined = defined;
        function.lines = self.parse_rows(kind, layout)?;
        self.profile.functions.push(function);
        Ok(())
    }

    /// Read table rows up to the blank line (or end of input)
    ///
    /// Continuation rows keep the fields of the row they continue, so
    /// every physical row yields exactly one `Line`.
    fn parse_rows(&mut self, kind: RecordKind, layout: ColumnLayout) -> Result<Vec<Line>, ProfileError> {
        self.variant.saw_layout(layout);

        let mut lines = Vec::new();
        let mut fields = RowFields::default();
        while let Some(row) = self.readline() {
            if row.is_empty() {
                break;
            }
            let boundary = row_boundary(row, layout, kind == RecordKind::Script);
            let text = source_text(row, boundary);
            if !is_continuation(text) {
                fields = parse_fields(row, boundary)
                    .ok_or_else(|| self.error(kind.error_message()))?;
            }
            lines.push(Line::new(fields.count, fields.total_time, fields.self_time, text));
        }
        Ok(lines)
    }

    /// `Sourced 3 times` / `Called 1 time`
    fn parse_times_field(&self, line: &str, kind: RecordKind) -> Result<u64, ProfileError> {
        line.split_whitespace()
            .nth(1)
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| self.error(kind.error_message()))
    }

    /// `Total time:   0.000123`
    fn parse_seconds(&self, line: &str, kind: RecordKind) -> Result<f64, ProfileError> {
        line.split(':')
            .nth(1)
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| self.error(kind.error_message()))
    }

    fn readline(&mut self) -> Option<&'a str> {
        self.lineno += 1;
        self.lines.next()
    }

    fn error(&self, message: &str) -> ProfileError {
        ProfileError::new(message, self.path, self.lineno)
    }
}

/// Split the text after `Defined: ` into path and line
///
/// Line numbers that are zero or unparsable clamp to 1.
fn parse_defined(rest: &str) -> Option<(Defined, DefinedStyle)> {
    let (path, line, style) = match rest.rfind(':') {
        Some(i) if is_digits(&rest[i + 1..]) => (&rest[..i], &rest[i + 1..], DefinedStyle::Colon),
        _ => {
            let i = rest.rfind(" line ")?;
            (&rest[..i], &rest[i + " line ".len()..], DefinedStyle::LineKeyword)
        }
    };
    let line = line.trim().parse::<usize>().unwrap_or(1).max(1);
    Some((
        Defined {
            path: expand_home(path.trim_start()),
            line,
        },
        style,
    ))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Expand a leading `~` the way Vim abbreviates home-relative paths
fn expand_home(path: &str) -> String {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return path.to_string(),
    };
    match std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
        Ok(home) => format!("{home}{rest}"),
        Err(_) => path.to_string(),
    }
}
