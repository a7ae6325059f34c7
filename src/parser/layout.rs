//! Column layout of the per-line tables.
//!
//! Rows are fixed-width: a count column, total and self time columns, then
//! the source text one character past the column boundary. The boundary is
//! the length of the header line, except where Vim mixes widths inside a
//! single script table (see [`row_boundary`]).

use crate::utils::config::{COUNT_WIDTH, NARROW_HEADER, WIDE_HEADER};

/// Which header introduced the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLayout {
    /// `count  total (s)   self (s)`
    Narrow,
    /// `count     total (s)      self (s)`, Vim 9.0.1411+
    Wide,
}

impl ColumnLayout {
    pub fn from_header(line: &str) -> Option<Self> {
        if line == NARROW_HEADER {
            Some(Self::Narrow)
        } else if line == WIDE_HEADER {
            Some(Self::Wide)
        } else {
            None
        }
    }

    /// Character column separating the timing fields from the source text
    pub fn boundary(self) -> usize {
        match self {
            Self::Narrow => NARROW_HEADER.len(),
            Self::Wide => WIDE_HEADER.len(),
        }
    }
}

/// Count and timing fields of one row
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowFields {
    pub count: Option<u64>,
    pub total_time: Option<f64>,
    pub self_time: Option<f64>,
}

/// Boundary column for one row of a table
///
/// Wide script tables are not uniform: rows without a count keep the narrow
/// padding, and rows with a count but no total time put the text right
/// after the self time. The digits at fixed offsets tell which.
pub fn row_boundary(row: &str, layout: ColumnLayout, script: bool) -> usize {
    if !(script && layout == ColumnLayout::Wide) {
        return layout.boundary();
    }
    if !digit_at(row, COUNT_WIDTH - 1) {
        ColumnLayout::Narrow.boundary()
    } else if !digit_at(row, COUNT_WIDTH + 3) {
        first_space_after_dot(row).unwrap_or_else(|| layout.boundary())
    } else {
        layout.boundary()
    }
}

/// Source text of a row: everything past the boundary, untrimmed
pub fn source_text(row: &str, boundary: usize) -> &str {
    char_slice(row, boundary + 1, usize::MAX)
}

/// Slice count / total / self out of a row
///
/// Returns `None` when a non-empty field is not a number.
pub fn parse_fields(row: &str, boundary: usize) -> Option<RowFields> {
    let mid = COUNT_WIDTH + (boundary.saturating_sub(COUNT_WIDTH)) / 2;
    Some(RowFields {
        count: parse_field(char_slice(row, 0, COUNT_WIDTH))?,
        total_time: parse_field(char_slice(row, COUNT_WIDTH + 1, mid))?,
        self_time: parse_field(char_slice(row, mid + 1, boundary))?,
    })
}

fn parse_field<T: std::str::FromStr>(field: &str) -> Option<Option<T>> {
    let field = field.trim();
    if field.is_empty() {
        Some(None)
    } else {
        field.parse().ok().map(Some)
    }
}

fn digit_at(row: &str, index: usize) -> bool {
    row.chars().nth(index).is_some_and(|c| c.is_ascii_digit())
}

fn first_space_after_dot(row: &str) -> Option<usize> {
    let chars: Vec<char> = row.chars().collect();
    let dot = chars.iter().position(|&c| c == '.')?;
    chars[dot..].iter().position(|&c| c == ' ').map(|i| dot + i)
}

/// Slice by character positions, clamped to the string
pub(crate) fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let start = byte_offset(s, start);
    let end = byte_offset(s, end).max(start);
    &s[start..end]
}

fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}
