//! Executed lines and arcs of a reconciled script.
//!
//! Line numbers are 1-based. Continuation rows belong to the line they
//! continue and never appear on their own. Arcs use -1 for the entry and
//! exit of the script.

use crate::parser::schema::{Line, Script};
use std::collections::BTreeSet;

/// Line numbers of rows executed at least once
pub fn executed_lines(script: &Script) -> Vec<usize> {
    logical_rows(script)
        .filter(|(_, row)| row.executed())
        .map(|(lineno, _)| lineno)
        .collect()
}

/// Arcs between consecutive executed lines
///
/// **Public** - branch measurement
///
/// An arc starts at the previous logical line, executed or not, so a jump
/// over an unexecuted block shows up as an arc from the line just before
/// the executed one.
///
/// # Returns
/// `(from, to)` pairs in source order, starting at -1 and closed by an arc
/// back to -1
pub fn arcs(script: &Script) -> Vec<(i64, i64)> {
    let mut arcs = Vec::new();
    let mut prev: i64 = -1;
    for (lineno, row) in logical_rows(script) {
        let lineno = lineno as i64;
        if row.executed() {
            arcs.push((prev, lineno));
        }
        prev = lineno;
    }
    arcs.push((prev, -1));
    arcs
}

/// Lines the profiler instrumented, used when the source is unavailable
pub fn profiled_statements(script: &Script) -> BTreeSet<usize> {
    logical_rows(script)
        .filter(|(_, row)| row.count.is_some())
        .map(|(lineno, _)| lineno)
        .collect()
}

/// Count recorded for a 1-based line, 0 when there is none
pub fn line_count(script: &Script, lineno: usize) -> u64 {
    lineno
        .checked_sub(1)
        .and_then(|i| script.lines.get(i))
        .and_then(|row| row.count)
        .unwrap_or(0)
}

fn logical_rows(script: &Script) -> impl Iterator<Item = (usize, &Line)> {
    script
        .lines
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.is_continuation())
        .map(|(i, row)| (i + 1, row))
}
