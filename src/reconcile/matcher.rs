//! Laying a function body onto the rows of its owning block.
//!
//! A function table holds one row per logical line, while the owning script
//! (or outer function) may split that line over continuation rows. Matching
//! is all-or-nothing: the block is only written once every body row has
//! found its place.

use crate::parser::schema::Line;
use std::ops::Range;

/// Logical line starting at `index`
///
/// The row text followed by every continuation row after it, each with
/// its indentation and one leading `\` removed. Returns the joined text and
/// how many rows it spans.
pub fn join_continuations(block: &[Line], index: usize) -> (String, usize) {
    let Some(first) = block.get(index) else {
        return (String::new(), 0);
    };
    let mut text = first.line.clone();
    let mut rows = 1;
    for row in &block[index + 1..] {
        match row.line.trim_start().strip_prefix('\\') {
            Some(rest) => {
                text.push_str(rest);
                rows += 1;
            }
            None => break,
        }
    }
    (text, rows)
}

/// Rows of `block` covered by each body line, starting at `start`
///
/// `None` as soon as one body line matches neither the row itself nor
/// the row joined with its continuations, or the block runs out.
pub fn match_spans(block: &[Line], start: usize, body: &[Line]) -> Option<Vec<Range<usize>>> {
    let mut spans = Vec::with_capacity(body.len());
    let mut i = start;
    for expected in body {
        let row = block.get(i)?;
        let end = if row.line == expected.line {
            i + 1
        } else {
            let (joined, rows) = join_continuations(block, i);
            if joined != expected.line {
                return None;
            }
            i + rows
        };
        spans.push(i..end);
        i = end;
    }
    Some(spans)
}

/// Map `body` onto `block` at 0-based row `start`
///
/// **Public** - the single mapping primitive of the engine
///
/// Every covered row takes the body line's count and times unless it
/// already has a count. Returns the index just past the last covered row;
/// on `None` the block is unchanged.
pub fn map_lines(block: &mut [Line], start: usize, body: &[Line]) -> Option<usize> {
    let spans = match_spans(block, start, body)?;
    let end = spans.last().map_or(start, |s| s.end);
    for (span, source) in spans.into_iter().zip(body) {
        for row in &mut block[span] {
            row.fill_from(source);
        }
    }
    Some(end)
}

/// Copy `body` onto the rows under `start` one-for-one, without comparing text
///
/// Used only when nothing better is available. `None` when the block is too
/// short to hold the body.
pub fn map_positionally(block: &mut [Line], start: usize, body: &[Line]) -> Option<usize> {
    let end = start.checked_add(body.len())?;
    let rows = block.get_mut(start..end)?;
    for (row, source) in rows.iter_mut().zip(body) {
        row.fill_from(source);
    }
    Some(end)
}
