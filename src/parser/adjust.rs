//! Repairs for scripts read from legacy (Vim 8.0.1206 and older) reports.
//!
//! Those reports leave the first line of a script without a count and drop
//! continuation rows at the very end of the file. Both are recovered from
//! the script source when it is available.

use super::schema::{Line, Script};
use crate::reconcile::patterns::{is_continuation, is_non_executable};
use log::debug;
use std::path::Path;

/// Apply both repairs to a script
///
/// **Public** - called on every script of a legacy report
pub fn adjust_script(script: &mut Script) {
    let Some(first) = script.lines.first_mut() else {
        return;
    };
    if first.count.is_none() && !is_non_executable(&first.line) {
        first.count = Some(script.sourced);
    }

    let source = match std::fs::read_to_string(Path::new(&script.path)) {
        Ok(source) => source,
        Err(e) => {
            debug!("Skipping trailing-line repair for {}: {}", script.path, e);
            return;
        }
    };
    let disk: Vec<&str> = source.lines().collect();
    restore_trailing_continuations(script, &disk);
}

/// Append continuation rows present on disk but missing from the report
///
/// The recorded rows must be a prefix of the file, and the appended rows
/// must bring the script to exactly the file's length; otherwise the
/// script is left as parsed.
pub fn restore_trailing_continuations(script: &mut Script, disk: &[&str]) {
    let recorded = script.lines.len();
    let ends_with_continuation = disk
        .last()
        .is_some_and(|l| is_continuation(l));
    if disk.len() <= recorded || !ends_with_continuation {
        return;
    }
    if script.lines.iter().zip(disk).any(|(l, d)| l.line != *d) {
        return;
    }
    let Some(last) = script.lines.last().cloned() else {
        return;
    };

    let tail: Vec<Line> = disk[recorded..]
        .iter()
        .filter(|l| is_continuation(l))
        .map(|l| Line {
            line: l.to_string(),
            ..last.clone()
        })
        .collect();
    if recorded + tail.len() == disk.len() {
        debug!("Restored {} trailing rows of {}", tail.len(), script.path);
        script.lines.extend(tail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(lines: &[(Option<u64>, &str)]) -> Script {
        let mut s = Script::new("missing/never.vim", 2, 0.0, 0.0);
        s.lines = lines.iter().map(|(c, l)| Line::new(*c, None, None, *l)).collect();
        s
    }

    #[test]
    fn test_first_line_gets_sourced_count() {
        let mut s = script(&[(None, "let g:x = 1"), (Some(2), "let g:y = 2")]);
        adjust_script(&mut s);
        assert_eq!(s.lines[0].count, Some(2));
    }

    #[test]
    fn test_first_line_comment_untouched() {
        let mut s = script(&[(None, "\" header"), (Some(2), "let g:y = 2")]);
        adjust_script(&mut s);
        assert_eq!(s.lines[0].count, None);

        let mut s = script(&[(None, "   "), (Some(2), "let g:y = 2")]);
        adjust_script(&mut s);
        assert_eq!(s.lines[0].count, None);
    }

    #[test]
    fn test_trailing_continuations_restored() {
        let mut s = script(&[(Some(1), "let g:list = [")]);
        restore_trailing_continuations(&mut s, &["let g:list = [", "      \\ 1,", "      \\ ]"]);
        assert_eq!(s.lines.len(), 3);
        assert_eq!(s.lines[2].line, "      \\ ]");
        assert_eq!(s.lines[2].count, Some(1));
    }

    #[test]
    fn test_trailing_restore_reverted_on_gap() {
        let mut s = script(&[(Some(1), "let g:list = [")]);
        restore_trailing_continuations(&mut s, &["let g:list = [", "echo 1", "      \\ ]"]);
        assert_eq!(s.lines.len(), 1);
    }

    #[test]
    fn test_trailing_restore_requires_prefix() {
        let mut s = script(&[(Some(1), "let g:other = [")]);
        restore_trailing_continuations(&mut s, &["let g:list = [", "      \\ ]"]);
        assert_eq!(s.lines.len(), 1);
    }
}
