//! Builders for profile reports in the layouts Vim writes.

#![allow(dead_code)]

use std::fmt::Write;

pub const NARROW_HEADER: &str = "count  total (s)   self (s)";
pub const WIDE_HEADER: &str = "count     total (s)      self (s)";

pub type Row<'a> = (Option<u64>, &'a str);

/// Report text assembled record by record
pub struct ReportBuilder {
    text: String,
    wide: bool,
}

impl ReportBuilder {
    pub fn narrow() -> Self {
        Self {
            text: String::new(),
            wide: false,
        }
    }

    pub fn wide() -> Self {
        Self {
            text: String::new(),
            wide: true,
        }
    }

    pub fn script(mut self, path: &str, sourced: u64, rows: &[Row]) -> Self {
        let _ = writeln!(self.text, "SCRIPT  {path}");
        let _ = writeln!(self.text, "Sourced {sourced} time{}", if sourced == 1 { "" } else { "s" });
        self.text.push_str("Total time:   0.000100\n");
        self.text.push_str(" Self time:   0.000050\n\n");
        self.table(rows, true);
        self
    }

    pub fn function(mut self, name: &str, defined: Option<&str>, called: u64, rows: &[Row]) -> Self {
        let _ = writeln!(self.text, "FUNCTION  {name}");
        if let Some(defined) = defined {
            let _ = writeln!(self.text, "    Defined: {defined}");
        }
        let _ = writeln!(self.text, "Called {called} time{}", if called == 1 { "" } else { "s" });
        self.text.push_str("Total time:   0.000020\n");
        self.text.push_str(" Self time:   0.000010\n\n");
        self.table(rows, false);
        self
    }

    pub fn build(mut self) -> String {
        self.text.push_str("FUNCTIONS SORTED ON TOTAL TIME\n");
        self.text
    }

    fn table(&mut self, rows: &[Row], script: bool) {
        let header = if self.wide { WIDE_HEADER } else { NARROW_HEADER };
        let _ = writeln!(self.text, "{header}");
        for &(count, text) in rows {
            let row = match (count, self.wide) {
                (Some(c), false) => format!("{c:>5} {:>10.6} {:>10.6} {text}", 0.00001, 0.00001),
                (Some(c), true) => format!("{c:>5} {:>13.9} {:>13.9} {text}", 0.00001, 0.00001),
                // wide script tables keep the narrow padding on rows without data
                (None, true) if !script => format!("{:34}{text}", ""),
                (None, _) => format!("{:28}{text}", ""),
            };
            let _ = writeln!(self.text, "{row}");
        }
        self.text.push('\n');
    }
}

/// `(count or 0, text)` pairs, the way assertions read best
pub fn counts(lines: &[vimprof_coverage::parser::Line]) -> Vec<(u64, String)> {
    lines
        .iter()
        .map(|l| (l.count.unwrap_or(0), l.line.clone()))
        .collect()
}
