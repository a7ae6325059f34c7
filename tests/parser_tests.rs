mod common;

use common::{counts, ReportBuilder};
use pretty_assertions::assert_eq;
use std::path::Path;
use vimprof_coverage::parser::{parse_report, ColumnLayout, DefinedStyle, Profile};

const GLOBAL: &str = "tests/vimfiles/global.vim";

fn global_report(builder: ReportBuilder, today: Option<&str>, main: Option<&str>) -> String {
    builder
        .script(
            GLOBAL,
            1,
            &[
                (Some(1), "function! Today() abort"),
                (None, "  echo strftime('%Y-%m-%d')"),
                (None, "endfunction"),
                (None, ""),
                (Some(1), "function! Main() abort"),
                (None, "  echo 'Hello, world!'"),
                (None, "endfunction"),
                (None, ""),
                (Some(1), "call Main()"),
            ],
        )
        .function("Today()", today, 0, &[(None, "  echo strftime('%Y-%m-%d')")])
        .function("Main()", main, 1, &[(Some(1), "  echo 'Hello, world!'")])
        .build()
}

fn owned(rows: &[(u64, &str)]) -> Vec<(u64, String)> {
    rows.iter().map(|(c, l)| (*c, l.to_string())).collect()
}

#[test]
fn test_single_script() {
    let text = ReportBuilder::narrow().script("a.vim", 1, &[(Some(1), "echo 1")]).build();
    let profile = Profile::from_text(&text, "profile.txt").unwrap();

    assert_eq!(profile.scripts.len(), 1);
    assert!(profile.functions.is_empty());
    let script = profile.script("a.vim").unwrap();
    assert_eq!(script.sourced, 1);
    assert_eq!(script.total_time, 0.0001);
    assert_eq!(script.self_time, 0.00005);
    assert_eq!(script.lines.len(), 1);
    assert_eq!(script.lines[0].count, Some(1));
    assert_eq!(script.lines[0].total_time, Some(0.00001));
    assert_eq!(script.lines[0].self_time, Some(0.00001));
    assert_eq!(script.lines[0].line, "echo 1");
}

#[test]
fn test_script_without_rows() {
    let text = ReportBuilder::narrow().script("a.vim", 1, &[]).build();
    let profile = Profile::from_text(&text, "profile.txt").unwrap();

    assert_eq!(profile.scripts.len(), 1);
    assert!(profile.scripts[0].lines.is_empty());
}

#[test]
fn test_unexpected_first_line() {
    let err = Profile::from_text("....\n", "profile.txt").unwrap_err();
    assert_eq!(err.to_string(), "unexpected line");
    assert_eq!(err.lineno, 1);
    assert_eq!(err.path, Path::new("profile.txt"));
}

#[test]
fn test_empty_report() {
    let err = Profile::from_text("", "profile.txt").unwrap_err();
    assert_eq!(err.message, "unexpected line");
    assert_eq!(err.lineno, 1);
}

#[test]
fn test_malformed_script() {
    let err = Profile::from_text("SCRIPT  a.vim\nSourced 1 time\nbogus\n", "p.txt").unwrap_err();
    assert_eq!(err.to_string(), "cannot parse SCRIPT");
    assert_eq!(err.lineno, 3);

    let err = Profile::from_text("SCRIPT  a.vim\nSourced 1 time\n", "p.txt").unwrap_err();
    assert_eq!(err.to_string(), "cannot parse SCRIPT");
}

#[test]
fn test_malformed_function() {
    let err = Profile::from_text("FUNCTION  F()\n    Defined: nowhere\n", "p.txt").unwrap_err();
    assert_eq!(err.to_string(), "cannot parse FUNCTION");
    assert_eq!(err.lineno, 2);

    let err = Profile::from_text("FUNCTION  F()\nCalled x times\n", "p.txt").unwrap_err();
    assert_eq!(err.to_string(), "cannot parse FUNCTION");
}

#[test]
fn test_bad_count_in_row() {
    let text = "SCRIPT  a.vim\nSourced 1 time\n\ncount  total (s)   self (s)\n   x1   0.000010   0.000010 echo 1\n\n";
    let err = Profile::from_text(text, "p.txt").unwrap_err();
    assert_eq!(err.to_string(), "cannot parse SCRIPT");
    assert_eq!(err.lineno, 5);
}

#[test]
fn test_global_functions_every_layout() {
    let builders: [(fn() -> ReportBuilder, ColumnLayout); 2] = [
        (ReportBuilder::narrow, ColumnLayout::Narrow),
        (ReportBuilder::wide, ColumnLayout::Wide),
    ];
    let sites = [
        ("tests/vimfiles/global.vim:1", "tests/vimfiles/global.vim:5", DefinedStyle::Colon),
        (
            "tests/vimfiles/global.vim line 1",
            "tests/vimfiles/global.vim line 5",
            DefinedStyle::LineKeyword,
        ),
    ];

    for (builder, layout) in builders {
        for (today, main, style) in sites {
            let text = global_report(builder(), Some(today), Some(main));

            let (_, variant) = parse_report(&text, Path::new("profile.txt")).unwrap();
            assert_eq!(variant.layout, Some(layout));
            assert_eq!(variant.defined, style);
            assert!(!variant.is_legacy());

            let profile = Profile::from_text(&text, "profile.txt").unwrap();
            let script = profile.script(GLOBAL).unwrap();
            assert_eq!(
                counts(&script.lines),
                owned(&[
                    (1, "function! Today() abort"),
                    (0, "  echo strftime('%Y-%m-%d')"),
                    (0, "endfunction"),
                    (0, ""),
                    (1, "function! Main() abort"),
                    (1, "  echo 'Hello, world!'"),
                    (0, "endfunction"),
                    (0, ""),
                    (1, "call Main()"),
                ])
            );

            let today = &profile.functions[0];
            assert_eq!(today.name, "Today()");
            assert_eq!(today.called, 0);
            assert_eq!(today.defined.as_ref().map(|d| (d.path.as_str(), d.line)), Some((GLOBAL, 1)));
            assert!(today.mapped);

            let main = &profile.functions[1];
            assert_eq!(main.defined.as_ref().map(|d| d.line), Some(5));
            assert!(main.mapped);
            assert_eq!(profile.unmapped_functions().count(), 0);
        }
    }
}

#[test]
fn test_global_functions_without_sites() {
    let text = global_report(ReportBuilder::narrow(), None, None);
    let (_, variant) = parse_report(&text, Path::new("profile.txt")).unwrap();
    assert!(variant.is_legacy());

    let profile = Profile::from_text(&text, "profile.txt").unwrap();
    assert!(profile.functions.iter().all(|f| f.mapped));
    assert_eq!(profile.scripts[0].lines[5].count, Some(1));
}

#[test]
fn test_defined_line_zero_clamps() {
    let text = global_report(
        ReportBuilder::narrow(),
        Some("tests/vimfiles/global.vim:0"),
        Some("tests/vimfiles/global.vim:5"),
    );
    let profile = Profile::from_text(&text, "profile.txt").unwrap();
    assert_eq!(profile.functions[0].defined.as_ref().map(|d| d.line), Some(1));
}

#[test]
fn test_continuation_rows_keep_fields() {
    let text = ReportBuilder::narrow()
        .script(
            "a.vim",
            1,
            &[(Some(2), "let x = ["), (None, "      \\ 1,"), (None, "      \\ ]"), (None, "")],
        )
        .build();
    let (profile, _) = parse_report(&text, Path::new("profile.txt")).unwrap();
    let lines = &profile.scripts[0].lines;

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1].count, Some(2));
    assert_eq!(lines[2].count, Some(2));
    assert_eq!(lines[2].line, "      \\ ]");
    assert_eq!(lines[3].count, None);
}

#[test]
fn test_repeated_script_replaces_record() {
    let text = ReportBuilder::narrow()
        .script("a.vim", 1, &[(Some(1), "echo 1")])
        .script("b.vim", 1, &[(Some(1), "echo 2")])
        .script("a.vim", 2, &[(Some(2), "echo 1")])
        .build();
    let (profile, _) = parse_report(&text, Path::new("profile.txt")).unwrap();

    let paths: Vec<_> = profile.scripts.iter().map(|s| s.path.as_str()).collect();
    assert_eq!(paths, vec!["a.vim", "b.vim"]);
    assert_eq!(profile.scripts[0].sourced, 2);
}

#[test]
fn test_trailer_ends_parse() {
    let mut text = ReportBuilder::narrow().script("a.vim", 1, &[(Some(1), "echo 1")]).build();
    text.push_str("count  total (s)   self (s)  function\n    1   0.000010             F()\n");
    assert!(Profile::from_text(&text, "profile.txt").is_ok());
}

#[test]
fn test_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.txt");
    std::fs::write(&path, ReportBuilder::narrow().script("a.vim", 1, &[(Some(1), "echo 1")]).build()).unwrap();

    let profile = Profile::load(&path).unwrap();
    assert_eq!(profile.path, path);

    let err = Profile::load(dir.path().join("missing.txt")).unwrap_err();
    assert!(err.message.starts_with("cannot read profile: "));
    assert_eq!(err.lineno, 0);
}

#[test]
fn test_legacy_report_repaired_from_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("legacy.vim");
    std::fs::write(&source, "let g:x = 1\nlet g:list = [\n      \\ 1,\n      \\ ]\n").unwrap();
    let source = source.to_string_lossy().into_owned();
    let rows = [(None, "let g:x = 1"), (Some(1), "let g:list = [")];

    let narrow = ReportBuilder::narrow().script(&source, 1, &rows).build();
    let profile = Profile::from_text(&narrow, "profile.txt").unwrap();
    assert_eq!(
        counts(&profile.scripts[0].lines),
        owned(&[
            (1, "let g:x = 1"),
            (1, "let g:list = ["),
            (1, "      \\ 1,"),
            (1, "      \\ ]"),
        ])
    );

    // newer layouts are trusted as written
    let wide = ReportBuilder::wide().script(&source, 1, &rows).build();
    let profile = Profile::from_text(&wide, "profile.txt").unwrap();
    assert_eq!(profile.scripts[0].lines.len(), 2);
    assert_eq!(profile.scripts[0].lines[0].count, None);
}
