//! Line recognizers shared by parsing and reconciliation.

use once_cell::sync::Lazy;
use regex::Regex;

/// `:fu[nction][!]` in any abbreviation
static FUNCTION_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfu(?:n(?:c(?:t(?:i(?:o(?:n)?)?)?)?)?)?!?\b").expect("valid function pattern")
});

/// Blank or comment-only
static NON_EXECUTABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*(?:$|")"#).expect("valid non-executable pattern"));

/// Whether a line may define a function
pub fn is_function_definition(line: &str) -> bool {
    FUNCTION_KEYWORD.is_match(line)
}

/// Whether a line is blank or a comment
pub fn is_non_executable(line: &str) -> bool {
    NON_EXECUTABLE.is_match(line)
}

/// Whether a line continues the previous one
pub fn is_continuation(line: &str) -> bool {
    line.trim_start().starts_with('\\')
}
