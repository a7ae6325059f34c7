//! vimprof-coverage
//!
//! Line and branch coverage for Vim script, computed from the reports
//! written by Vim's built-in `:profile` command.
//!
//! This crate provides the core implementation for the `vimcov` CLI tool:
//! parsing profile reports of every known layout, placing each function's
//! counts back onto the lines of the script that defines it, and exporting
//! the result as combined coverage data or LCOV.
//!
//! ## Getting Started
//!
//! ```bash
//! vim --cmd 'profile start profile.txt' --cmd 'profile file *' ...
//! vimcov combine profile.txt
//! vimcov lcov -o coverage.lcov
//! ```
//!
//! From Rust:
//!
//! ```ignore
//! let profile = vimprof_coverage::parser::Profile::load("profile.txt")?;
//! for function in profile.unmapped_functions() {
//!     eprintln!("Could not find line for function: {}", function.name);
//! }
//! ```

pub mod commands;
pub mod coverage;
pub mod output;
pub mod parser;
pub mod reconcile;
pub mod utils;
