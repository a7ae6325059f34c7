//! Reconciliation of function tables onto script tables.
//!
//! This module handles:
//! - Mapping functions at their declared definition sites
//! - Content search for functions without a site (older reports)
//! - Propagation through nested function definitions
//! - Recognizing definition, continuation and comment lines

pub mod engine;
pub mod matcher;
pub mod patterns;

// Re-export main functions
pub use engine::{body_digest, group_by_digest, reconcile, BlockId, ReconcileStats};
pub use matcher::{join_continuations, map_lines, match_spans};
