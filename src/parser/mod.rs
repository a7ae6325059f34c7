//! Profile report parsing and the profile data model.
//!
//! This module handles:
//! - Reading Vim `:profile` reports (all known layouts)
//! - Slicing fixed-width row tables
//! - Repairing scripts from legacy reports
//! - Building a reconciled [`Profile`]

pub mod adjust;
pub mod layout;
pub mod schema;
pub mod vim_profile;

// Re-export main types
pub use layout::ColumnLayout;
pub use schema::{Defined, Function, Line, Profile, Script};
pub use vim_profile::{parse_report, DefinedStyle, FormatVariant};

use crate::reconcile::reconcile;
use crate::utils::error::ProfileError;
use log::{debug, info};
use std::path::Path;

impl Profile {
    /// Read, parse and reconcile a report file
    ///
    /// **Public** - main entry point for loading profiles
    ///
    /// # Errors
    /// * `ProfileError` - the file cannot be read as UTF-8 text, or is not
    ///   a well-formed report
    pub fn load(path: impl AsRef<Path>) -> Result<Profile, ProfileError> {
        let path = path.as_ref();
        info!("Loading profile: {}", path.display());

        let text = std::fs::read_to_string(path)
            .map_err(|e| ProfileError::new(format!("cannot read profile: {e}"), path, 0))?;
        Self::from_text(&text, path)
    }

    /// Parse and reconcile report text
    ///
    /// `path` only labels errors; script sources are still read from disk
    /// for legacy reports.
    pub fn from_text(text: &str, path: impl AsRef<Path>) -> Result<Profile, ProfileError> {
        let (mut profile, variant) = parse_report(text, path.as_ref())?;

        if variant.is_legacy() {
            debug!("Legacy report layout, repairing script tables");
            for script in &mut profile.scripts {
                adjust::adjust_script(script);
            }
        }

        let stats = reconcile(&mut profile);
        debug!("Reconciliation: {:?}", stats);
        Ok(profile)
    }
}
