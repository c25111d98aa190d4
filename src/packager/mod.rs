//! Packaging of widget projects into per-resolution archives.
//!
//! # Overview
//!
//! For each target [`Resolution`] the packager:
//! 1. Copies the project into a fresh scratch directory
//! 2. Prunes hidden, off-resolution and ignored entries ([`PruneRules`])
//! 3. Archives the cleaned copy through an [`Archiver`]
//! 4. Copies the archive to `<output_dir>/<resolution>/<outfile>`
//! 5. Reports the archive size against the resolution's budget
//!
//! # Module Organization
//!
//! - [`archive`] - `zip` command and built-in archivers
//! - [`orchestrator`] - Main [`Packager`] struct
//! - [`prune`] - Exclusion rules for the scratch copy
//! - [`resolution`] - Supported resolutions and size budgets
//! - [`tool_detection`] - External tool availability checking
//! - [`utils`] - Filesystem helpers and byte formatting

pub mod archive;
pub mod orchestrator;
pub mod prune;
pub mod resolution;
pub mod tool_detection;
pub mod utils;

pub use archive::{Archiver, ArchiverKind, BuiltinZip, ZipCommand};
pub use orchestrator::Packager;
pub use prune::{PruneReason, PruneRules, PrunedEntry};
pub use resolution::Resolution;

use std::path::PathBuf;
use utils::format_bytes;

/// Precision used for the size line of the packaging summary.
const SUMMARY_PRECISION: usize = 2;

/// A packaged archive for one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedArtifact {
    /// Resolution the archive was built for
    pub resolution: Resolution,
    /// Final archive location
    pub path: PathBuf,
    /// Archive size in bytes
    pub size: u64,
    /// Whether `size` fits the resolution's budget
    pub within_budget: bool,
}

impl PackagedArtifact {
    /// Records an archive and checks it against the resolution budget.
    pub fn new(resolution: Resolution, path: PathBuf, size: u64) -> Self {
        Self {
            resolution,
            path,
            size,
            within_budget: size <= resolution.max_archive_size(),
        }
    }

    /// Two-line completion summary: path, then size and budget verdict.
    pub fn summary(&self) -> String {
        format!(
            "Created: {}\nFile size: {} - size is {}",
            self.path.display(),
            format_bytes(self.size, SUMMARY_PRECISION),
            if self.within_budget { "ok" } else { "OVER!" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_inclusive() {
        let at_limit = PackagedArtifact::new(Resolution::Qhd, "a".into(), 2_621_440);
        assert!(at_limit.within_budget);
        let over = PackagedArtifact::new(Resolution::Qhd, "a".into(), 2_621_441);
        assert!(!over.within_budget);
        let large_ok = PackagedArtifact::new(Resolution::FullHd, "a".into(), 2_621_441);
        assert!(large_ok.within_budget);
    }

    #[test]
    fn summary_format() {
        let artifact = PackagedArtifact::new(
            Resolution::FullHd,
            "packager_output/1920x1080/a-1.widget".into(),
            6_291_456,
        );
        assert_eq!(
            artifact.summary(),
            "Created: packager_output/1920x1080/a-1.widget\nFile size: 6.00 MB - size is OVER!"
        );
    }
}
