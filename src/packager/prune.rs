//! Exclusion rules applied to the scratch copy before archiving.
//!
//! Pruning is two-phase: the full entry list is snapshotted first, then
//! matching entries are removed from that snapshot. Entries whose ancestor
//! was already removed are skipped.

use super::Resolution;
use super::utils::fs::remove_path;
use crate::error::Result;
use crate::project::IgnoreList;
use std::path::{Path, PathBuf};

/// Why an entry was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneReason {
    /// Name starts with `.`
    Hidden,
    /// Directory or `.js` file named after another resolution
    OtherResolution,
    /// Listed in the ignore list
    Ignored,
}

/// An entry removed from the working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrunedEntry {
    /// Path relative to the working root
    pub relative: PathBuf,
    /// Rule that removed it
    pub reason: PruneReason,
}

/// Decides which entries of a working copy are left out of the archive.
#[derive(Debug, Clone, Copy)]
pub struct PruneRules<'a> {
    resolution: Option<Resolution>,
    ignore: &'a IgnoreList,
}

impl<'a> PruneRules<'a> {
    /// Rules for packaging `resolution`; `None` disables the resolution rule.
    pub fn new(resolution: Option<Resolution>, ignore: &'a IgnoreList) -> Self {
        Self { resolution, ignore }
    }

    /// Rule that applies to an entry, if any. First matching rule wins.
    pub fn check(&self, relative: &Path, is_dir: bool) -> Option<PruneReason> {
        let name = relative.file_name()?.to_string_lossy();

        if name.starts_with('.') {
            return Some(PruneReason::Hidden);
        }

        if let Some(active) = self.resolution {
            let off_size = active.others().any(|other| {
                (is_dir && name == other.as_str()) || name == format!("{}.js", other)
            });
            if off_size {
                return Some(PruneReason::OtherResolution);
            }
        }

        if self.ignore.matches(relative) {
            return Some(PruneReason::Ignored);
        }

        None
    }

    /// Removes every matching entry below `working_dir`.
    ///
    /// `working_dir` itself is never removed.
    pub fn apply(&self, working_dir: &Path) -> Result<Vec<PrunedEntry>> {
        // Phase 1: snapshot
        let mut snapshot = Vec::new();
        for entry in walkdir::WalkDir::new(working_dir)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            let relative = entry.path().strip_prefix(working_dir)?.to_path_buf();
            snapshot.push((relative, entry.file_type().is_dir()));
        }

        // Phase 2: remove from the snapshot
        let mut pruned: Vec<PrunedEntry> = Vec::new();
        for (relative, is_dir) in snapshot {
            if pruned
                .iter()
                .any(|p| relative.starts_with(&p.relative))
            {
                continue;
            }

            if let Some(reason) = self.check(&relative, is_dir) {
                let path = working_dir.join(&relative);
                log::debug!("Removing {} ({:?})", path.display(), reason);
                remove_path(&path)?;
                pruned.push(PrunedEntry { relative, reason });
            }
        }

        Ok(pruned)
    }
}
