//! Error types for widget packaging.
//!
//! Variants are grouped the way failures surface to the user: usage errors
//! caught while validating the project, manifest errors, and packaging
//! errors raised while a resolution is being built.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for packager operations
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Main error type for all packager operations
#[derive(Error, Debug)]
pub enum PackagerError {
    /// Project path does not carry the widget extension
    #[error("{} is not a widget directory", .path.display())]
    NotAWidget {
        /// Offending project path
        path: PathBuf,
    },

    /// Project has no `Contents/` directory
    #[error("Can't find Contents directory in {}", .path.display())]
    MissingContents {
        /// Project path
        path: PathBuf,
    },

    /// Project has no manifest file
    #[error("Can't find widget.xml file: {}", .path.display())]
    MissingManifest {
        /// Expected manifest location
        path: PathBuf,
    },

    /// An explicitly requested ignore file does not exist
    #[error("Can't find ignore file: {}", .path.display())]
    MissingIgnoreFile {
        /// Resolved ignore file path
        path: PathBuf,
    },

    /// Output directory is the project or one of its ancestors
    #[error(
        "Output directory {} contains the widget {}; refusing to delete it",
        .output.display(),
        .project.display()
    )]
    OutputContainsProject {
        /// Absolute output directory
        output: PathBuf,
        /// Absolute project root
        project: PathBuf,
    },

    /// Manifest is not well-formed XML
    #[error("Failed to parse {}: {source}", .path.display())]
    ManifestParse {
        /// Manifest path
        path: PathBuf,
        /// Underlying XML error
        source: roxmltree::Error,
    },

    /// Manifest root element is not `<metadata>`
    #[error("Unexpected root element <{found}> in {}, expected <metadata>", .path.display())]
    ManifestRoot {
        /// Manifest path
        path: PathBuf,
        /// Root element actually found
        found: String,
    },

    /// Manifest lacks a required field
    #[error("Can't find {field} in widget.xml file: {}", .path.display())]
    MissingManifestField {
        /// Field name (`identifier` or `version`)
        field: &'static str,
        /// Manifest path
        path: PathBuf,
    },

    /// Archiver reported failure
    #[error("Archive step failed: {command} - {reason}")]
    Archive {
        /// Command or archiver that failed
        command: String,
        /// Reason for the error
        reason: String,
    },

    /// Archiver reported success but produced nothing
    #[error("Archiver produced no file at {}", .path.display())]
    ArchiveMissing {
        /// Expected archive path
        path: PathBuf,
    },

    /// Filesystem operation failed, with context
    #[error("Failed {action} at {}: {source}", .path.display())]
    Fs {
        /// What was being attempted
        action: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal errors
    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Zip writer errors
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Path prefix stripping errors
    #[error("Path error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),
}

/// Attach filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wrap an IO error with the action and path that produced it.
    fn fs_context(self, action: &'static str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::io::Result<T> {
    fn fs_context(self, action: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| PackagerError::Fs {
            action,
            path: path.to_path_buf(),
            source,
        })
    }
}
