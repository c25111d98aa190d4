//! Widget project discovery and validation.
//!
//! A widget project is a directory named `<name>.widget` that holds a
//! `Contents/` directory with a `widget.xml` manifest. Validation happens
//! up front so that a malformed project is rejected before any scratch or
//! output directory is touched.

mod ignore;

pub use ignore::IgnoreList;

use crate::error::{PackagerError, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Required extension of a widget project directory (without the dot).
pub const WIDGET_EXTENSION: &str = "widget";

/// Required subdirectory of a widget project.
pub const CONTENTS_DIR: &str = "Contents";

/// Manifest location relative to the project root.
pub const MANIFEST_PATH: &str = "Contents/widget.xml";

/// Ignore file looked up in the project root when none is given.
pub const DEFAULT_IGNORE_FILE: &str = ".ignore";

/// A validated widget project.
#[derive(Debug, Clone)]
pub struct WidgetProject {
    /// Absolute project root, without trailing separator
    root: PathBuf,
    /// Project directory name, e.g. `Clock.widget`
    name: String,
    /// Entries excluded from every archive
    ignore: IgnoreList,
}

impl WidgetProject {
    /// Validates the project at `path` and builds its ignore list.
    ///
    /// The running executable is always the first ignore-list entry.
    pub fn open(path: &Path, ignore_file: Option<&Path>) -> Result<Self> {
        let self_path = std::env::current_exe().ok();
        Self::open_with_self_path(path, ignore_file, self_path.as_deref())
    }

    /// Like [`WidgetProject::open`], with an explicit path for the tool
    /// itself instead of the current executable.
    pub fn open_with_self_path(
        path: &Path,
        ignore_file: Option<&Path>,
        self_path: Option<&Path>,
    ) -> Result<Self> {
        let root = normalize_project_path(path)?;
        log::debug!("Validating widget project at {}", root.display());

        if root.extension().and_then(|e| e.to_str()) != Some(WIDGET_EXTENSION) {
            return Err(PackagerError::NotAWidget { path: root });
        }

        if !root.join(CONTENTS_DIR).is_dir() {
            return Err(PackagerError::MissingContents { path: root });
        }

        let manifest = root.join(MANIFEST_PATH);
        if !manifest.is_file() {
            return Err(PackagerError::MissingManifest { path: manifest });
        }

        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PackagerError::NotAWidget { path: root.clone() })?;

        let mut ignore = IgnoreList::new();
        if let Some(self_path) = self_path {
            ignore.push(&relative_self_path(self_path, &root));
        }

        match ignore_file {
            Some(given) => {
                let resolved = resolve_ignore_file(&root, given);
                if !resolved.is_file() {
                    return Err(PackagerError::MissingIgnoreFile { path: resolved });
                }
                log::debug!("Reading ignore file {}", resolved.display());
                ignore.extend_from_file(&resolved)?;
            }
            None => {
                let default = root.join(DEFAULT_IGNORE_FILE);
                if default.is_file() {
                    log::debug!("Reading default ignore file {}", default.display());
                    ignore.extend_from_file(&default)?;
                } else {
                    log::debug!("No default ignore file at {}", default.display());
                }
            }
        }

        Ok(Self { root, name, ignore })
    }

    /// Absolute project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Project directory name, used as the archive root entry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_PATH)
    }

    /// Entries excluded from every archive.
    pub fn ignore_list(&self) -> &IgnoreList {
        &self.ignore
    }
}

/// Makes `path` absolute and strips trailing separators.
fn normalize_project_path(path: &Path) -> Result<PathBuf> {
    // Non-UTF-8 paths are taken verbatim.
    let path = match path.to_str().map(str::trim) {
        Some("") => Path::new("."),
        Some(trimmed) => Path::new(trimmed),
        None => path,
    };
    let absolute = path.absolutize()?;
    Ok(absolute.components().collect())
}

/// Absolute ignore files are used as-is; relative ones live in the project.
fn resolve_ignore_file(root: &Path, given: &Path) -> PathBuf {
    if given.is_absolute() {
        given.to_path_buf()
    } else {
        root.join(given)
    }
}

/// The tool's path relative to the project root when it lives inside it,
/// so that a packager shipped with the widget is left out of the archive.
fn relative_self_path(self_path: &Path, root: &Path) -> String {
    match self_path.strip_prefix(root) {
        Ok(relative) => relative.to_string_lossy().into_owned(),
        Err(_) => self_path.to_string_lossy().into_owned(),
    }
}
