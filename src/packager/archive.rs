//! Archive creation for cleaned working copies.
//!
//! Archiving is an external collaborator with a narrow contract: given the
//! scratch directory and the name of the project directory inside it,
//! write a zip file whose single root entry is that directory. Every
//! implementation reports failure explicitly; callers never have to infer
//! it from a missing file.

use super::tool_detection::ZIP_COMMAND;
use crate::error::{ErrorExt, PackagerError, Result};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Produces a zip archive from a directory inside a scratch area.
pub trait Archiver {
    /// Short name for logs and error messages.
    fn name(&self) -> &str;

    /// Zip `scratch_dir/root_name` into `archive_path`, with `root_name/`
    /// as the archive's root entry.
    fn archive(&self, scratch_dir: &Path, root_name: &str, archive_path: &Path) -> Result<()>;
}

/// Which archiver to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ArchiverKind {
    /// `zip` command when available, built-in writer otherwise
    #[default]
    Auto,
    /// The `zip` command line tool
    Zip,
    /// In-process zip writer
    Builtin,
}

impl ArchiverKind {
    /// Instantiate the archiver for this choice.
    pub fn build(self, verbose: bool) -> Result<Box<dyn Archiver>> {
        match self {
            ArchiverKind::Auto => {
                let archiver: Box<dyn Archiver> = match ZIP_COMMAND.as_ref() {
                    Some(program) => Box::new(ZipCommand::new(program.clone(), verbose)),
                    None => Box::new(BuiltinZip),
                };
                Ok(archiver)
            }
            ArchiverKind::Zip => {
                let program = ZIP_COMMAND.as_ref().ok_or_else(|| PackagerError::Archive {
                    command: "zip".to_string(),
                    reason: "zip was requested but is not available in PATH".to_string(),
                })?;
                Ok(Box::new(ZipCommand::new(program.clone(), verbose)))
            }
            ArchiverKind::Builtin => Ok(Box::new(BuiltinZip)),
        }
    }
}

/// Runs `zip -r [-q] <archive> <root>` inside the scratch directory.
#[derive(Debug, Clone)]
pub struct ZipCommand {
    program: PathBuf,
    verbose: bool,
}

impl ZipCommand {
    /// `verbose` lets zip print its own progress; otherwise `-q` is passed.
    pub fn new(program: PathBuf, verbose: bool) -> Self {
        Self { program, verbose }
    }
}

impl Archiver for ZipCommand {
    fn name(&self) -> &str {
        "zip"
    }

    fn archive(&self, scratch_dir: &Path, root_name: &str, archive_path: &Path) -> Result<()> {
        let mut command = Command::new(&self.program);
        command.current_dir(scratch_dir).arg("-r");
        if !self.verbose {
            command.arg("-q");
        }
        command.arg(archive_path).arg(root_name);

        let stdout = if self.verbose {
            Stdio::inherit()
        } else {
            Stdio::null()
        };

        log::debug!("Running: {:?} in {}", command, scratch_dir.display());

        let output = command
            .stdout(stdout)
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| PackagerError::Archive {
                command: self.program.display().to_string(),
                reason: format!("failed to execute: {}", e),
            })?;

        if !output.status.success() {
            return Err(PackagerError::Archive {
                command: format!("zip -r {} {}", archive_path.display(), root_name),
                reason: format!(
                    "exit code {:?}: {}",
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        // zip appends `.zip` to archive names without an extension.
        if archive_path.extension().is_none() {
            let appended = archive_path.with_extension("zip");
            if appended.is_file() && !archive_path.exists() {
                std::fs::rename(&appended, archive_path).fs_context("renaming archive", &appended)?;
            }
        }

        Ok(())
    }
}

/// Writes the archive in-process with the `zip` crate.
///
/// Entries are added in sorted order; directories get their own entries
/// and symlinks are stored as links, matching `zip -r` defaults closely
/// enough for widget runtimes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinZip;

impl Archiver for BuiltinZip {
    fn name(&self) -> &str {
        "builtin"
    }

    fn archive(&self, scratch_dir: &Path, root_name: &str, archive_path: &Path) -> Result<()> {
        let source = scratch_dir.join(root_name);
        let file = File::create(archive_path).fs_context("creating archive", archive_path)?;
        let mut writer = ZipWriter::new(BufWriter::new(file));
        let base = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in walkdir::WalkDir::new(&source)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            let relative = entry.path().strip_prefix(scratch_dir)?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let options = with_permissions(base, entry.path())?;

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())
                    .fs_context("reading symlink", entry.path())?;
                writer.add_symlink(name, target.to_string_lossy(), options)?;
            } else if entry.file_type().is_dir() {
                writer.add_directory(format!("{}/", name), options)?;
            } else {
                writer.start_file(name, options)?;
                let mut input =
                    File::open(entry.path()).fs_context("opening file", entry.path())?;
                io::copy(&mut input, &mut writer).fs_context("compressing file", entry.path())?;
            }
        }

        writer.finish()?;
        Ok(())
    }
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, path: &Path) -> Result<SimpleFileOptions> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = std::fs::symlink_metadata(path).fs_context("reading metadata", path)?;
    Ok(options.unix_permissions(metadata.permissions().mode() & 0o7777))
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _path: &Path) -> Result<SimpleFileOptions> {
    Ok(options)
}
