//! External tool detection and availability checking.
//!
//! The `zip` command line tool is preferred for archiving when present;
//! the packager falls back to the built-in writer otherwise.

use std::path::PathBuf;
use std::sync::LazyLock;

/// Path to a working `zip` executable, if one is on `PATH`.
///
/// Cached result to avoid repeated subprocess calls across resolutions.
pub static ZIP_COMMAND: LazyLock<Option<PathBuf>> = LazyLock::new(|| match which::which("zip") {
    Ok(path) => {
        log::debug!("Found zip at: {}", path.display());

        match std::process::Command::new(&path).arg("-v").output() {
            Ok(output) if output.status.success() => {
                let banner = String::from_utf8_lossy(&output.stdout);
                log::info!(
                    "✓ zip available: {}",
                    banner.lines().nth(1).unwrap_or_default().trim()
                );
                Some(path)
            }
            Ok(output) => {
                log::warn!(
                    "zip found at {} but -v check failed (exit code: {:?}). \
                         Falling back to the built-in archiver. \
                         Stderr: {}",
                    path.display(),
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr)
                );
                None
            }
            Err(e) => {
                log::warn!(
                    "zip found at {} but failed to execute: {}. \
                         Falling back to the built-in archiver.",
                    path.display(),
                    e
                );
                None
            }
        }
    }
    Err(e) => {
        log::debug!(
            "zip not found in PATH: {}. Using the built-in archiver.",
            e
        );
        None
    }
});
