//! Command line argument parsing and the resulting configuration.
//!
//! This module provides CLI argument parsing using clap and converts the
//! parsed flags into an immutable [`Config`] that is passed by reference to
//! every later stage.

use crate::packager::{ArchiverKind, Resolution};
use clap::Parser;
use std::path::PathBuf;

/// Output directory used when `--outputdir` is not given.
pub const DEFAULT_OUTPUT_DIR: &str = "packager_output";

/// Packages a .widget project into per-resolution zip archives
#[derive(Parser, Debug)]
#[command(
    name = "widget-packager",
    version,
    about = "Packages a .widget project into per-resolution zip archives",
    long_about = "Packaging tool for TV widgets. Copies the widget to a temporary directory, \
then packages it once per supported resolution and puts the resulting zip files in \
<outputdir>/<size>/.

Hidden files are never packaged. When packaging for a size, directories named after \
the other supported sizes are removed, as are .js files named after them (so when \
packaging for 960x540 anything named 1920x1080.js is deleted).

Entries listed in the ignore file are removed from every package. Without \
--ignore-file, a file called .ignore in the widget root is used when present.",
    after_help = concat!(
        "Supported resolutions: 960x540 (max 2.5 MB), 1920x1080 (max 5 MB)\n\n",
        "Examples:\n",
        "  widget-packager Clock.widget\n",
        "  widget-packager -s 960x540 -o clock.widget Clock.widget\n",
        "  widget-packager -i packaging/ignore.txt -d dist ."
    )
)]
pub struct Args {
    /// Widget project directory (must end in .widget)
    #[arg(value_name = "WIDGETPATH", default_value = ".")]
    pub widget_path: PathBuf,

    /// Output more information
    #[arg(short, long)]
    pub verbose: bool,

    /// Package for a single resolution only
    ///
    /// Deletes directories and .js files named after the other resolutions.
    #[arg(short, long, value_name = "RES", value_parser = parse_resolution)]
    pub size: Option<Resolution>,

    /// Text file listing files to leave out, one per line
    ///
    /// Relative paths are resolved against the widget directory. Lines
    /// starting with # are comments. Entries may use * and ? wildcards.
    #[arg(short, long = "ignore-file", value_name = "FILE")]
    pub ignore_file: Option<PathBuf>,

    /// Output filename
    ///
    /// If not specified, widget.xml is parsed for the identifier and
    /// version and the filename is built from them.
    #[arg(short, long, value_name = "FILE")]
    pub outfile: Option<String>,

    /// Output directory; previous contents are deleted
    #[arg(
        short = 'd',
        long = "outputdir",
        value_name = "DIR",
        env = "WIDGET_PACKAGER_OUTPUT_DIR",
        default_value = DEFAULT_OUTPUT_DIR,
        value_parser = parse_output_dir
    )]
    pub output_dir: PathBuf,

    /// Archiver: the zip command, the built-in writer, or auto-detect
    #[arg(long, value_enum, default_value_t = ArchiverKind::Auto)]
    pub archiver: ArchiverKind,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

fn parse_resolution(value: &str) -> Result<Resolution, String> {
    value.parse()
}

/// Strips trailing path separators, keeping a bare root intact.
fn parse_output_dir(value: &str) -> Result<PathBuf, String> {
    let trimmed = value.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        if value.is_empty() {
            return Err("output directory cannot be empty".to_string());
        }
        return Ok(PathBuf::from(&value[..1]));
    }
    Ok(PathBuf::from(trimmed))
}

/// Configuration derived from command line arguments
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Echo progress messages and let the zip tool print its own output
    pub verbose: bool,
    /// Single resolution to package, or all when `None`
    pub size: Option<Resolution>,
    /// Explicit ignore file; missing file is fatal when set
    pub ignore_file: Option<PathBuf>,
    /// Root directory for packaged archives
    pub output_dir: PathBuf,
    /// Explicit archive filename; skips manifest parsing when set
    pub outfile: Option<String>,
    /// Widget project directory
    pub project: PathBuf,
    /// Archiver selection
    pub archiver: ArchiverKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            size: None,
            ignore_file: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            outfile: None,
            project: PathBuf::from("."),
            archiver: ArchiverKind::Auto,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            verbose: args.verbose,
            size: args.size,
            ignore_file: args.ignore_file,
            output_dir: args.output_dir,
            outfile: args.outfile,
            project: args.widget_path,
            archiver: args.archiver,
        }
    }
}
