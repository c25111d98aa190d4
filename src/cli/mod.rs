//! Command line interface for the widget packager.
//!
//! Runs the pipeline in order: validate the project, resolve the output
//! filename, then package each requested resolution.

mod args;
mod output;

pub use args::{Args, Config, DEFAULT_OUTPUT_DIR};
pub use output::OutputManager;

use crate::error::Result;
use crate::metadata;
use crate::packager::{PackagedArtifact, Packager};
use crate::project::WidgetProject;

/// Main CLI entry point
pub fn run() -> Result<i32> {
    let config = Config::from(Args::parse_args());
    let artifacts = execute(&config)?;

    let over_budget = artifacts.iter().filter(|a| !a.within_budget).count();
    if over_budget > 0 {
        log::warn!("{} archive(s) exceed their size budget", over_budget);
    }

    Ok(0)
}

/// Runs the whole pipeline for an already-parsed configuration.
///
/// Validation and manifest errors are returned before anything is copied,
/// deleted or created.
pub fn execute(config: &Config) -> Result<Vec<PackagedArtifact>> {
    let output = OutputManager::new(config.verbose);

    output.verbose("Validating user input")?;
    let project = WidgetProject::open(&config.project, config.ignore_file.as_deref())?;
    log::debug!(
        "Ignore list for {} ({} entries): {:?}",
        project.name(),
        project.ignore_list().len(),
        project.ignore_list().fragments().collect::<Vec<_>>()
    );

    let outfile = match &config.outfile {
        Some(outfile) => outfile.clone(),
        None => {
            output.verbose("Reading widget.xml for output filename")?;
            metadata::load_manifest(&project.manifest_path())?.output_filename()
        }
    };

    let archiver = config.archiver.build(config.verbose)?;
    Packager::new(config, &project, outfile, archiver, &output).run()
}
