//! Per-resolution packaging pipeline.
//!
//! This module provides the [`Packager`] that turns a validated
//! [`WidgetProject`] into one archive per target resolution.

use super::{
    PackagedArtifact, Resolution,
    archive::Archiver,
    prune::{PruneReason, PruneRules},
    utils::fs,
};
use crate::{
    cli::{Config, OutputManager},
    error::{ErrorExt, PackagerError, Result},
    project::WidgetProject,
};
use path_absolutize::Absolutize;
use std::path::PathBuf;

/// Main packaging orchestrator.
///
/// Wipes the output directory, then for each requested resolution copies
/// the project to a scratch directory, prunes it, archives it and moves the
/// archive to `<output_dir>/<resolution>/<outfile>`.
///
/// # Examples
///
/// ```no_run
/// use widget_packager::{Config, Packager};
/// use widget_packager::cli::OutputManager;
/// use widget_packager::packager::BuiltinZip;
/// use widget_packager::project::WidgetProject;
///
/// # fn example() -> widget_packager::Result<()> {
/// let config = Config::default();
/// let project = WidgetProject::open(&config.project, None)?;
/// let output = OutputManager::new(false);
/// let packager = Packager::new(
///     &config,
///     &project,
///     "com.example.clock-1.0.widget".into(),
///     Box::new(BuiltinZip),
///     &output,
/// );
///
/// for artifact in packager.run()? {
///     println!("{}", artifact.summary());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Packager<'a> {
    config: &'a Config,
    project: &'a WidgetProject,
    outfile: String,
    archiver: Box<dyn Archiver>,
    output: &'a OutputManager,
    scratch_root: PathBuf,
}

impl std::fmt::Debug for Packager<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packager")
            .field("project", &self.project.root())
            .field("outfile", &self.outfile)
            .field("archiver", &self.archiver.name())
            .field("scratch_root", &self.scratch_root)
            .finish()
    }
}

impl<'a> Packager<'a> {
    /// Creates a packager writing `outfile` for every resolution.
    ///
    /// Scratch directories are created under the system temp directory.
    pub fn new(
        config: &'a Config,
        project: &'a WidgetProject,
        outfile: String,
        archiver: Box<dyn Archiver>,
        output: &'a OutputManager,
    ) -> Self {
        Self {
            config,
            project,
            outfile,
            archiver,
            output,
            scratch_root: std::env::temp_dir(),
        }
    }

    /// Creates scratch directories under `root` instead of the system temp
    /// directory. `root` must stay outside the output directory.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    /// Resolutions this run will package, in order.
    pub fn targets(&self) -> Vec<Resolution> {
        match self.config.size {
            Some(resolution) => vec![resolution],
            None => Resolution::ALL.to_vec(),
        }
    }

    /// Packages every target resolution.
    ///
    /// The first failing resolution aborts the run; its scratch directory
    /// is still removed.
    pub fn run(&self) -> Result<Vec<PackagedArtifact>> {
        self.clean_output_dir()?;

        let mut artifacts = Vec::new();
        for resolution in self.targets() {
            artifacts.push(self.package_for(resolution)?);
        }
        Ok(artifacts)
    }

    /// Removes prior results from the output directory.
    ///
    /// Fails without deleting anything when the output directory is the
    /// project root or one of its ancestors.
    fn clean_output_dir(&self) -> Result<()> {
        let output_dir = &self.config.output_dir;
        let absolute = output_dir.absolutize()?;
        if self.project.root().starts_with(&absolute) {
            return Err(PackagerError::OutputContainsProject {
                output: absolute.into_owned(),
                project: self.project.root().to_path_buf(),
            });
        }

        if output_dir.is_dir() {
            self.output
                .verbose(&format!("Removing previous output {}", output_dir.display()))?;
            fs::remove_dir_all(output_dir)?;
        }
        Ok(())
    }

    /// Packages a single resolution.
    pub fn package_for(&self, resolution: Resolution) -> Result<PackagedArtifact> {
        self.output
            .section(&format!("Creating packaged widget for: {}", resolution))?;

        // Removed on drop, including every early return below.
        let scratch = tempfile::Builder::new()
            .prefix(&format!("Widget.{}.", chrono::Utc::now().timestamp()))
            .tempdir_in(&self.scratch_root)
            .fs_context("creating scratch directory", &self.scratch_root)?;
        let scratch_path = scratch.path().to_path_buf();
        let working_dir = scratch_path.join(self.project.name());

        self.output
            .verbose(&format!("Creating temp directory {}", scratch_path.display()))?;
        self.output.verbose("Copying files to temp dir")?;
        fs::copy_dir(self.project.root(), &working_dir)?;

        self.output.verbose("Cleaning up files")?;
        if let Some(nested) = self.nested_output_dir()? {
            let stale = working_dir.join(nested);
            self.output
                .verbose(&format!("Removing: {}", stale.display()))?;
            fs::remove_path(&stale)?;
        }
        let rules = PruneRules::new(Some(resolution), self.project.ignore_list());
        for pruned in rules.apply(&working_dir)? {
            let path = working_dir.join(&pruned.relative);
            let message = match pruned.reason {
                PruneReason::Hidden => format!("Removing: {}", path.display()),
                PruneReason::OtherResolution => {
                    format!("Removing: {}, Current size: {}", path.display(), resolution)
                }
                PruneReason::Ignored => format!("Ignoring: {}", path.display()),
            };
            self.output.verbose(&message)?;
        }

        let archive_path = scratch_path.join(&self.outfile);
        self.output.verbose(&format!(
            "Archiving {} with {} archiver",
            self.project.name(),
            self.archiver.name()
        ))?;
        self.archiver
            .archive(&scratch_path, self.project.name(), &archive_path)?;
        if !archive_path.is_file() {
            return Err(PackagerError::ArchiveMissing { path: archive_path });
        }

        let final_path = self.final_path(resolution);
        fs::copy_file(&archive_path, &final_path)?;

        self.output.verbose("Cleaning up temp directory")?;
        scratch
            .close()
            .fs_context("removing scratch directory", &scratch_path)?;

        let size = std::fs::metadata(&final_path)
            .fs_context("reading archive metadata", &final_path)?
            .len();
        let artifact = PackagedArtifact::new(resolution, final_path, size);

        log::info!(
            "Packaged {} for {} ({} bytes)",
            self.project.name(),
            resolution,
            size
        );
        self.output.info(&artifact.summary())?;

        Ok(artifact)
    }

    /// Output directory relative to the project root, when it lives inside
    /// the project and would otherwise be copied into later packages.
    fn nested_output_dir(&self) -> Result<Option<PathBuf>> {
        let output_dir = self.config.output_dir.absolutize()?;
        Ok(output_dir
            .strip_prefix(self.project.root())
            .ok()
            .filter(|relative| !relative.as_os_str().is_empty())
            .map(PathBuf::from))
    }

    /// `<output_dir>/<resolution>/<outfile>`
    fn final_path(&self, resolution: Resolution) -> PathBuf {
        self.config
            .output_dir
            .join(resolution.as_str())
            .join(&self.outfile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packager::archive::BuiltinZip;
    use std::fs as stdfs;
    use std::io::Read;
    use std::path::Path;

    struct Fixture {
        _tmp: tempfile::TempDir,
        root: PathBuf,
        output_dir: PathBuf,
        scratch_root: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("Clock.widget");
        for dir in [
            "Contents/images/960x540",
            "Contents/images/1920x1080",
            "Contents/docs",
        ] {
            stdfs::create_dir_all(root.join(dir)).unwrap();
        }
        for file in [
            "Contents/widget.xml",
            "Contents/main.js",
            "Contents/960x540.js",
            "Contents/1920x1080.js",
            "Contents/images/960x540/bg.png",
            "Contents/images/1920x1080/bg.png",
            "Contents/docs/notes.txt",
            "Contents/.hidden",
        ] {
            stdfs::write(root.join(file), file).unwrap();
        }
        stdfs::write(root.join(".ignore"), "Contents/docs\n").unwrap();

        let scratch_root = tmp.path().join("scratch");
        stdfs::create_dir_all(&scratch_root).unwrap();
        let output_dir = tmp.path().join("packager_output");

        Fixture {
            root,
            output_dir,
            scratch_root,
            _tmp: tmp,
        }
    }

    fn entry_names(archive: &Path) -> Vec<String> {
        let file = stdfs::File::open(archive).unwrap();
        let zip = zip::ZipArchive::new(file).unwrap();
        zip.file_names().map(String::from).collect()
    }

    fn run(fx: &Fixture, size: Option<Resolution>) -> Result<Vec<PackagedArtifact>> {
        let config = Config {
            size,
            output_dir: fx.output_dir.clone(),
            project: fx.root.clone(),
            ..Config::default()
        };
        let project = WidgetProject::open_with_self_path(&fx.root, None, None)?;
        let output = OutputManager::new(false);
        Packager::new(
            &config,
            &project,
            "com.example.clock-1.0.widget".into(),
            Box::new(BuiltinZip),
            &output,
        )
        .with_scratch_root(&fx.scratch_root)
        .run()
    }

    #[test]
    fn packages_every_resolution_in_order() {
        let fx = fixture();
        let artifacts = run(&fx, None).unwrap();

        let resolutions: Vec<_> = artifacts.iter().map(|a| a.resolution).collect();
        assert_eq!(resolutions, Resolution::ALL.to_vec());

        for artifact in &artifacts {
            let expected = fx
                .output_dir
                .join(artifact.resolution.as_str())
                .join("com.example.clock-1.0.widget");
            assert_eq!(artifact.path, expected);
            assert!(expected.is_file());
            assert_eq!(artifact.size, stdfs::metadata(&expected).unwrap().len());
            assert!(artifact.within_budget);
        }
    }

    #[test]
    fn archive_excludes_pruned_entries() {
        let fx = fixture();
        let artifacts = run(&fx, Some(Resolution::FullHd)).unwrap();
        assert_eq!(artifacts.len(), 1);

        let names = entry_names(&artifacts[0].path);
        assert!(names.contains(&"Clock.widget/Contents/images/1920x1080/bg.png".to_string()));
        assert!(names.contains(&"Clock.widget/Contents/1920x1080.js".to_string()));
        assert!(names.contains(&"Clock.widget/Contents/main.js".to_string()));
        assert!(!names.iter().any(|n| n.contains("960x540")));
        assert!(!names.iter().any(|n| n.contains("docs")));
        assert!(!names.iter().any(|n| n.contains(".hidden") || n.contains(".ignore")));

        // Source project is untouched.
        assert!(fx.root.join("Contents/images/960x540/bg.png").exists());
        assert!(fx.root.join("Contents/.hidden").exists());
    }

    #[test]
    fn wipes_previous_output() {
        let fx = fixture();
        let stale = fx.output_dir.join("old/stale.widget");
        stdfs::create_dir_all(stale.parent().unwrap()).unwrap();
        stdfs::write(&stale, "stale").unwrap();

        run(&fx, Some(Resolution::Qhd)).unwrap();

        assert!(!fx.output_dir.join("old").exists());
        let remaining: Vec<_> = stdfs::read_dir(&fx.output_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(remaining, vec![std::ffi::OsString::from("960x540")]);
    }

    #[test]
    fn output_containing_project_is_refused() {
        let fx = fixture();
        let project = WidgetProject::open_with_self_path(&fx.root, None, None).unwrap();
        let output = OutputManager::new(false);

        for output_dir in [fx.root.clone(), fx.root.parent().unwrap().to_path_buf()] {
            let config = Config {
                output_dir: output_dir.clone(),
                project: fx.root.clone(),
                ..Config::default()
            };
            let err = Packager::new(
                &config,
                &project,
                "com.example.clock-1.0.widget".into(),
                Box::new(BuiltinZip),
                &output,
            )
            .with_scratch_root(&fx.scratch_root)
            .run()
            .unwrap_err();

            match err {
                PackagerError::OutputContainsProject { output, project } => {
                    assert_eq!(output, output_dir);
                    assert_eq!(project, fx.root);
                }
                other => panic!("unexpected error: {other}"),
            }
            assert!(fx.root.join("Contents/widget.xml").is_file());
        }
    }

    #[test]
    fn output_inside_project_is_not_packaged() {
        let fx = fixture();
        let config = Config {
            output_dir: fx.root.join("packager_output"),
            project: fx.root.clone(),
            ..Config::default()
        };
        let project = WidgetProject::open_with_self_path(&fx.root, None, None).unwrap();
        let output = OutputManager::new(false);
        let artifacts = Packager::new(
            &config,
            &project,
            "out.widget".into(),
            Box::new(BuiltinZip),
            &output,
        )
        .with_scratch_root(&fx.scratch_root)
        .run()
        .unwrap();

        let last = artifacts.last().unwrap();
        assert_eq!(last.resolution, Resolution::FullHd);
        assert!(
            !entry_names(&last.path)
                .iter()
                .any(|n| n.contains("packager_output"))
        );
    }

    #[test]
    fn scratch_directories_are_removed() {
        let fx = fixture();
        run(&fx, None).unwrap();
        assert_eq!(stdfs::read_dir(&fx.scratch_root).unwrap().count(), 0);
    }

    struct FailingArchiver;

    impl Archiver for FailingArchiver {
        fn name(&self) -> &str {
            "failing"
        }

        fn archive(&self, _scratch: &Path, _root: &str, _archive: &Path) -> Result<()> {
            Err(PackagerError::Archive {
                command: "failing".into(),
                reason: "simulated".into(),
            })
        }
    }

    struct SilentArchiver;

    impl Archiver for SilentArchiver {
        fn name(&self) -> &str {
            "silent"
        }

        fn archive(&self, _scratch: &Path, _root: &str, _archive: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn run_with(fx: &Fixture, archiver: Box<dyn Archiver>) -> Result<Vec<PackagedArtifact>> {
        let config = Config {
            output_dir: fx.output_dir.clone(),
            project: fx.root.clone(),
            ..Config::default()
        };
        let project = WidgetProject::open_with_self_path(&fx.root, None, None)?;
        let output = OutputManager::new(false);
        Packager::new(&config, &project, "out.widget".into(), archiver, &output)
            .with_scratch_root(&fx.scratch_root)
            .run()
    }

    #[test]
    fn archiver_failure_aborts_and_cleans_scratch() {
        let fx = fixture();
        let err = run_with(&fx, Box::new(FailingArchiver)).unwrap_err();

        assert!(matches!(err, PackagerError::Archive { .. }));
        assert_eq!(stdfs::read_dir(&fx.scratch_root).unwrap().count(), 0);
        assert!(!fx.output_dir.join("1920x1080").exists());
    }

    #[test]
    fn missing_archive_is_reported() {
        let fx = fixture();
        let err = run_with(&fx, Box::new(SilentArchiver)).unwrap_err();

        assert!(matches!(err, PackagerError::ArchiveMissing { .. }));
        assert_eq!(stdfs::read_dir(&fx.scratch_root).unwrap().count(), 0);
    }

    #[test]
    fn archived_content_matches_source() {
        let fx = fixture();
        let artifacts = run(&fx, Some(Resolution::Qhd)).unwrap();

        let file = stdfs::File::open(&artifacts[0].path).unwrap();
        let mut zip = zip::ZipArchive::new(file).unwrap();
        let mut content = String::new();
        zip.by_name("Clock.widget/Contents/960x540.js")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "Contents/960x540.js");
    }
}
