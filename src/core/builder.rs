//! Package building functionality
//!
//! Validates the dictionary build, stages it in a temporary workspace and
//! hands it to tar or fpm.

use crate::{
    config::{Config, PackageMetadata},
    core::{
        layout::{MaintainerScripts, StagingLayout},
        package::{PackageRequest, PackageType},
        version::VersionTag,
    },
    error::{PackageError, Result},
    utils::{fs::FileSystemUtils, process::ProcessRunner},
};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, instrument};

/// Package builder that stages a dictionary and runs the packaging tool
pub struct PackageBuilder {
    config: Config,
    process_runner: ProcessRunner,
    fs_utils: FileSystemUtils,
}

/// A freshly built package, still inside its temporary workspace.
///
/// The workspace is deleted when this value is dropped, so the artifact
/// has to be moved out first.
#[derive(Debug)]
pub struct BuiltPackage {
    path: PathBuf,
    package_type: PackageType,
    workspace: TempDir,
}

impl BuiltPackage {
    /// Location of the artifact inside the workspace
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format of the artifact
    pub const fn package_type(&self) -> PackageType {
        self.package_type
    }

    /// Temporary workspace holding the artifact
    pub fn workspace(&self) -> &Path {
        self.workspace.path()
    }
}

impl PackageBuilder {
    /// Create a new package builder with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            process_runner: ProcessRunner::new(config.debug),
            fs_utils: FileSystemUtils::new(),
            config,
        }
    }

    /// Check that `input_dir` holds a built dictionary and that every
    /// documentation file is present. Has no side effects.
    #[instrument(skip(self))]
    pub fn validate_inputs(&self, input_dir: &Path) -> Result<()> {
        let marker = self.config.marker_path(input_dir);
        if !self.fs_utils.is_file(&marker) {
            return Err(PackageError::missing_input(
                format!(
                    "Input directory \"{}\" does not contain built MeCab dictionary ({} not found)",
                    input_dir.display(),
                    self.config.metadata.marker_file
                ),
                marker,
            ));
        }

        for doc in self.config.misc_docs() {
            if !self.fs_utils.is_file(&doc) {
                return Err(PackageError::missing_input(
                    format!(
                        "Misc. documentation file \"{}\" does not exist",
                        doc.display()
                    ),
                    doc,
                ));
            }
        }

        debug!("Inputs validated: {}", input_dir.display());
        Ok(())
    }

    /// Check that the tool producing `package_type` can be found
    pub fn check_tool(&self, package_type: PackageType) -> Result<()> {
        let tool = package_type.tool(&self.config.tools);
        if !self.process_runner.command_exists(tool) {
            return Err(PackageError::missing_tool(tool));
        }
        Ok(())
    }

    /// Build the requested package, leaving it in a temporary workspace
    #[instrument(skip(self, request), fields(package_type = %request.package_type))]
    pub fn build(&self, request: &PackageRequest) -> Result<BuiltPackage> {
        self.validate_inputs(&request.input_dir)?;
        self.check_tool(request.package_type)?;

        let metadata = &self.config.metadata;
        let workspace = self.create_workspace()?;
        debug!("Temporary workspace: {}", workspace.path().display());

        let layout = StagingLayout::new(
            request.package_type,
            workspace.path(),
            metadata,
            &request.version,
        );
        let artifact_name = request.package_type.artifact_name(metadata, &request.version);
        let package_path = workspace.path().join(&artifact_name);

        layout.stage(&self.fs_utils, &request.input_dir, &self.config.misc_docs())?;

        info!("Creating {}...", artifact_name);
        match request.package_type {
            PackageType::Tarball => {
                let dirname = file_name_arg(layout.root())?;
                self.process_runner.run_command_in(
                    &self.config.tools.tar,
                    &["-czvf", artifact_name.as_str(), dirname.as_str()],
                    Some(workspace.path()),
                )?;
            }
            PackageType::DebianPackage => {
                let scripts = MaintainerScripts::write(&self.fs_utils, workspace.path())?;
                let mut args = fpm_common_flags(metadata, &request.version);
                args.extend(deb_flags(metadata, &layout, &package_path, &scripts)?);
                self.run_fpm(&args)?;
            }
            PackageType::RpmPackage => {
                let mut args = fpm_common_flags(metadata, &request.version);
                args.extend(rpm_flags(metadata, &layout, &package_path)?);
                self.run_fpm(&args)?;
            }
        }

        layout.remove(&self.fs_utils)?;

        if !self.fs_utils.is_file(&package_path) {
            return Err(PackageError::missing_artifact(package_path));
        }

        info!(
            "Resulting .{}: {}",
            request.package_type,
            package_path.display()
        );

        Ok(BuiltPackage {
            path: package_path,
            package_type: request.package_type,
            workspace,
        })
    }

    fn run_fpm(&self, args: &[String]) -> Result<()> {
        debug!("fpm arguments: {:?}", args);
        let args_str: Vec<&str> = args.iter().map(String::as_str).collect();
        self.process_runner
            .run_command(&self.config.tools.fpm, &args_str)
    }

    /// Create an isolated temporary workspace
    fn create_workspace(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("neologd-package-");

        match &self.config.work_dir {
            Some(dir) => builder
                .tempdir_in(dir)
                .map_err(|e| PackageError::file_system("create temporary directory", dir, e)),
            None => builder.tempdir().map_err(|e| {
                PackageError::file_system("create temporary directory", std::env::temp_dir(), e)
            }),
        }
    }
}

/// Flags shared by the deb and rpm fpm invocations
fn fpm_common_flags(metadata: &PackageMetadata, version: &VersionTag) -> Vec<String> {
    [
        "--verbose",
        "--input-type",
        "dir",
        "--name",
        metadata.name.as_str(),
        "--version",
        version.version.as_str(),
        "--iteration",
        version.revision.as_str(),
        "--description",
        metadata.summary.as_str(),
        "--license",
        metadata.license.as_str(),
        "--vendor",
        metadata.vendor.as_str(),
        "--maintainer",
        metadata.maintainer.as_str(),
        "--url",
        metadata.url.as_str(),
        "--architecture",
        "all",
        "--prefix",
        "/",
    ]
    .iter()
    .map(|arg| (*arg).to_string())
    .collect()
}

fn deb_flags(
    metadata: &PackageMetadata,
    layout: &StagingLayout,
    package_path: &Path,
    scripts: &MaintainerScripts,
) -> Result<Vec<String>> {
    Ok(vec![
        "--output-type".to_string(),
        "deb".to_string(),
        "--package".to_string(),
        path_arg(package_path)?,
        "--chdir".to_string(),
        path_arg(layout.root())?,
        "--depends".to_string(),
        format!("mecab (>= {})", metadata.mecab_version),
        "--category".to_string(),
        "misc".to_string(),
        "--deb-priority".to_string(),
        "extra".to_string(),
        "--deb-no-default-config-files".to_string(),
        "--after-install".to_string(),
        path_arg(&scripts.after_install)?,
        "--after-remove".to_string(),
        path_arg(&scripts.after_remove)?,
    ])
}

fn rpm_flags(
    metadata: &PackageMetadata,
    layout: &StagingLayout,
    package_path: &Path,
) -> Result<Vec<String>> {
    Ok(vec![
        "--output-type".to_string(),
        "rpm".to_string(),
        "--package".to_string(),
        path_arg(package_path)?,
        "--chdir".to_string(),
        path_arg(layout.root())?,
        "--depends".to_string(),
        format!("mecab >= {}", metadata.mecab_version),
        "--category".to_string(),
        "Applications/Text".to_string(),
        "--rpm-os".to_string(),
        "linux".to_string(),
    ])
}

/// Command-line form of a path; tools are only given UTF-8 paths
fn path_arg(path: &Path) -> Result<String> {
    path.to_str()
        .map(str::to_string)
        .ok_or_else(|| non_utf8_path(path))
}

fn file_name_arg(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| non_utf8_path(path))
}

fn non_utf8_path(path: &Path) -> PackageError {
    PackageError::file_system(
        "pass path to packaging tool",
        path,
        io::Error::new(io::ErrorKind::InvalidData, "path is not valid UTF-8"),
    )
}
