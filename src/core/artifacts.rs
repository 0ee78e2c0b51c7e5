//! Artifact relocation
//!
//! Moves a built package out of its temporary workspace to the location
//! the caller asked for, then releases the workspace.

use crate::{
    core::{builder::BuiltPackage, package::PackageType},
    error::{PackageError, Result},
    utils::fs::FileSystemUtils,
};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Moves built packages to their final destination
#[derive(Debug, Default)]
pub struct ArtifactCollector {
    fs_utils: FileSystemUtils,
}

/// Information about a relocated artifact
#[derive(Debug)]
pub struct CollectedArtifact {
    /// Original path inside the temporary workspace
    pub source: PathBuf,
    /// Final path
    pub destination: PathBuf,
    /// Package format
    pub package_type: PackageType,
    /// Size in bytes
    pub size: u64,
}

impl ArtifactCollector {
    /// Create a new artifact collector
    pub fn new() -> Self {
        Self {
            fs_utils: FileSystemUtils::new(),
        }
    }

    /// Move `package` to `output_file`. An existing directory as
    /// `output_file` receives the artifact under its built name.
    #[instrument(skip(self, package))]
    pub fn collect(&self, package: BuiltPackage, output_file: &Path) -> Result<CollectedArtifact> {
        let source = package.path().to_path_buf();
        let destination = self.resolve_destination(&source, output_file)?;

        info!(
            "Moving package \"{}\" to \"{}\".",
            source.display(),
            destination.display()
        );

        self.fs_utils
            .move_file(&source, &destination)
            .map_err(|e| PackageError::file_system("move package", &destination, e))?;

        let size = self
            .fs_utils
            .file_size(&destination)
            .map_err(|e| PackageError::file_system("stat", &destination, e))?;

        let package_type = package.package_type();
        // Workspace goes away here
        drop(package);

        Ok(CollectedArtifact {
            source,
            destination,
            package_type,
            size,
        })
    }

    fn resolve_destination(&self, source: &Path, output_file: &Path) -> Result<PathBuf> {
        if !self.fs_utils.is_dir(output_file) {
            return Ok(output_file.to_path_buf());
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| PackageError::missing_artifact(source))?;
        Ok(output_file.join(file_name))
    }
}
