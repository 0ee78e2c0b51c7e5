//! Package formats and packaging requests

use crate::{
    config::{PackageMetadata, ToolConfig},
    core::version::VersionTag,
    error::{PackageError, Result},
};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageType {
    /// Gzipped tarball (`.tgz`)
    Tarball,
    /// Debian package (`.deb`)
    DebianPackage,
    /// RPM package (`.rpm`)
    RpmPackage,
}

impl PackageType {
    /// All supported formats
    pub const ALL: [Self; 3] = [Self::Tarball, Self::DebianPackage, Self::RpmPackage];

    /// Short name used on the command line
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tarball => "tgz",
            Self::DebianPackage => "deb",
            Self::RpmPackage => "rpm",
        }
    }

    /// External tool that produces this format
    pub fn tool(self, tools: &ToolConfig) -> &str {
        match self {
            Self::Tarball => &tools.tar,
            Self::DebianPackage | Self::RpmPackage => &tools.fpm,
        }
    }

    /// File name of the produced artifact before it is relocated
    pub fn artifact_name(self, metadata: &PackageMetadata, version: &VersionTag) -> String {
        match self {
            Self::Tarball => format!("{}.tgz", tarball_dirname(metadata, version)),
            Self::DebianPackage | Self::RpmPackage => format!(
                "{}_{}-{}_all.{}",
                metadata.name,
                version.version,
                version.revision,
                self.as_str()
            ),
        }
    }
}

/// Name of the single top-level directory inside the tarball
pub fn tarball_dirname(metadata: &PackageMetadata, version: &VersionTag) -> String {
    format!("{}-{}-{}", metadata.name, version.version, version.revision)
}

impl FromStr for PackageType {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|package_type| package_type.as_str() == s)
            .ok_or_else(|| PackageError::unknown_package_type(s))
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to produce one package
#[derive(Debug, Clone)]
pub struct PackageRequest {
    /// Output format
    pub package_type: PackageType,
    /// Directory holding the built dictionary
    pub input_dir: PathBuf,
    /// Version and revision of the package
    pub version: VersionTag,
    /// Where the finished artifact should end up
    pub output_file: PathBuf,
}
