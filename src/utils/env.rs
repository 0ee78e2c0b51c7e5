//! Environment and package info handling utilities
//!
//! Writes a `.env` style description of a finished package for CI jobs
//! that publish it, and reads environment overrides.

use crate::{
    config::PackageMetadata,
    core::package::PackageRequest,
    error::{PackageError, Result},
    utils::fs::FileSystemUtils,
};
use chrono::Utc;
use std::{collections::HashMap, env, path::Path};
use tracing::{debug, info, instrument};

/// Writer for package info files
#[derive(Debug)]
pub struct PackageInfoWriter {
    fs_utils: FileSystemUtils,
}

/// Description of a produced package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    /// Package name
    pub package_name: String,
    /// Package format (tgz, deb, rpm)
    pub package_type: String,
    /// Dictionary version
    pub version: String,
    /// Packaging revision
    pub revision: String,
    /// Full version string (version-revision)
    pub full_version: String,
    /// Final location of the artifact
    pub artifact: String,
    /// Build timestamp in RFC3339 format
    pub build_date: String,
    /// Space separated package tags
    pub tags: String,
}

impl PackageInfo {
    /// Describe the package produced for `request`, now located at `artifact`
    pub fn new(metadata: &PackageMetadata, request: &PackageRequest, artifact: &Path) -> Self {
        Self {
            package_name: metadata.name.clone(),
            package_type: request.package_type.to_string(),
            version: request.version.version.clone(),
            revision: request.version.revision.clone(),
            full_version: request.version.full_version(),
            artifact: artifact.display().to_string(),
            build_date: Utc::now().to_rfc3339(),
            tags: metadata.tags.join(" "),
        }
    }
}

impl PackageInfoWriter {
    /// Create a new package info writer
    pub fn new() -> Self {
        Self {
            fs_utils: FileSystemUtils::new(),
        }
    }

    /// Write package information to `output_file`
    #[instrument(skip(self, info, output_file))]
    pub fn generate<P: AsRef<Path>>(&self, info: &PackageInfo, output_file: P) -> Result<()> {
        let output_file = output_file.as_ref();
        info!("Writing package information to: {}", output_file.display());

        let env_content = Self::format_as_env_file(info);

        self.fs_utils
            .write_file(output_file, env_content.as_bytes())
            .map_err(|e| PackageError::file_system("write", output_file, e))?;

        debug!("Generated package info: {:?}", info);
        Ok(())
    }

    /// Format package information as environment file (.env format)
    fn format_as_env_file(info: &PackageInfo) -> String {
        format!(
            r#"PACKAGE_NAME={}
PACKAGE_TYPE={}
VERSION={}
REVISION={}
FULL_VERSION={}
ARTIFACT="{}"
BUILD_DATE={}
TAGS="{}"
"#,
            info.package_name,
            info.package_type,
            info.version,
            info.revision,
            info.full_version,
            info.artifact,
            info.build_date,
            info.tags
        )
    }

    /// Load package information from an existing file
    #[instrument(skip(self, file_path))]
    pub fn load_from_file<P: AsRef<Path>>(&self, file_path: P) -> Result<PackageInfo> {
        let file_path = file_path.as_ref();
        debug!("Loading package information from: {}", file_path.display());

        let content = self
            .fs_utils
            .read_to_string(file_path)
            .map_err(|e| PackageError::file_system("read", file_path, e))?;

        Ok(Self::parse_env_content(&content))
    }

    /// Parse environment file content into PackageInfo
    fn parse_env_content(content: &str) -> PackageInfo {
        let mut env_vars = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                env_vars.insert(key.trim(), value.trim().trim_matches('"'));
            }
        }

        let get = |key: &str| env_vars.get(key).map(|v| (*v).to_string()).unwrap_or_default();

        PackageInfo {
            package_name: get("PACKAGE_NAME"),
            package_type: get("PACKAGE_TYPE"),
            version: get("VERSION"),
            revision: get("REVISION"),
            full_version: get("FULL_VERSION"),
            artifact: get("ARTIFACT"),
            build_date: get("BUILD_DATE"),
            tags: get("TAGS"),
        }
    }
}

impl Default for PackageInfoWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable utilities
#[derive(Debug)]
pub struct EnvUtils;

impl EnvUtils {
    /// Get an environment variable with a default value
    pub fn get_var_or_default(key: &str, default: &str) -> String {
        env::var(key)
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{package::PackageType, version::VersionTag};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_request() -> PackageRequest {
        PackageRequest {
            package_type: PackageType::DebianPackage,
            input_dir: PathBuf::from("build"),
            version: VersionTag::parse("20170814-1").unwrap(),
            output_file: PathBuf::from("out.deb"),
        }
    }

    #[test]
    fn test_package_info_from_request() {
        let metadata = PackageMetadata::default();
        let info = PackageInfo::new(
            &metadata,
            &create_test_request(),
            Path::new("/srv/out.deb"),
        );

        assert_eq!(info.package_name, "mecab-ipadic-neologd");
        assert_eq!(info.package_type, "deb");
        assert_eq!(info.version, "20170814");
        assert_eq!(info.revision, "1");
        assert_eq!(info.full_version, "20170814-1");
        assert_eq!(info.artifact, "/srv/out.deb");
        assert!(info.tags.starts_with("mecab-ipadic named-entities"));
    }

    #[test]
    fn test_format_as_env_file() {
        let info = PackageInfo {
            package_name: "mecab-ipadic-neologd".to_string(),
            package_type: "tgz".to_string(),
            version: "20170814".to_string(),
            revision: "2".to_string(),
            full_version: "20170814-2".to_string(),
            artifact: "dist/neologd.tgz".to_string(),
            build_date: "2023-01-01T00:00:00Z".to_string(),
            tags: "mecab dictionary".to_string(),
        };

        let content = PackageInfoWriter::format_as_env_file(&info);

        assert!(content.contains("PACKAGE_TYPE=tgz\n"));
        assert!(content.contains("FULL_VERSION=20170814-2\n"));
        assert!(content.contains("ARTIFACT=\"dist/neologd.tgz\"\n"));
        assert!(content.contains("TAGS=\"mecab dictionary\"\n"));
    }

    #[test]
    fn test_generate_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("package.env");
        let writer = PackageInfoWriter::new();
        let info = PackageInfo::new(
            &PackageMetadata::default(),
            &create_test_request(),
            Path::new("out.deb"),
        );

        writer.generate(&info, &path).unwrap();
        let loaded = writer.load_from_file(&path).unwrap();

        assert_eq!(loaded, info);
    }

    #[test]
    fn test_get_var_or_default() {
        let value = EnvUtils::get_var_or_default("NEOLOGD_PACKAGER_UNSET_VAR_12345", "fpm");
        assert_eq!(value, "fpm");
    }
}
