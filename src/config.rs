//! Configuration management for the package builder
//!
//! Centralizes the package metadata, tool names and input paths and
//! provides validation. Everything here is immutable once built and is
//! passed by reference into the packaging operations.

use crate::{cli::Args, error::PackageError, utils::env::EnvUtils};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the archiving tool
pub const TAR_ENV_VAR: &str = "NEOLOGD_PACKAGER_TAR";
/// Environment variable overriding the packaging tool
pub const FPM_ENV_VAR: &str = "NEOLOGD_PACKAGER_FPM";

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Repository root holding the documentation files
    pub docs_dir: PathBuf,
    /// Parent directory for temporary workspaces (system default if unset)
    pub work_dir: Option<PathBuf>,
    /// Package metadata
    pub metadata: PackageMetadata,
    /// External tools
    pub tools: ToolConfig,
}

/// Metadata describing the packaged dictionary
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageMetadata {
    /// Package name
    pub name: String,
    /// One-line description
    pub summary: String,
    /// License identifier
    pub license: String,
    /// Upstream vendor
    pub vendor: String,
    /// Package maintainer
    pub maintainer: String,
    /// Project homepage
    pub url: String,
    /// Minimum MeCab version the dictionary depends on
    pub mecab_version: String,
    /// Name of the changelog file in the repository root
    pub changelog_file: String,
    /// Descriptive tags
    pub tags: Vec<String>,
    /// File whose presence marks a built dictionary directory
    pub marker_file: String,
}

/// Names (or paths) of the external tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// tar-compatible archiver
    pub tar: String,
    /// fpm-compatible packager
    pub fpm: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            docs_dir: PathBuf::from("."),
            work_dir: None,
            metadata: PackageMetadata::default(),
            tools: ToolConfig::default(),
        }
    }
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            name: "mecab-ipadic-neologd".to_string(),
            summary: "Neologism dictionary based on the language resources on the Web for mecab-ipadic"
                .to_string(),
            license: "Apache-2.0".to_string(),
            vendor: "Toshinori Sato (@overlast) <overlasting@gmail.com>".to_string(),
            maintainer: "Linas Valiukas <linas@mediacloud.org>".to_string(),
            url: "https://github.com/mediacloud/mecab-ipadic-neologd-prebuilt".to_string(),
            mecab_version: "0.996".to_string(),
            changelog_file: "ChangeLog".to_string(),
            tags: [
                "mecab-ipadic",
                "named-entities",
                "dictionary",
                "furigana",
                "neologism-dictionary",
                "mecab",
                "language-resources",
                "japanese-language",
            ]
            .iter()
            .map(|tag| (*tag).to_string())
            .collect(),
            marker_file: "sys.dic".to_string(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            tar: "tar".to_string(),
            fpm: "fpm".to_string(),
        }
    }
}

impl ToolConfig {
    /// Tool names with environment overrides applied
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tar: EnvUtils::get_var_or_default(TAR_ENV_VAR, &defaults.tar),
            fpm: EnvUtils::get_var_or_default(FPM_ENV_VAR, &defaults.fpm),
        }
    }
}

impl PackageMetadata {
    /// Load metadata overrides from a TOML file; missing keys keep defaults
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, PackageError> {
        let path = path.as_ref();
        debug!("Loading package metadata from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .map_err(|e| PackageError::file_system("read", path, e))?;
        toml::from_str(&content).map_err(|e| {
            PackageError::config_with_source(
                format!("Invalid package metadata in {}", path.display()),
                e,
            )
        })
    }

    /// Parse metadata overrides from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, PackageError> {
        toml::from_str(content)
            .map_err(|e| PackageError::config_with_source("Invalid package metadata", e))
    }

    /// Documentation files shipped with every package, relative to `docs_dir`
    pub fn misc_doc_names(&self) -> [&str; 4] {
        ["README.md", "README.ja.md", self.changelog_file.as_str(), "COPYING"]
    }

    /// Validate metadata values
    pub fn validate(&self) -> Result<(), PackageError> {
        let required = [
            ("name", &self.name),
            ("summary", &self.summary),
            ("license", &self.license),
            ("mecab_version", &self.mecab_version),
            ("changelog_file", &self.changelog_file),
            ("marker_file", &self.marker_file),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(PackageError::config(format!(
                    "Package metadata field \"{field}\" must not be empty"
                )));
            }
        }

        if self
            .name
            .chars()
            .any(|c| c.is_whitespace() || c == '/' || c == '_')
        {
            return Err(PackageError::config(format!(
                "Package name \"{}\" may not contain whitespace, '/' or '_'",
                self.name
            )));
        }

        for (field, value) in [
            ("changelog_file", &self.changelog_file),
            ("marker_file", &self.marker_file),
        ] {
            if value.contains('/') {
                return Err(PackageError::config(format!(
                    "Package metadata field \"{field}\" must be a plain file name, got \"{value}\""
                )));
            }
        }

        Ok(())
    }
}

impl Config {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self, PackageError> {
        let metadata = match &args.metadata {
            Some(path) => PackageMetadata::from_toml_file(path)?,
            None => PackageMetadata::default(),
        };

        let config = Self {
            debug: args.debug,
            docs_dir: args.docs_dir.clone(),
            work_dir: args.work_dir.clone(),
            metadata,
            tools: ToolConfig::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), PackageError> {
        if let Some(work_dir) = &self.work_dir {
            if !work_dir.is_dir() {
                return Err(PackageError::config(format!(
                    "Working directory not found: {}",
                    work_dir.display()
                )));
            }
        }

        self.metadata.validate()
    }

    /// Full paths of the documentation files shipped with every package
    pub fn misc_docs(&self) -> Vec<PathBuf> {
        self.metadata
            .misc_doc_names()
            .iter()
            .map(|name| self.docs_dir.join(name))
            .collect()
    }

    /// Path of the marker file inside a dictionary build directory
    pub fn marker_path(&self, input_dir: &Path) -> PathBuf {
        input_dir.join(&self.metadata.marker_file)
    }
}
