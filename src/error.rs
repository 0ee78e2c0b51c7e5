//! Error types for the package builder
//!
//! Provides structured error handling with context and proper error chains.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the package builder
#[derive(Error, Debug)]
pub enum PackageError {
    /// A required input file (dictionary marker or documentation) is absent
    #[error("Missing input: {message}")]
    MissingInput { message: String, path: PathBuf },

    /// The requested package format is not one of tgz, deb or rpm
    #[error("Unknown package type \"{name}\"")]
    UnknownPackageType { name: String },

    /// The version tag does not split into exactly a version and a revision
    #[error(
        "Invalid version tag \"{tag}\": expected VERSION-REVISION or VERSION_REVISION, e.g. \"20170814-1\""
    )]
    InvalidVersionTag { tag: String },

    /// An external packaging tool is not available
    #[error("Required tool \"{tool}\" was not found in PATH")]
    MissingTool { tool: String },

    /// Process execution errors
    #[error("Process error: {command} failed{}", exit_code_suffix(.exit_code))]
    Process {
        command: String,
        exit_code: Option<i32>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The packaging tool reported success but produced nothing
    #[error("Created package \"{path}\" does not exist")]
    MissingArtifact { path: PathBuf },

    /// File system operation errors
    #[error("File system error: {operation} failed on {path}")]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn exit_code_suffix(exit_code: &Option<i32>) -> String {
    exit_code.map_or_else(String::new, |code| format!(" with exit code {code}"))
}

impl PackageError {
    /// Create a new missing input error
    pub fn missing_input<P: Into<PathBuf>>(message: impl Into<String>, path: P) -> Self {
        Self::MissingInput {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a new unknown package type error
    pub fn unknown_package_type(name: impl Into<String>) -> Self {
        Self::UnknownPackageType { name: name.into() }
    }

    /// Create a new invalid version tag error
    pub fn invalid_version_tag(tag: impl Into<String>) -> Self {
        Self::InvalidVersionTag { tag: tag.into() }
    }

    /// Create a new missing tool error
    pub fn missing_tool(tool: impl Into<String>) -> Self {
        Self::MissingTool { tool: tool.into() }
    }

    /// Create a new process error for a command that ran and failed
    pub fn process(command: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::Process {
            command: command.into(),
            exit_code,
            source: None,
        }
    }

    /// Create a new process error for a command that could not be started
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Process {
            command: command.into(),
            exit_code: None,
            source: Some(source),
        }
    }

    /// Create a new missing artifact error
    pub fn missing_artifact<P: Into<PathBuf>>(path: P) -> Self {
        Self::MissingArtifact { path: path.into() }
    }

    /// Create a new file system error
    pub fn file_system<P: Into<PathBuf>>(
        operation: impl Into<String>,
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error caused by another error
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PackageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_error_message_includes_exit_code() {
        let err = PackageError::process("fpm --verbose", Some(1));
        assert_eq!(
            err.to_string(),
            "Process error: fpm --verbose failed with exit code 1"
        );
    }

    #[test]
    fn test_process_error_without_exit_code() {
        let err = PackageError::process("tar -czvf out.tgz dir", None);
        assert_eq!(err.to_string(), "Process error: tar -czvf out.tgz dir failed");
    }

    #[test]
    fn test_missing_artifact_message() {
        let err = PackageError::missing_artifact("/tmp/x/pkg.deb");
        assert_eq!(
            err.to_string(),
            "Created package \"/tmp/x/pkg.deb\" does not exist"
        );
    }
}
