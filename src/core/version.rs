//! Version tag parsing
//!
//! Release tags combine the dictionary build version with a packaging
//! revision, e.g. `20170814-1` or `20170814_1`.

use crate::error::{PackageError, Result};
use regex::Regex;
use std::fmt;
use tracing::debug;

/// Dictionary version and packaging revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    /// Dictionary build version
    pub version: String,
    /// Packaging revision
    pub revision: String,
}

impl VersionTag {
    /// Split a tag on `-` or `_` into exactly a version and a revision
    pub fn parse(tag: &str) -> Result<Self> {
        let separator = Regex::new(r"[-_]")
            .map_err(|e| PackageError::config_with_source("Failed to compile regex", e))?;
        let parts: Vec<&str> = separator.split(tag).collect();

        match parts.as_slice() {
            [version, revision] if !version.is_empty() && !revision.is_empty() => {
                debug!("Version: {}, revision: {}", version, revision);
                Ok(Self {
                    version: (*version).to_string(),
                    revision: (*revision).to_string(),
                })
            }
            _ => Err(PackageError::invalid_version_tag(tag)),
        }
    }

    /// Get the full version string (version-revision)
    pub fn full_version(&self) -> String {
        format!("{}-{}", self.version, self.revision)
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.version, self.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dash_separated() {
        let tag = VersionTag::parse("20170814-1").unwrap();
        assert_eq!(tag.version, "20170814");
        assert_eq!(tag.revision, "1");
    }

    #[test]
    fn test_parse_underscore_separated() {
        let tag = VersionTag::parse("20170814_1").unwrap();
        assert_eq!(tag.version, "20170814");
        assert_eq!(tag.revision, "1");
        assert_eq!(tag.full_version(), "20170814-1");
    }

    #[test]
    fn test_parse_without_separator() {
        assert!(matches!(
            VersionTag::parse("20170814"),
            Err(PackageError::InvalidVersionTag { tag }) if tag == "20170814"
        ));
    }

    #[test]
    fn test_parse_with_too_many_separators() {
        assert!(VersionTag::parse("20170814-1-2").is_err());
        assert!(VersionTag::parse("2017_08-14").is_err());
    }

    #[test]
    fn test_parse_with_empty_component() {
        assert!(VersionTag::parse("20170814-").is_err());
        assert!(VersionTag::parse("_1").is_err());
        assert!(VersionTag::parse("").is_err());
    }
}
