//! Command-line argument parsing and validation

use crate::core::{package::PackageType, version::VersionTag};
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// Package a built mecab-ipadic-neologd dictionary as .tgz, .deb or .rpm
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "create-package")]
pub struct Args {
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Package type (tgz, deb or rpm)
    #[arg(long = "type", value_name = "TYPE", value_parser = PackageType::from_str)]
    pub package_type: PackageType,

    /// Input directory with built MeCab dictionary
    #[arg(long = "input_dir", value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Git version tag (version + revision), e.g. "20170814-1"
    #[arg(long = "version_tag", value_name = "TAG", value_parser = VersionTag::parse)]
    pub version_tag: VersionTag,

    /// Output package file (or existing directory to place it in)
    #[arg(long = "output_file", value_name = "PATH")]
    pub output_file: PathBuf,

    /// Repository root containing README.md, README.ja.md, ChangeLog and COPYING
    #[arg(long = "docs_dir", value_name = "DIR", default_value = ".")]
    pub docs_dir: PathBuf,

    /// Directory in which temporary workspaces are created
    #[arg(long = "work_dir", value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// TOML file overriding package metadata
    #[arg(long, value_name = "FILE")]
    pub metadata: Option<PathBuf>,

    /// Write package information in .env format after a successful build
    #[arg(long = "info_file", value_name = "FILE")]
    pub info_file: Option<PathBuf>,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 9] = [
        "create-package",
        "--type",
        "deb",
        "--input_dir",
        "build",
        "--version_tag",
        "20170814-1",
        "--output_file",
        "out.deb",
    ];

    #[test]
    fn test_parse_required_args() {
        let args = Args::try_parse_from(REQUIRED).unwrap();
        assert!(!args.debug);
        assert_eq!(args.package_type, PackageType::DebianPackage);
        assert_eq!(args.input_dir, PathBuf::from("build"));
        assert_eq!(args.version_tag.version, "20170814");
        assert_eq!(args.version_tag.revision, "1");
        assert_eq!(args.output_file, PathBuf::from("out.deb"));
        assert_eq!(args.docs_dir, PathBuf::from("."));
        assert!(args.work_dir.is_none());
        assert!(args.info_file.is_none());
    }

    #[test]
    fn test_parse_optional_args() {
        let mut argv = REQUIRED.to_vec();
        argv.extend([
            "--debug",
            "--docs_dir",
            "/repo",
            "--work_dir",
            "/scratch",
            "--metadata",
            "meta.toml",
            "--info_file",
            "package.env",
        ]);
        let args = Args::try_parse_from(argv).unwrap();
        assert!(args.debug);
        assert_eq!(args.docs_dir, PathBuf::from("/repo"));
        assert_eq!(args.work_dir, Some(PathBuf::from("/scratch")));
        assert_eq!(args.metadata, Some(PathBuf::from("meta.toml")));
        assert_eq!(args.info_file, Some(PathBuf::from("package.env")));
    }

    #[test]
    fn test_missing_required_arg() {
        let result = Args::try_parse_from(&REQUIRED[..7]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_package_type_rejected() {
        let mut argv = REQUIRED.to_vec();
        argv[2] = "zip";
        let err = Args::try_parse_from(argv).unwrap_err();
        assert!(err.to_string().contains("Unknown package type \"zip\""));
    }

    #[test]
    fn test_malformed_version_tag_rejected() {
        let mut argv = REQUIRED.to_vec();
        argv[6] = "20170814-1-2";
        let err = Args::try_parse_from(argv).unwrap_err();
        assert!(err.to_string().contains("Invalid version tag"));
    }
}
