//! Staging layouts
//!
//! Each package format expects its payload laid out differently: the
//! tarball is a single flat directory, while the system packages mirror
//! the target filesystem. A [`StagingLayout`] describes that tree inside a
//! temporary workspace and knows how to fill and remove it.

use crate::{
    config::PackageMetadata,
    core::{
        package::{PackageType, tarball_dirname},
        version::VersionTag,
    },
    error::{PackageError, Result},
    utils::fs::{FileSystemUtils, LinkMethod},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Dictionary install location on Debian-based systems
pub const DEB_DICTIONARY_DIR: &str = "var/lib/mecab/dic/ipadic-neologd";
/// Dictionary install location on RPM-based systems
pub const RPM_DICTIONARY_DIR: &str = "usr/lib64/mecab/dic/ipadic-neologd";

const DOC_ROOT: &str = "usr/share/doc";
const ALTERNATIVES_LINK: &str = "/var/lib/mecab/dic/debian";
const ALTERNATIVES_NAME: &str = "mecab-dictionary";
const ALTERNATIVES_PRIORITY: u32 = 100;

/// Directory tree handed to the packaging tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLayout {
    root: PathBuf,
    dictionary_dir: PathBuf,
    doc_dir: PathBuf,
}

impl StagingLayout {
    /// Layout for `package_type` inside `workspace`
    pub fn new(
        package_type: PackageType,
        workspace: &Path,
        metadata: &PackageMetadata,
        version: &VersionTag,
    ) -> Self {
        match package_type {
            PackageType::Tarball => {
                let root = workspace.join(tarball_dirname(metadata, version));
                Self {
                    dictionary_dir: root.clone(),
                    doc_dir: root.clone(),
                    root,
                }
            }
            PackageType::DebianPackage => {
                let root = workspace.join("deb");
                Self {
                    dictionary_dir: root.join(DEB_DICTIONARY_DIR),
                    doc_dir: root.join(DOC_ROOT).join(&metadata.name),
                    root,
                }
            }
            PackageType::RpmPackage => {
                let root = workspace.join("rpm");
                Self {
                    dictionary_dir: root.join(RPM_DICTIONARY_DIR),
                    doc_dir: root
                        .join(DOC_ROOT)
                        .join(format!("{}-{}", metadata.name, version.version)),
                    root,
                }
            }
        }
    }

    /// Top of the staged tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where dictionary files are staged
    pub fn dictionary_dir(&self) -> &Path {
        &self.dictionary_dir
    }

    /// Where documentation files are staged
    pub fn doc_dir(&self) -> &Path {
        &self.doc_dir
    }

    /// Create the tree and link the dictionary files and docs into it
    #[instrument(skip(self, fs_utils, docs))]
    pub fn stage(&self, fs_utils: &FileSystemUtils, input_dir: &Path, docs: &[PathBuf]) -> Result<()> {
        for dir in [&self.dictionary_dir, &self.doc_dir] {
            fs_utils
                .create_dir_all(dir)
                .map_err(|e| PackageError::file_system("create directory", dir, e))?;
        }
        debug!("Staging directory: {}", self.root.display());

        info!("Linking MeCab files to {}...", self.dictionary_dir.display());
        let linked = fs_utils
            .link_regular_files(input_dir, &self.dictionary_dir)
            .map_err(|e| PackageError::file_system("link dictionary files", input_dir, e))?;
        debug!("Linked {} dictionary files", linked);

        info!("Linking documentation files to {}...", self.doc_dir.display());
        for doc in docs {
            let file_name = doc
                .file_name()
                .ok_or_else(|| PackageError::missing_input("Invalid documentation file name", doc))?;
            let method = fs_utils
                .link_file(doc, self.doc_dir.join(file_name))
                .map_err(|e| PackageError::file_system("link documentation file", doc, e))?;
            if method == LinkMethod::Copied {
                debug!("Copied {} instead of linking", doc.display());
            }
        }

        Ok(())
    }

    /// Remove the staged tree, leaving the rest of the workspace alone
    pub fn remove(&self, fs_utils: &FileSystemUtils) -> Result<()> {
        info!("Cleaning up staging directory...");
        fs_utils
            .remove_dir_all_if_exists(&self.root)
            .map_err(|e| PackageError::file_system("remove directory", &self.root, e))?;
        Ok(())
    }
}

/// Debian maintainer scripts registering the dictionary with the
/// alternatives system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintainerScripts {
    /// Script run after installation
    pub after_install: PathBuf,
    /// Script run after removal
    pub after_remove: PathBuf,
}

impl MaintainerScripts {
    /// Register the dictionary as a `mecab-dictionary` alternative
    pub fn after_install_script() -> String {
        format!(
            "#!/bin/sh\nupdate-alternatives --install {ALTERNATIVES_LINK} {ALTERNATIVES_NAME} /{DEB_DICTIONARY_DIR} {ALTERNATIVES_PRIORITY}\n"
        )
    }

    /// Deregister the dictionary alternative
    pub fn after_remove_script() -> String {
        format!("#!/bin/sh\nupdate-alternatives --remove {ALTERNATIVES_NAME} /{DEB_DICTIONARY_DIR}\n")
    }

    /// Write both scripts into `workspace` (outside the staged tree)
    pub fn write(fs_utils: &FileSystemUtils, workspace: &Path) -> Result<Self> {
        let scripts = Self {
            after_install: workspace.join("after-install"),
            after_remove: workspace.join("after-remove"),
        };

        for (path, content) in [
            (&scripts.after_install, Self::after_install_script()),
            (&scripts.after_remove, Self::after_remove_script()),
        ] {
            fs_utils
                .write_script(path, &content)
                .map_err(|e| PackageError::file_system("write", path, e))?;
        }

        Ok(scripts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn version() -> VersionTag {
        VersionTag::parse("20170814-1").unwrap()
    }

    fn layout(package_type: PackageType) -> StagingLayout {
        StagingLayout::new(
            package_type,
            Path::new("/work"),
            &PackageMetadata::default(),
            &version(),
        )
    }

    #[test]
    fn test_tarball_layout_is_flat() {
        let layout = layout(PackageType::Tarball);
        let root = Path::new("/work/mecab-ipadic-neologd-20170814-1");
        assert_eq!(layout.root(), root);
        assert_eq!(layout.dictionary_dir(), root);
        assert_eq!(layout.doc_dir(), root);
    }

    #[test]
    fn test_deb_layout() {
        let layout = layout(PackageType::DebianPackage);
        assert_eq!(layout.root(), Path::new("/work/deb"));
        assert_eq!(
            layout.dictionary_dir(),
            Path::new("/work/deb/var/lib/mecab/dic/ipadic-neologd")
        );
        assert_eq!(
            layout.doc_dir(),
            Path::new("/work/deb/usr/share/doc/mecab-ipadic-neologd")
        );
    }

    #[test]
    fn test_rpm_layout() {
        let layout = layout(PackageType::RpmPackage);
        assert_eq!(layout.root(), Path::new("/work/rpm"));
        assert_eq!(
            layout.dictionary_dir(),
            Path::new("/work/rpm/usr/lib64/mecab/dic/ipadic-neologd")
        );
        assert_eq!(
            layout.doc_dir(),
            Path::new("/work/rpm/usr/share/doc/mecab-ipadic-neologd-20170814")
        );
    }

    #[test]
    fn test_stage_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("build");
        let docs_dir = temp_dir.path().join("docs");
        let workspace = temp_dir.path().join("workspace");
        fs::create_dir_all(input_dir.join("subdir")).unwrap();
        fs::create_dir_all(&docs_dir).unwrap();
        fs::create_dir_all(&workspace).unwrap();
        fs::write(input_dir.join("sys.dic"), "sys").unwrap();
        fs::write(input_dir.join("dicrc"), "rc").unwrap();
        fs::write(docs_dir.join("README.md"), "readme").unwrap();

        let fs_utils = FileSystemUtils::new();
        let layout = StagingLayout::new(
            PackageType::DebianPackage,
            &workspace,
            &PackageMetadata::default(),
            &version(),
        );
        layout
            .stage(&fs_utils, &input_dir, &[docs_dir.join("README.md")])
            .unwrap();

        assert!(layout.dictionary_dir().join("sys.dic").is_file());
        assert!(layout.dictionary_dir().join("dicrc").is_file());
        assert!(!layout.dictionary_dir().join("subdir").exists());
        assert_eq!(
            fs::read_to_string(layout.doc_dir().join("README.md")).unwrap(),
            "readme"
        );

        layout.remove(&fs_utils).unwrap();
        assert!(!workspace.join("deb").exists());
        assert!(input_dir.join("sys.dic").is_file());
    }

    #[test]
    fn test_maintainer_scripts() {
        assert_eq!(
            MaintainerScripts::after_install_script(),
            "#!/bin/sh\nupdate-alternatives --install /var/lib/mecab/dic/debian mecab-dictionary /var/lib/mecab/dic/ipadic-neologd 100\n"
        );
        assert_eq!(
            MaintainerScripts::after_remove_script(),
            "#!/bin/sh\nupdate-alternatives --remove mecab-dictionary /var/lib/mecab/dic/ipadic-neologd\n"
        );

        let temp_dir = TempDir::new().unwrap();
        let scripts = MaintainerScripts::write(&FileSystemUtils::new(), temp_dir.path()).unwrap();
        assert_eq!(scripts.after_install, temp_dir.path().join("after-install"));
        assert!(
            fs::read_to_string(&scripts.after_remove)
                .unwrap()
                .contains("--remove mecab-dictionary")
        );
    }
}
