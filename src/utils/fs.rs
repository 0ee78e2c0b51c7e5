//! File system helpers used while staging and relocating packages
//!
//! Everything returns `io::Result`; callers attach the operation and path
//! when converting into `PackageError`.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Stateless wrapper around the file operations the packager needs
#[derive(Debug, Default)]
pub struct FileSystemUtils;

/// How a file ended up at its staging destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMethod {
    /// Hard link to the source (no data copied)
    HardLinked,
    /// Full copy, used when a hard link is not possible
    Copied,
}

impl FileSystemUtils {
    pub fn new() -> Self {
        Self
    }

    /// Copy `src` to `dst` keeping its permission bits. Returns bytes written.
    #[instrument(skip(self))]
    pub fn copy_file<P: AsRef<Path> + std::fmt::Debug, Q: AsRef<Path> + std::fmt::Debug>(
        &self,
        src: P,
        dst: Q,
    ) -> io::Result<u64> {
        let (from, to) = (src.as_ref(), dst.as_ref());

        if let Some(dir) = to.parent() {
            fs::create_dir_all(dir)?;
        }

        let written = fs::copy(from, to)?;
        fs::set_permissions(to, fs::metadata(from)?.permissions())?;

        debug!("Copied {} ({} bytes)", from.display(), written);
        Ok(written)
    }

    /// Hard link a file, falling back to a copy when linking is refused
    /// (e.g. source and destination live on different filesystems)
    #[instrument(skip(self))]
    pub fn link_file<P: AsRef<Path> + std::fmt::Debug, Q: AsRef<Path> + std::fmt::Debug>(
        &self,
        src: P,
        dst: Q,
    ) -> io::Result<LinkMethod> {
        // hard_link does not follow symlinks on every platform
        let from = fs::canonicalize(src.as_ref())?;
        let (from, to) = (from.as_path(), dst.as_ref());

        match fs::hard_link(from, to) {
            Ok(()) => {
                debug!("Linked {} -> {}", from.display(), to.display());
                Ok(LinkMethod::HardLinked)
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::AlreadyExists) => {
                Err(e)
            }
            Err(e) => {
                warn!("Cannot hard link {} ({}), copying instead", from.display(), e);
                self.copy_file(from, to)?;
                Ok(LinkMethod::Copied)
            }
        }
    }

    /// Link every regular file directly inside `src_dir` into `dst_dir`.
    /// Subdirectories are skipped. Returns the number of files linked.
    #[instrument(skip(self))]
    pub fn link_regular_files<P: AsRef<Path> + std::fmt::Debug, Q: AsRef<Path> + std::fmt::Debug>(
        &self,
        src_dir: P,
        dst_dir: Q,
    ) -> io::Result<usize> {
        let src_dir = src_dir.as_ref();
        let dst_dir = dst_dir.as_ref();

        let mut files = Vec::new();
        for entry in fs::read_dir(src_dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            } else {
                debug!("Skipping non-regular file: {}", path.display());
            }
        }
        files.sort();

        let mut copied = 0;
        for path in &files {
            if let Some(file_name) = path.file_name() {
                if self.link_file(path, dst_dir.join(file_name))? == LinkMethod::Copied {
                    copied += 1;
                }
            }
        }

        debug!(
            "Linked {} files from {} to {} ({} copied)",
            files.len(),
            src_dir.display(),
            dst_dir.display(),
            copied
        );
        Ok(files.len())
    }

    /// Move `src` to `dst`, creating the destination's parent directories.
    /// Crossing filesystems degrades to copy and delete.
    #[instrument(skip(self))]
    pub fn move_file<P: AsRef<Path> + std::fmt::Debug, Q: AsRef<Path> + std::fmt::Debug>(
        &self,
        src: P,
        dst: Q,
    ) -> io::Result<()> {
        let (from, to) = (src.as_ref(), dst.as_ref());

        if let Some(dir) = to.parent() {
            fs::create_dir_all(dir)?;
        }

        if let Err(e) = fs::rename(from, to) {
            debug!("rename({}) failed: {}; copying", from.display(), e);
            self.copy_file(from, to)?;
            fs::remove_file(from)?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn create_dir_all<P: AsRef<Path> + std::fmt::Debug>(&self, path: P) -> io::Result<()> {
        fs::create_dir_all(path.as_ref())
    }

    /// Remove a directory tree. Returns `false` if there was nothing to remove.
    #[instrument(skip(self))]
    pub fn remove_dir_all_if_exists<P: AsRef<Path> + std::fmt::Debug>(
        &self,
        path: P,
    ) -> io::Result<bool> {
        match fs::remove_dir_all(path.as_ref()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn is_file<P: AsRef<Path>>(&self, path: P) -> bool {
        path.as_ref().is_file()
    }

    pub fn is_dir<P: AsRef<Path>>(&self, path: P) -> bool {
        path.as_ref().is_dir()
    }

    pub fn file_size<P: AsRef<Path>>(&self, path: P) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    /// Write `contents` to `path`, creating parent directories if needed
    #[instrument(skip(self, contents))]
    pub fn write_file<P: AsRef<Path> + std::fmt::Debug, C: AsRef<[u8]>>(
        &self,
        path: P,
        contents: C,
    ) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, contents)
    }

    /// Write a shell script and mark it executable
    #[instrument(skip(self, contents))]
    pub fn write_script<P: AsRef<Path> + std::fmt::Debug>(
        &self,
        path: P,
        contents: &str,
    ) -> io::Result<()> {
        let path = path.as_ref();
        self.write_file(path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
        }

        Ok(())
    }

    pub fn read_to_string<P: AsRef<Path>>(&self, path: P) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
