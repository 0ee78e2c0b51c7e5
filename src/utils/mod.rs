//! Utility modules for common functionality
//!
//! Provides reusable utilities for file operations, process execution,
//! and environment handling.

pub mod env;
pub mod fs;
pub mod process;

pub use env::{PackageInfo, PackageInfoWriter};
pub use fs::FileSystemUtils;
pub use process::ProcessRunner;
