//! Core functionality for dictionary packaging
//!
//! Contains the package formats, version tags, staging layouts, the
//! builder that drives the packaging tools and artifact relocation.

pub mod artifacts;
pub mod builder;
pub mod layout;
pub mod package;
pub mod version;

pub use artifacts::ArtifactCollector;
pub use builder::{BuiltPackage, PackageBuilder};
pub use package::{PackageRequest, PackageType};
pub use version::VersionTag;
