//! # mecab-ipadic-neologd packager
//!
//! Packages a prebuilt mecab-ipadic-neologd dictionary into a tarball, a
//! Debian package or an RPM package. The dictionary itself is built
//! elsewhere; this crate checks the build output, stages it in the layout
//! each format expects and drives `tar` or `fpm` to produce the artifact.
//!
//! ## Example
//!
//! ```no_run
//! use neologd_packager::{
//!     config::Config,
//!     core::{ArtifactCollector, PackageBuilder, PackageRequest, PackageType, VersionTag},
//! };
//!
//! let request = PackageRequest {
//!     package_type: PackageType::DebianPackage,
//!     input_dir: "build".into(),
//!     version: VersionTag::parse("20170814-1")?,
//!     output_file: "dist/mecab-ipadic-neologd.deb".into(),
//! };
//! let package = PackageBuilder::new(Config::default()).build(&request)?;
//! ArtifactCollector::new().collect(package, &request.output_file)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
