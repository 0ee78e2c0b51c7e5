//! Command implementation for the CLI

use crate::{
    cli::Args,
    config::Config,
    core::{
        artifacts::{ArtifactCollector, CollectedArtifact},
        builder::PackageBuilder,
        package::PackageRequest,
    },
    utils::env::{PackageInfo, PackageInfoWriter},
};
use anyhow::Context;
use tracing::{info, instrument};

/// Build the requested package and move it to its output path
#[instrument(skip(config, args))]
pub fn execute_command(config: &Config, args: &Args) -> anyhow::Result<CollectedArtifact> {
    let request = PackageRequest {
        package_type: args.package_type,
        input_dir: args.input_dir.clone(),
        version: args.version_tag.clone(),
        output_file: args.output_file.clone(),
    };

    info!(
        "Creating \"{}\" package {} from \"{}\"...",
        request.package_type,
        request.version,
        request.input_dir.display()
    );

    let builder = PackageBuilder::new(config.clone());
    let package = builder
        .build(&request)
        .with_context(|| format!("Failed to create {} package", request.package_type))?;

    let artifact = ArtifactCollector::new()
        .collect(package, &request.output_file)
        .context("Failed to move package to its output location")?;

    if let Some(info_file) = &args.info_file {
        let package_info = PackageInfo::new(&config.metadata, &request, &artifact.destination);
        PackageInfoWriter::new()
            .generate(&package_info, info_file)
            .context("Failed to write package information")?;
    }

    info!(
        "Package created at \"{}\" ({} bytes).",
        artifact.destination.display(),
        artifact.size
    );
    Ok(artifact)
}
