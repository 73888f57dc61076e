// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tas_deployer::config::{Config, OutputFormat};
use tas_deployer::deployer::{ManifestObject, ManifestSet};
use tas_deployer::manifests::{EmbeddedAssets, SchedulerManifests, UpdaterManifests};
use tas_deployer::types::Platform;

fn main() -> Result<()> {
    // Logs go to stderr, stdout only carries manifests
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    let info = config.platform_info();
    info!(
        platform = %info.platform,
        platform_source = %info.platform_source,
        version = %info.version,
        version_source = %info.version_source,
        "Rendering manifests"
    );
    if info.platform == Platform::Unknown {
        bail!("unsupported platform, set PLATFORM to kubernetes, openshift or hypershift");
    }

    let mut objects = Vec::new();

    if info.platform == Platform::HyperShift {
        info!("HyperShift runs no topology updater, skipping it");
    } else {
        let updater_opts = config.updater_options();
        let updater = UpdaterManifests::new(&EmbeddedAssets, info.platform, &updater_opts.namespace)
            .context("Failed to load topology updater manifests")?
            .render(&updater_opts)
            .context("Failed to render topology updater manifests")?;
        objects.extend(updater.to_objects());
    }

    let sched_opts = config.scheduler_options();
    let scheduler = SchedulerManifests::new(&EmbeddedAssets, info.platform, &sched_opts.namespace)
        .context("Failed to load scheduler manifests")?
        .render(&sched_opts)
        .context("Failed to render scheduler manifests")?;
    objects.extend(scheduler.to_objects());

    info!(objects = objects.len(), "Manifests rendered");

    let output = match config.output_format {
        OutputFormat::Yaml => to_yaml_stream(&objects)?,
        OutputFormat::Json => serde_json::to_string_pretty(&objects)? + "\n",
    };
    io::stdout()
        .lock()
        .write_all(output.as_bytes())
        .context("Failed to write manifests")?;
    Ok(())
}

fn to_yaml_stream(objects: &[ManifestObject]) -> Result<String> {
    let mut out = String::new();
    for obj in objects {
        out.push_str("---\n");
        out.push_str(
            &serde_yaml::to_string(obj)
                .with_context(|| format!("Failed to encode {} {}", obj.kind(), obj.name()))?,
        );
    }
    Ok(out)
}
