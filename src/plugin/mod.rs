//! Bundler lifecycle hooks.
//!
//! The host calls [`ScreepsPlugin::generate_bundle`] while the output is
//! still in memory and [`ScreepsPlugin::write_bundle`] once it is on disk.

use crate::config::ScreepsConfig;
use crate::context::Environment;
use crate::error::Result;
use crate::output::{OutputBundle, OutputOptions};
use crate::sourcemap::{generate_source_maps, write_source_maps};
use crate::upload::{DeployAction, upload_source};
use std::path::PathBuf;

/// User-facing plugin options.
#[derive(Debug, Clone, Default)]
pub struct ScreepsOptions {
    /// Path of a JSON configuration file, relative to the working directory.
    pub config_file: Option<PathBuf>,
    /// Inline configuration; takes precedence over `config_file`.
    pub config: Option<ScreepsConfig>,
    /// Run every local step but skip the upload.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScreepsPlugin {
    options: ScreepsOptions,
}

impl ScreepsPlugin {
    pub fn new(options: ScreepsOptions) -> Self {
        Self { options }
    }

    pub fn name(&self) -> &'static str {
        "screeps"
    }

    /// Generate-time hook: module-style maps when source maps are enabled.
    pub fn generate_bundle(&self, output: &OutputOptions, bundle: &OutputBundle) -> OutputBundle {
        if output.sourcemap {
            generate_source_maps(bundle)
        } else {
            bundle.clone()
        }
    }

    /// Write-time hook: rename the map, then upload unless this is a dry run.
    ///
    /// Returns what the upload did, or `None` when it was skipped.
    pub async fn write_bundle(
        &self,
        output: &OutputOptions,
        _bundle: &OutputBundle,
        env: &Environment,
    ) -> Result<Option<DeployAction>> {
        if output.sourcemap {
            write_source_maps(output, env).await?;
        }

        if self.options.dry_run {
            log::info!("Dry run, skipping upload of {}", output.file.display());
            return Ok(None);
        }

        upload_source(&self.options, output, env).await
    }
}
