//! Command line interface: acts as the host bundler's final step.
//!
//! Loads the already-written output, runs the generate hook, writes the
//! rendered maps back and runs the write hook.

mod args;

pub use args::Args;

use crate::context::Environment;
use crate::error::{CliError, Result};
use crate::output::{OutputBundle, OutputOptions};
use crate::plugin::{ScreepsOptions, ScreepsPlugin};
use crate::upload::{DeployAction, resolve_config};
use anyhow::Context;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    let env = Environment::discover(cwd);

    execute(&args, &env).await?;
    Ok(0)
}

/// Run the deploy for already-parsed arguments.
pub async fn execute(args: &Args, env: &Environment) -> Result<Option<DeployAction>> {
    let options = plugin_options(args, env)?;
    let plugin = ScreepsPlugin::new(options);
    let output = OutputOptions {
        file: args.output.clone(),
        sourcemap: args.sourcemap,
    };

    let bundle = OutputBundle::load(&output, env).await?;
    let bundle = plugin.generate_bundle(&output, &bundle);
    if output.sourcemap {
        bundle.emit_maps(&output, env).await?;
    }

    let action = plugin.write_bundle(&output, &bundle, env).await?;
    match action {
        Some(DeployAction::Updated) => log::info!("✓ Updated branch"),
        Some(DeployAction::Cloned) => log::info!("✓ Created branch"),
        None => {}
    }
    Ok(action)
}

/// Plugin options from the arguments, with `--branch` applied to the loaded config.
fn plugin_options(args: &Args, env: &Environment) -> Result<ScreepsOptions> {
    let mut options = ScreepsOptions {
        config_file: args.config_file.clone(),
        config: None,
        dry_run: args.dry_run,
    };

    if let Some(branch) = &args.branch {
        if let Some(mut config) = resolve_config(&options, env)? {
            config.branch = branch.clone();
            options.config = Some(config);
        }
    }

    Ok(options)
}
