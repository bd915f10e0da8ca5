//! Command line argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

/// Post-bundle deploy step for Screeps
#[derive(Parser, Debug)]
#[command(
    name = "screeps-deploy",
    version,
    about = "Upload bundler output to a Screeps branch",
    long_about = "Runs after your bundler has written its output.

Turns <output>.map into a loadable <output>.map.js module and uploads every
.js, .map and .wasm file next to the output to the configured branch. The
branch is created when it does not exist yet.

Usage:
  screeps-deploy --output dist/main.js --sourcemap --config-file screeps.json
  screeps-deploy --output dist/main.js --config-file screeps.json --branch sim
  screeps-deploy --output dist/main.js --sourcemap --dry-run"
)]
pub struct Args {
    /// Primary output file written by the bundler
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: PathBuf,

    /// The bundler emitted <output>.map
    #[arg(short = 's', long)]
    pub sourcemap: bool,

    /// JSON file with server, credentials and branch
    #[arg(short = 'c', long, value_name = "PATH", env = "SCREEPS_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Upload to this branch instead of the configured one ("auto" for the git branch)
    #[arg(short = 'b', long, value_name = "NAME")]
    pub branch: Option<String>,

    /// Transform source maps but do not upload
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.output.file_name().is_none() {
            return Err(format!(
                "Output must name a file: {}",
                self.output.display()
            ));
        }

        if self.branch.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err("Branch cannot be empty".to_string());
        }

        if self.branch.is_some() && self.config_file.is_none() && !self.dry_run {
            return Err("--branch needs --config-file (or SCREEPS_CONFIG)".to_string());
        }

        Ok(())
    }
}
