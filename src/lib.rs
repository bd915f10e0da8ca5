//! Post-bundle deploy step for Screeps.
//!
//! After a bundler has written its output this crate
//! - renders source maps as `module.exports = ...;` modules and renames
//!   `<output>.map` to `<output>.map.js` so the game can `require` them, and
//! - uploads every `.js`, `.map` and `.wasm` file next to the output to a
//!   Screeps branch, cloning a new branch when it does not exist yet.
//!
//! It can be used both as a CLI tool and as a library dependency through
//! [`plugin::ScreepsPlugin`].

pub mod api;
pub mod branch;
pub mod cli;
pub mod collector;
pub mod config;
pub mod context;
pub mod error;
pub mod output;
pub mod plugin;
pub mod sourcemap;
pub mod upload;

// Re-export commonly used types
pub use config::{ScreepsConfig, load_config_file, validate_config};
pub use context::Environment;
pub use error::{CliError, DeployError, Result};
pub use plugin::{ScreepsOptions, ScreepsPlugin};
