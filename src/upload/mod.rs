//! Upload orchestration: config resolution, authentication and the
//! update-or-clone decision.

use crate::api::{ScreepsApi, ScreepsClient};
use crate::branch::get_branch_name;
use crate::collector::{CodeBundle, get_file_list};
use crate::config::{Auth, ScreepsConfig, load_config_file};
use crate::context::Environment;
use crate::error::{DeployError, Result};
use crate::output::OutputOptions;
use crate::plugin::ScreepsOptions;

/// What [`deploy`] did with the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployAction {
    /// The branch existed and its modules were replaced.
    Updated,
    /// The branch did not exist and was created with the modules.
    Cloned,
}

/// Configuration to use for this run, if any.
///
/// An inline config takes precedence over a config file.
pub fn resolve_config(options: &ScreepsOptions, env: &Environment) -> Result<Option<ScreepsConfig>> {
    if let Some(config) = &options.config {
        return Ok(Some(config.clone()));
    }
    match &options.config_file {
        Some(path) => load_config_file(&env.resolve(path)).map(Some),
        None => Ok(None),
    }
}

/// Upload the output directory of `output` to the configured branch.
///
/// Without any configuration this only logs a hint and succeeds.
///
/// # Errors
///
/// - [`DeployError::ConfigInvalid`] when the configuration fails validation or
///   the `"auto"` branch cannot be resolved; raised before any network call.
/// - Filesystem errors from collecting the output directory.
/// - Remote and HTTP errors from the server, passed through unchanged.
pub async fn upload_source(
    options: &ScreepsOptions,
    output: &OutputOptions,
    env: &Environment,
) -> Result<Option<DeployAction>> {
    let Some(config) = resolve_config(options, env)? else {
        log::info!(
            "screeps needs a configuration to upload, e.g. --config-file ./screeps.json"
        );
        return Ok(None);
    };

    let (code, branch) = prepare(&config, output, env).await?;
    let mut api = ScreepsClient::from_config(&config)?;
    deploy(&mut api, &config, &branch, &code).await.map(Some)
}

/// Validate the config, collect the modules and resolve the target branch.
pub async fn prepare(
    config: &ScreepsConfig,
    output: &OutputOptions,
    env: &Environment,
) -> Result<(CodeBundle, String)> {
    config.validate()?;

    let code = get_file_list(&output.file, env).await?;
    let branch = get_branch_name(&config.branch, env).ok_or_else(|| {
        DeployError::config(format!(
            "branch \"{}\" needs a git repository with a checked-out branch at {}",
            config.branch,
            env.cwd().display()
        ))
    })?;

    Ok((code, branch))
}

/// Push `code` to `branch`, creating the branch when the server does not know it.
///
/// Credentials are exchanged for a session first when the config has no token.
/// The branch list is inspected before choosing between update and clone.
pub async fn deploy<A: ScreepsApi>(
    api: &mut A,
    config: &ScreepsConfig,
    branch: &str,
    code: &CodeBundle,
) -> Result<DeployAction> {
    match config.auth() {
        Some(Auth::Token(_)) => {}
        Some(Auth::Credentials { email, password }) => {
            log::info!("Signing in to {} as {}", config.hostname, email);
            api.authenticate(email, password).await?;
        }
        None => return Err(DeployError::config("no authentication configured")),
    }

    let branches = api.branches().await?;
    let exists = branches.iter().any(|b| b.branch == branch);

    if exists {
        log::info!("Uploading {} module(s) to existing branch {}", code.len(), branch);
        api.set_code(branch, code).await?;
        Ok(DeployAction::Updated)
    } else {
        log::info!("Creating branch {} with {} module(s)", branch, code.len());
        api.clone_branch("", branch, code).await?;
        Ok(DeployAction::Cloned)
    }
}
