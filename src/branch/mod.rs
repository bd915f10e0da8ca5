//! Target branch resolution.
//!
//! A configured branch is either used literally or, for the `"auto"`
//! sentinel, replaced by the branch currently checked out in git.

use crate::context::Environment;
use std::path::PathBuf;

/// Branch sentinel that defers to the checked-out git branch.
pub const AUTO_BRANCH: &str = "auto";

/// Version-control query used by the branch resolver.
pub trait Vcs {
    /// Name of the checked-out branch, `None` outside a repository or on a detached HEAD.
    fn current_branch(&self) -> Option<String>;
}

/// [`Vcs`] backed by the git repository enclosing a directory.
#[derive(Debug, Clone)]
pub struct GitVcs {
    start: PathBuf,
}

impl GitVcs {
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
        }
    }
}

impl Vcs for GitVcs {
    fn current_branch(&self) -> Option<String> {
        let repo = match gix::discover(&self.start) {
            Ok(repo) => repo,
            Err(e) => {
                log::debug!("No git repository at {}: {}", self.start.display(), e);
                return None;
            }
        };

        match repo.head_name() {
            Ok(Some(name)) => Some(name.shorten().to_string()),
            Ok(None) => {
                log::debug!("HEAD is detached in {}", self.start.display());
                None
            }
            Err(e) => {
                log::warn!("Failed to read HEAD in {}: {}", self.start.display(), e);
                None
            }
        }
    }
}

/// Resolve the branch to upload to.
///
/// Returns `branch` unchanged unless it is [`AUTO_BRANCH`], in which case the
/// environment's current git branch is returned.
pub fn get_branch_name(branch: &str, env: &Environment) -> Option<String> {
    if branch == AUTO_BRANCH {
        let resolved = env.vcs().current_branch();
        log::debug!("Resolved auto branch to {:?}", resolved);
        resolved
    } else {
        Some(branch.to_string())
    }
}
