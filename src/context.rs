//! Ambient state handed to the branch resolver and file collector.

use crate::branch::{GitVcs, Vcs};
use std::path::{Path, PathBuf};

/// Working directory and version-control handle for one build invocation.
///
/// Paths given to the collector are resolved against `cwd`, and the `"auto"`
/// branch sentinel asks `vcs` for the checked-out branch.
pub struct Environment {
    cwd: PathBuf,
    vcs: Box<dyn Vcs + Send + Sync>,
}

impl Environment {
    pub fn new(cwd: impl Into<PathBuf>, vcs: impl Vcs + Send + Sync + 'static) -> Self {
        Self {
            cwd: cwd.into(),
            vcs: Box::new(vcs),
        }
    }

    /// Environment rooted at `cwd` that reads branches from the enclosing git repository.
    pub fn discover(cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        let vcs = GitVcs::new(cwd.clone());
        Self::new(cwd, vcs)
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn vcs(&self) -> &dyn Vcs {
        self.vcs.as_ref()
    }

    /// Resolve `path` against the working directory unless it is already absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::branch::Vcs;

    /// Directory that is not under version control.
    pub(crate) struct NoVcs;

    impl Vcs for NoVcs {
        fn current_branch(&self) -> Option<String> {
            None
        }
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("cwd", &self.cwd)
            .field("vcs", &"<Vcs>")
            .finish()
    }
}
