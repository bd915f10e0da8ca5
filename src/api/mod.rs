//! Screeps server operations used by the upload.
//!
//! [`ScreepsApi`] is the seam between the upload decision logic and the
//! network; [`ScreepsClient`] is the HTTP implementation.

mod client;
#[cfg(test)]
pub(crate) mod test_server;

pub use client::ScreepsClient;

use crate::collector::CodeBundle;
use crate::error::Result;
use serde::Deserialize;

/// Branch entry as returned by the branch listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchInfo {
    pub branch: String,
    #[serde(default)]
    pub active_world: bool,
    #[serde(default)]
    pub active_sim: bool,
}

/// Remote calls needed to publish a code bundle.
///
/// Methods take `&mut self` because the server may hand out a fresh session
/// token on any response.
#[allow(async_fn_in_trait)]
pub trait ScreepsApi {
    /// Exchange email and password for a session token.
    async fn authenticate(&mut self, email: &str, password: &str) -> Result<()>;

    /// Branches of the authenticated user, in server order.
    async fn branches(&mut self) -> Result<Vec<BranchInfo>>;

    /// Replace the modules of an existing branch.
    async fn set_code(&mut self, branch: &str, code: &CodeBundle) -> Result<()>;

    /// Create `new_name` from `source` (empty for a fresh branch) with `code` as its modules.
    async fn clone_branch(&mut self, source: &str, new_name: &str, code: &CodeBundle)
    -> Result<()>;
}
