//! HTTP client for the Screeps web API.

use super::{BranchInfo, ScreepsApi};
use crate::collector::CodeBundle;
use crate::config::ScreepsConfig;
use crate::error::{DeployError, Result};
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

const TOKEN_HEADER: &str = "X-Token";
const USERNAME_HEADER: &str = "X-Username";

const SIGNIN: &str = "api/auth/signin";
const BRANCHES: &str = "api/user/branches";
const CODE: &str = "api/user/code";
const CLONE_BRANCH: &str = "api/user/clone-branch";

/// Typed client for the handful of endpoints the upload uses.
///
/// Requests carry the current token in both the `X-Token` and `X-Username`
/// headers. When a response returns a new `X-Token` it replaces the stored one.
#[derive(Debug, Clone)]
pub struct ScreepsClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

#[derive(Serialize)]
struct SigninRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SetCodeRequest<'a> {
    branch: &'a str,
    modules: &'a CodeBundle,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CloneBranchRequest<'a> {
    branch: &'a str,
    new_name: &'a str,
    default_modules: &'a CodeBundle,
}

#[derive(serde::Deserialize)]
struct SigninResponse {
    token: String,
}

#[derive(serde::Deserialize)]
struct BranchesResponse {
    list: Vec<BranchInfo>,
}

impl ScreepsClient {
    /// Create a client for the server rooted at `base_url`.
    pub fn new(base_url: Url) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create from an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// Client for the configured server, pre-authorised when the config carries a token.
    pub fn from_config(config: &ScreepsConfig) -> Result<Self> {
        let mut client = Self::new(config.base_url()?)?;
        client.token = config.token.clone();
        Ok(client)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint)
            .map_err(|e| DeployError::config(format!("invalid endpoint {endpoint}: {e}")))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request
                .header(TOKEN_HEADER, token)
                .header(USERNAME_HEADER, token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&mut self, endpoint: &str) -> Result<T> {
        let request = self.authorize(self.client.get(self.url(endpoint)?));
        self.send(endpoint, request).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&mut self, endpoint: &str, body: &B) -> Result<T> {
        let request = self.authorize(self.client.post(self.url(endpoint)?).json(body));
        self.send(endpoint, request).await
    }

    async fn send<T: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        log::debug!("Calling {}", endpoint);
        let resp = request.send().await?;
        self.refresh_token(resp.headers());

        let status = resp.status();
        let body = resp.text().await?;
        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(remote(endpoint, format!("{status}: {body}")));
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(error) = value.get("error") {
            let message = error.as_str().map(String::from).unwrap_or_else(|| error.to_string());
            return Err(remote(endpoint, message));
        }
        if !status.is_success() {
            return Err(remote(endpoint, format!("{status}: {body}")));
        }
        if value.get("ok").and_then(Value::as_i64) != Some(1) {
            return Err(remote(endpoint, format!("unexpected response: {body}")));
        }

        Ok(serde_json::from_value(value)?)
    }

    fn refresh_token(&mut self, headers: &HeaderMap) {
        let Some(token) = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok()) else {
            return;
        };
        if self.token.as_deref() != Some(token) {
            log::debug!("Server issued a new session token");
            self.token = Some(token.to_string());
        }
    }
}

fn remote(endpoint: &str, message: String) -> DeployError {
    DeployError::Remote {
        endpoint: endpoint.to_string(),
        message,
    }
}

impl ScreepsApi for ScreepsClient {
    async fn authenticate(&mut self, email: &str, password: &str) -> Result<()> {
        let resp: SigninResponse = self.post(SIGNIN, &SigninRequest { email, password }).await?;
        self.token = Some(resp.token);
        Ok(())
    }

    async fn branches(&mut self) -> Result<Vec<BranchInfo>> {
        let resp: BranchesResponse = self.get(BRANCHES).await?;
        Ok(resp.list)
    }

    async fn set_code(&mut self, branch: &str, code: &CodeBundle) -> Result<()> {
        let _: Value = self
            .post(CODE, &SetCodeRequest {
                branch,
                modules: code,
            })
            .await?;
        Ok(())
    }

    async fn clone_branch(&mut self, source: &str, new_name: &str, code: &CodeBundle) -> Result<()> {
        let _: Value = self
            .post(CLONE_BRANCH, &CloneBranchRequest {
                branch: source,
                new_name,
                default_modules: code,
            })
            .await?;
        Ok(())
    }
}
