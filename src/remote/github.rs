use crate::i18n::LocaleRegistry;
use crate::remote::{status_error, RemoteError};
use crate::retry::{with_retry_if, RetryConfig};
use serde::Deserialize;
use tracing::{debug, info};

const SERVICE: &str = "GitHub";
const LOCALE_SUFFIX: &str = ".lproj";

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Client for the GitHub contents API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(http: reqwest::Client, base_url: &str, token: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Locale folders (`*.lproj`) found under `path` in `repo`, as backend codes, sorted.
    ///
    /// `en` and `en-US` are left out.
    pub async fn locale_folders(&self, repo: &str, path: &str) -> Result<Vec<String>, RemoteError> {
        info!("Fetching locale folders from {}/{}", repo, path);
        let entries = with_retry_if(
            &RetryConfig::github_listing(),
            &format!("GitHub contents {}/{}", repo, path),
            || self.contents(repo, path),
            RemoteError::is_retryable,
        )
        .await?;

        let registry = LocaleRegistry::get();
        let mut locales: Vec<String> = entries
            .iter()
            .filter(|entry| entry.kind == "dir")
            .filter_map(|entry| entry.name.strip_suffix(LOCALE_SUFFIX))
            .filter(|locale| !registry.is_ignored_repository_locale(locale))
            .map(|locale| registry.backend_code(locale).to_string())
            .collect();
        locales.sort();
        debug!("{} locale folders in {}", locales.len(), repo);
        Ok(locales)
    }

    async fn contents(&self, repo: &str, path: &str) -> Result<Vec<ContentEntry>, RemoteError> {
        let mut request = self
            .http
            .get(format!("{}/repos/{}/contents/{}", self.base_url, repo, path))
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|source| RemoteError::Request {
            service: SERVICE,
            source,
        })?;

        if !response.status().is_success() {
            return Err(status_error(SERVICE, response).await);
        }

        response.json().await.map_err(|source| RemoteError::Request {
            service: SERVICE,
            source,
        })
    }
}
