//! Locale lists from the translation backend and the code repository.
//!
//! Used to detect locales that are active in Pontoon but have no folder in the
//! product repository yet.
//!
//! # Architecture
//!
//! - `pontoon`: Pontoon GraphQL client
//! - `github`: GitHub contents API client

mod github;
mod pontoon;

pub use github::GithubClient;
pub use pontoon::PontoonClient;

use crate::config::Config;
use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("xliff-l10n/", env!("CARGO_PKG_VERSION"));

/// Failures of the remote locale lookups.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Project {slug} not found in Pontoon.")]
    ProjectNotFound { slug: String },

    #[error("{service} error ({status}): {body}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl RemoteError {
    /// Network failures, rate limiting and 5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::ProjectNotFound { .. } => false,
            RemoteError::Status { status, .. } => {
                *status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            RemoteError::Request { source, .. } => !source.is_decode(),
        }
    }
}

/// A product checked by `check-locales`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Product {
    Firefox,
    Focus,
}

impl Product {
    pub fn name(&self) -> &'static str {
        match self {
            Product::Firefox => "Firefox for iOS",
            Product::Focus => "Focus for iOS",
        }
    }

    /// `owner/name` of the GitHub repository.
    pub fn github_repo(&self) -> &'static str {
        match self {
            Product::Firefox => "mozilla-mobile/firefox-ios",
            Product::Focus => "mozilla-mobile/focus-ios",
        }
    }

    /// Folder holding the `*.lproj` directories.
    pub fn github_path(&self) -> &'static str {
        match self {
            Product::Firefox => "Client",
            Product::Focus => "Blockzilla",
        }
    }

    pub fn pontoon_slug(&self) -> &'static str {
        match self {
            Product::Firefox => "firefox-for-ios",
            Product::Focus => "focus-for-ios",
        }
    }
}

/// Locales in `backend` without a counterpart in `repository`, sorted.
pub fn missing_locales(backend: &[String], repository: &[String]) -> Vec<String> {
    let repository: BTreeSet<&str> = repository.iter().map(String::as_str).collect();
    backend
        .iter()
        .map(String::as_str)
        .filter(|locale| !repository.contains(locale))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// HTTP client shared by both lookups.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Build both clients from the environment configuration.
pub fn clients(config: &Config) -> Result<(PontoonClient, GithubClient), reqwest::Error> {
    let http = http_client(config.http_timeout)?;
    Ok((
        PontoonClient::new(http.clone(), &config.pontoon_url),
        GithubClient::new(http, &config.github_api_url, config.github_token.clone()),
    ))
}

/// Read the body of a failed response for the error message.
async fn status_error(service: &'static str, response: reqwest::Response) -> RemoteError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
    RemoteError::Status {
        service,
        status,
        body,
    }
}
