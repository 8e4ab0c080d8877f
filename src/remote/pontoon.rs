use crate::remote::{status_error, RemoteError};
use crate::retry::{with_retry_if, RetryConfig};
use serde::Deserialize;
use tracing::{debug, info};

const SERVICE: &str = "Pontoon";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    errors: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    project: Option<Project>,
}

#[derive(Debug, Deserialize)]
struct Project {
    localizations: Vec<Localization>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Localization {
    locale: Locale,
    missing_strings: u64,
    total_strings: u64,
}

#[derive(Debug, Deserialize)]
struct Locale {
    code: String,
}

/// Client for the Pontoon GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct PontoonClient {
    http: reqwest::Client,
    base_url: String,
}

impl PontoonClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Locales of project `slug` with at least one translated string, sorted.
    pub async fn project_locales(&self, slug: &str) -> Result<Vec<String>, RemoteError> {
        info!("Fetching Pontoon locales for {}", slug);
        let response = with_retry_if(
            &RetryConfig::pontoon_query(),
            &format!("Pontoon project {}", slug),
            || self.query(slug),
            RemoteError::is_retryable,
        )
        .await?;

        if response.errors.is_some_and(|errors| !errors.is_empty()) {
            return Err(RemoteError::ProjectNotFound {
                slug: slug.to_string(),
            });
        }
        let project = response
            .data
            .and_then(|data| data.project)
            .ok_or_else(|| RemoteError::ProjectNotFound {
                slug: slug.to_string(),
            })?;

        let mut locales: Vec<String> = project
            .localizations
            .into_iter()
            .filter(|l| l.missing_strings != l.total_strings)
            .map(|l| l.locale.code)
            .collect();
        locales.sort();
        debug!("{} active locales in {}", locales.len(), slug);
        Ok(locales)
    }

    async fn query(&self, slug: &str) -> Result<GraphQlResponse, RemoteError> {
        let query = format!(
            r#"{{
  project: project(slug: "{}") {{
    localizations {{
      locale {{
        code
      }},
      missingStrings,
      totalStrings
    }}
  }}
}}"#,
            slug
        );

        let response = self
            .http
            .get(format!("{}/graphql", self.base_url))
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|source| RemoteError::Request {
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
