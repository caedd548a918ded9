//! GitHub REST implementation of [`RepoLookup`]
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::validation::repo_lookup::{RepoLookup, RepoLookupError};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Public GitHub API root
pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct RepoResponse {
    full_name: String,
}

/// Looks repositories up with `GET /repos/{owner}/{name}`
///
/// Redirects for renamed or transferred repositories are followed, so the
/// returned `full_name` is the canonical location.
#[derive(Debug, Clone)]
pub struct GitHubRepoLookup {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubRepoLookup {
    pub fn new(api_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self, RepoLookupError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| RepoLookupError::Transport {
            repo: String::new(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn repo_url(&self, full_name: &str) -> String {
        format!("{}/repos/{}", self.api_url, full_name)
    }
}

impl RepoLookup for GitHubRepoLookup {
    fn canonical_name(&self, full_name: &str) -> Result<Option<String>, RepoLookupError> {
        let transport = |e: reqwest::Error| RepoLookupError::Transport {
            repo: full_name.to_string(),
            reason: e.to_string(),
        };

        let mut request = self
            .client
            .get(self.repo_url(full_name))
            .header(USER_AGENT, concat!("repodata/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().map_err(transport)?;
        let status = response.status();
        debug!(repo = full_name, status = status.as_u16(), "GitHub repo lookup");

        match status {
            StatusCode::OK => {
                let body: RepoResponse = response.json().map_err(transport)?;
                Ok(Some(body.full_name))
            }
            StatusCode::NOT_FOUND => Ok(None),
            other => Err(RepoLookupError::Status {
                repo: full_name.to_string(),
                status: other.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::base::ValidationContext;
    use crate::validation::error::ErrorKind;
    use crate::validation::repo_lookup::RepoCache;
    use serde_json::json;
    use tokio::runtime::Runtime;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Serve one canned response for `GET /repos/{repo}`
    fn serve(runtime: &Runtime, repo: &str, response: ResponseTemplate) -> MockServer {
        runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(format!("/repos/{}", repo)))
                .and(header("accept", "application/vnd.github+json"))
                .respond_with(response)
                .mount(&server)
                .await;
            server
        })
    }

    fn lookup_for(server: &MockServer, token: Option<&str>) -> GitHubRepoLookup {
        GitHubRepoLookup::new(server.uri(), token.map(str::to_string), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_ok_returns_full_name() {
        let runtime = Runtime::new().unwrap();
        let server = serve(
            &runtime,
            "openedx/edx-platform",
            ResponseTemplate::new(200).set_body_json(json!({"full_name": "openedx/edx-platform", "private": false})),
        );
        let lookup = lookup_for(&server, None);

        assert_eq!(
            lookup.canonical_name("openedx/edx-platform").unwrap(),
            Some("openedx/edx-platform".to_string())
        );
        let cache = RepoCache::new(&lookup);
        assert!(cache.check_exists("openedx/edx-platform", &ValidationContext::new()).is_ok());
    }

    #[test]
    fn test_different_full_name_is_a_mismatch() {
        let runtime = Runtime::new().unwrap();
        let server = serve(
            &runtime,
            "OpenEdx/Edx-Platform",
            ResponseTemplate::new(200).set_body_json(json!({"full_name": "openedx/edx-platform"})),
        );
        let lookup = lookup_for(&server, None);

        let err = RepoCache::new(&lookup)
            .check_exists("OpenEdx/Edx-Platform", &ValidationContext::new())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Reference);
        assert_eq!(err.message, "Repo OpenEdx/Edx-Platform is actually at openedx/edx-platform");
    }

    #[test]
    fn test_not_found_is_none() {
        let runtime = Runtime::new().unwrap();
        let server = serve(&runtime, "gone/away", ResponseTemplate::new(404));
        let lookup = lookup_for(&server, None);

        assert_eq!(lookup.canonical_name("gone/away").unwrap(), None);
        let err = RepoCache::new(&lookup)
            .check_exists("gone/away", &ValidationContext::new())
            .unwrap_err();
        assert_eq!(err.message, "Repo gone/away doesn't exist");
    }

    #[test]
    fn test_server_error_is_status() {
        let runtime = Runtime::new().unwrap();
        let server = serve(&runtime, "flaky/repo", ResponseTemplate::new(502));
        let lookup = lookup_for(&server, None);

        assert_eq!(
            lookup.canonical_name("flaky/repo").unwrap_err(),
            RepoLookupError::Status {
                repo: "flaky/repo".to_string(),
                status: 502,
            }
        );
        let err = RepoCache::new(&lookup)
            .check_exists("flaky/repo", &ValidationContext::new())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Reference);
    }

    #[test]
    fn test_token_is_sent_as_bearer() {
        let runtime = Runtime::new().unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/repos/a/b"))
                .and(header("authorization", "Bearer ghp_test"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"full_name": "a/b"})))
                .mount(&server)
                .await;
            server
        });

        assert_eq!(lookup_for(&server, Some("ghp_test")).canonical_name("a/b").unwrap(), Some("a/b".to_string()));
        assert_eq!(lookup_for(&server, None).canonical_name("a/b").unwrap(), None);
    }

    #[test]
    fn test_repo_url_trims_trailing_slash() {
        let lookup = GitHubRepoLookup::new("https://github.example.com/api/v3/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(
            lookup.repo_url("openedx/edx-platform"),
            "https://github.example.com/api/v3/repos/openedx/edx-platform"
        );
    }
}
