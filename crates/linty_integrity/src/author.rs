//! Remote authorship lookup for the control file.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::IntegrityConfig;
use crate::error::LookupError;

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("linty/", env!("CARGO_PKG_VERSION"));

/// Finds who last changed a file in a repository.
pub trait AuthorLookup {
    /// Author name of the most recent commit touching `path` in
    /// `repository` (`owner/repo`).
    fn latest_author(
        &self,
        repository: &str,
        path: &str,
    ) -> impl Future<Output = Result<String, LookupError>> + Send;
}

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    author: CommitAuthor,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    name: String,
}

/// [`AuthorLookup`] backed by the GitHub REST commits endpoint.
#[derive(Debug, Clone)]
pub struct GitHubAuthorLookup {
    client: reqwest::Client,
    api_url: String,
}

impl GitHubAuthorLookup {
    pub fn new() -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LookupError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            api_url: crate::config::DEFAULT_API_URL.to_string(),
        })
    }

    pub fn from_config(config: &IntegrityConfig) -> Result<Self, LookupError> {
        Ok(Self::new()?.with_base_url(&config.api_url))
    }

    /// Set the base URL for API requests (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn commits_url(&self, repository: &str) -> String {
        format!("{}/repos/{}/commits", self.api_url, repository)
    }
}

impl AuthorLookup for GitHubAuthorLookup {
    async fn latest_author(&self, repository: &str, path: &str) -> Result<String, LookupError> {
        let url = self.commits_url(repository);
        debug!("Fetching latest commit for {} from {}", path, url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .query(&[("path", path), ("page", "1"), ("per_page", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }

        let body = response.text().await?;
        let commits: Vec<GitHubCommit> = serde_json::from_str(&body)?;

        commits
            .into_iter()
            .next()
            .map(|c| c.commit.author.name)
            .ok_or_else(|| LookupError::NoCommits(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn lookup_for(server: &MockServer) -> GitHubAuthorLookup {
        GitHubAuthorLookup::new()
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_latest_author() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/abcdan/linty/commits"))
            .and(query_param("path", "LINTYCHECK"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "1"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "sha": "abc", "commit": { "author": { "name": "abcdan", "email": "a@b.c" } } }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let author = lookup_for(&server)
            .await
            .latest_author("abcdan/linty", "LINTYCHECK")
            .await
            .unwrap();
        assert_eq!(author, "abcdan");
    }

    #[tokio::test]
    async fn test_empty_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let err = lookup_for(&server)
            .await
            .latest_author("abcdan/linty", "LINTYCHECK")
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NoCommits(ref p) if p == "LINTYCHECK"));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = lookup_for(&server)
            .await
            .latest_author("abcdan/linty", "LINTYCHECK")
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Status(s) if s.as_u16() == 403));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"message\": \"nope\"}"))
            .mount(&server)
            .await;

        let err = lookup_for(&server)
            .await
            .latest_author("abcdan/linty", "LINTYCHECK")
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let err = GitHubAuthorLookup::new()
            .unwrap()
            .with_base_url("http://127.0.0.1:1")
            .latest_author("abcdan/linty", "LINTYCHECK")
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Network(_)));
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let lookup = GitHubAuthorLookup::new()
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(
            lookup.commits_url("o/r"),
            "http://localhost:8080/repos/o/r/commits"
        );
    }
}
