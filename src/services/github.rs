use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};

const GITHUB_API_URL: &str = "https://api.github.com";
const USER_AGENT_STRING: &str = "portfolio-sync/1.0";

/// One repository as returned by `GET /users/{username}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRepo {
    pub id: u64,
    pub name: String,
    pub owner: RepoOwner,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: i64,
    #[serde(default)]
    pub forks_count: i64,
    pub updated_at: String,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

#[derive(Debug, Deserialize)]
struct ReadmeResponse {
    content: String,
}

pub struct GitHubClient {
    client: Client,
    token: String,
}

impl GitHubClient {
    pub fn new(token: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT_STRING)
            .build()
            .expect("Failed to create HTTP client");
        Self { client, token }
    }

    /// Fetch one page of repositories for a user.
    pub async fn list_repos(&self, username: &str) -> Result<Vec<RawRepo>> {
        let url = format!("{}/users/{}/repos", GITHUB_API_URL, username);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("token {}", self.token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "GitHub API error: HTTP {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetch and decode a repository README. Any failure (404, decode error,
    /// network) yields `None`; a missing README is not a fault.
    pub async fn get_readme(&self, owner: &str, repo: &str) -> Option<String> {
        let url = format!("{}/repos/{}/{}/readme", GITHUB_API_URL, owner, repo);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("token {}", self.token))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            tracing::debug!("No README for {}/{}: HTTP {}", owner, repo, response.status());
            return None;
        }

        let body: ReadmeResponse = response.json().await.ok()?;
        decode_readme(&body.content)
    }

    /// Fetch the file listing at a path within a repository.
    #[allow(dead_code)]
    pub async fn get_contents(&self, owner: &str, repo: &str, path: &str) -> Result<Value> {
        let url = format!("{}/repos/{}/{}/contents/{}", GITHUB_API_URL, owner, repo, path);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("token {}", self.token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "GitHub API error: HTTP {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

// The API returns base64 with embedded line breaks.
fn decode_readme(content: &str) -> Option<String> {
    let cleaned: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64.decode(cleaned).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_line_wrapped_base64() {
        // "# Hello\nworld" split across two base64 lines
        let encoded = "IyBIZWxs\nbwp3b3JsZA==\n";
        assert_eq!(decode_readme(encoded).unwrap(), "# Hello\nworld");
    }

    #[test]
    fn invalid_payload_yields_none() {
        assert!(decode_readme("not base64!!!").is_none());
        // valid base64 but not UTF-8
        assert!(decode_readme("/w==").is_none());
    }

    #[test]
    fn raw_repo_tolerates_missing_optional_fields() {
        let repo: RawRepo = serde_json::from_str(
            r#"{
                "id": 42,
                "name": "demo",
                "owner": {"login": "someone"},
                "description": null,
                "language": null,
                "updated_at": "2024-05-01T10:00:00Z",
                "html_url": "https://github.com/someone/demo"
            }"#,
        )
        .unwrap();
        assert_eq!(repo.stargazers_count, 0);
        assert_eq!(repo.forks_count, 0);
        assert!(repo.description.is_none());
    }
}
