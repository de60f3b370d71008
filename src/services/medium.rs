use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;

use crate::error::{AppError, Result};

const USER_AGENT_STRING: &str = "portfolio-sync/1.0";

/// One entry from the Medium RSS feed. The summary still carries HTML.
#[derive(Debug, Clone)]
pub struct RawPost {
    pub title: String,
    pub link: String,
    pub published: String,
    pub summary: String,
}

pub struct MediumClient {
    client: Client,
}

impl MediumClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT_STRING)
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// Fetch and parse a user's feed. Entries without a permalink are
    /// skipped; everything else is taken as-is from the parser.
    pub async fn list_posts(&self, username: &str) -> Result<Vec<RawPost>> {
        let url = format!("https://medium.com/feed/@{}", username);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Failed to fetch feed: HTTP {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        let feed = parser::parse(&bytes[..])?;

        let posts = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let link = entry.links.first().map(|l| l.href.clone())?;

                let summary = entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| entry.content.and_then(|c| c.body))
                    .unwrap_or_default();

                Some(RawPost {
                    title: entry
                        .title
                        .map(|t| t.content)
                        .unwrap_or_else(|| "Untitled".to_string()),
                    link,
                    published: entry
                        .published
                        .or(entry.updated)
                        .map(|d| d.to_rfc3339())
                        .unwrap_or_default(),
                    summary,
                })
            })
            .collect();

        Ok(posts)
    }
}

impl Default for MediumClient {
    fn default() -> Self {
        Self::new()
    }
}
