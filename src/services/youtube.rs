use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};

const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
const USER_AGENT_STRING: &str = "portfolio-sync/1.0";

/// One channel video with its detail fields already merged in.
#[derive(Debug, Clone)]
pub struct RawVideo {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_date: String,
    pub thumbnail_url: String,
    /// ISO 8601 duration, e.g. "PT1H2M3S".
    pub duration: String,
    /// View count as the API returns it: a decimal string.
    pub views: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    description: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    high: Thumbnail,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

pub struct YouTubeClient {
    client: Client,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT_STRING)
            .build()
            .expect("Failed to create HTTP client");
        Self { client, api_key }
    }

    /// List up to `max_results` of the most recent videos on a channel.
    ///
    /// Two-step: one search call, then one videos.list call per hit for
    /// duration and view count. A video the detail lookup doesn't return is
    /// dropped from the result.
    pub async fn list_channel_videos(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<RawVideo>> {
        let search: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id),
                    ("maxResults", &max_results.to_string()),
                    ("order", "date"),
                    ("type", "video"),
                ],
            )
            .await?;

        let mut videos = Vec::new();

        for item in search.items {
            let Some(video_id) = item.id.video_id else {
                continue;
            };

            let details: VideosResponse = self
                .get_json(
                    "videos",
                    &[("part", "contentDetails,statistics"), ("id", &video_id)],
                )
                .await?;

            let Some(info) = details.items.into_iter().next() else {
                tracing::debug!("No details for video {}, dropping", video_id);
                continue;
            };

            videos.push(RawVideo {
                video_id,
                title: item.snippet.title,
                description: item.snippet.description,
                published_date: item.snippet.published_at,
                thumbnail_url: item.snippet.thumbnails.high.url,
                duration: info.content_details.duration,
                views: info.statistics.view_count.unwrap_or_else(|| "0".to_string()),
            });
        }

        Ok(videos)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", YOUTUBE_API_URL, endpoint);
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "YouTube API error: HTTP {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}
