use serde::{Deserialize, Serialize};

/// A synced GitHub repository, overwritten wholesale on each sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub repo_id: String,
    pub name: String,
    pub description: String,
    pub language: String,
    pub stars: i64,
    pub forks: i64,
    pub updated_at: String,
    pub url: String,
    pub high_level_summary: String,
    pub detailed_summary: String,
    pub last_synced: i64,
    /// Hash of the README at last sync; `None` means no README existed.
    pub readme_hash: Option<String>,
}

/// A synced Medium post. The key is a hash of the permalink, so re-syncing
/// the same post overwrites the existing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub post_id: String,
    pub title: String,
    pub excerpt: String,
    pub published_date: String,
    pub read_time: String,
    pub url: String,
    /// Not available via the RSS feed, always 0.
    pub claps: i64,
    pub last_synced: i64,
}

/// A synced YouTube video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_date: String,
    pub views: String,
    pub duration: String,
    pub thumbnail_url: String,
    pub url: String,
    pub last_synced: i64,
}
