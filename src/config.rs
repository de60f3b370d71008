use crate::error::{AppError, Result};

/// Runtime configuration, read once from the environment at startup.
///
/// Table names and the database path always resolve (with defaults); the
/// per-source settings are optional so that one service can run without the
/// others being configured.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,

    pub github_repos_table: String,
    pub medium_posts_table: String,
    pub youtube_videos_table: String,
    pub sync_metadata_table: String,

    pub github_username: Option<String>,
    pub medium_username: Option<String>,
    pub youtube_channel_id: Option<String>,

    // Identifiers handed to the secret resolver, not the secrets themselves
    pub github_token_secret: String,
    pub ai_api_key_secret: String,
    pub youtube_api_key_secret: String,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

// Table names are interpolated into SQL statements, so they must be plain
// identifiers.
fn validate_table_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::Config(format!("invalid table name: {:?}", name)))
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            db_path: env_or("DB_PATH", "portfolio.db"),
            github_repos_table: env_or("GITHUB_REPOS_TABLE", "github_repos"),
            medium_posts_table: env_or("MEDIUM_POSTS_TABLE", "medium_posts"),
            youtube_videos_table: env_or("YOUTUBE_VIDEOS_TABLE", "youtube_videos"),
            sync_metadata_table: env_or("SYNC_METADATA_TABLE", "sync_metadata"),
            github_username: env_opt("GITHUB_USERNAME"),
            medium_username: env_opt("MEDIUM_USERNAME"),
            youtube_channel_id: env_opt("YOUTUBE_CHANNEL_ID"),
            github_token_secret: env_or("GITHUB_TOKEN_SECRET", "GITHUB_TOKEN"),
            ai_api_key_secret: env_or("AI_API_KEY_SECRET", "AI_API_KEY"),
            youtube_api_key_secret: env_or("YOUTUBE_API_KEY_SECRET", "YOUTUBE_API_KEY"),
        };

        for table in [
            &config.github_repos_table,
            &config.medium_posts_table,
            &config.youtube_videos_table,
            &config.sync_metadata_table,
        ] {
            validate_table_name(table)?;
        }

        Ok(config)
    }

    pub fn github_username(&self) -> Result<&str> {
        self.github_username
            .as_deref()
            .ok_or_else(|| AppError::Config("GITHUB_USERNAME is not set".to_string()))
    }

    pub fn medium_username(&self) -> Result<&str> {
        self.medium_username
            .as_deref()
            .ok_or_else(|| AppError::Config("MEDIUM_USERNAME is not set".to_string()))
    }

    pub fn youtube_channel_id(&self) -> Result<&str> {
        self.youtube_channel_id
            .as_deref()
            .ok_or_else(|| AppError::Config("YOUTUBE_CHANNEL_ID is not set".to_string()))
    }
}
