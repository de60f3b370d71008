use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;

use crate::config::Config;
use crate::db::RecordStore;
use crate::error::Result;
use crate::models::Video;
use crate::secrets::SecretResolver;
use crate::services::{RawVideo, YouTubeClient};
use crate::text::{format_thousands, truncate_chars};

const MAX_RESULTS: u32 = 50;
const DESCRIPTION_MAX_CHARS: usize = 500;

/// Sync the most recent videos of the configured channel. Returns the number
/// of records written.
pub async fn run(
    config: &Config,
    resolver: &SecretResolver,
    store: &RecordStore,
) -> Result<usize> {
    let api_key = resolver.resolve_field(&config.youtube_api_key_secret, "api_key")?;
    let channel_id = config.youtube_channel_id()?;

    let client = YouTubeClient::new(api_key);

    let videos = client.list_channel_videos(channel_id, MAX_RESULTS).await?;
    tracing::info!("Found {} videos", videos.len());

    let mut synced_count = 0;

    for video in videos {
        let record = video_record(video, Utc::now().timestamp())?;
        store.put_video(&record).await?;
        synced_count += 1;
        tracing::info!("Synced: {}", record.title);
    }

    Ok(synced_count)
}

fn video_record(video: RawVideo, now: i64) -> Result<Video> {
    let views: i64 = video
        .views
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid view count {:?}: {}", video.views, e))?;

    Ok(Video {
        url: format!("https://youtube.com/watch?v={}", video.video_id),
        video_id: video.video_id,
        title: video.title,
        description: truncate_chars(&video.description, DESCRIPTION_MAX_CHARS).to_string(),
        // keep the date, drop the time of day
        published_date: video
            .published_date
            .split('T')
            .next()
            .unwrap_or_default()
            .to_string(),
        views: format_thousands(views),
        duration: parse_duration(&video.duration),
        thumbnail_url: video.thumbnail_url,
        last_synced: now,
    })
}

fn duration_re() -> &'static Regex {
    static DURATION_RE: OnceLock<Regex> = OnceLock::new();
    DURATION_RE
        .get_or_init(|| Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("valid regex"))
}

/// Convert an ISO 8601 duration to "H:MM:SS", or "M:SS" under an hour.
/// Anything that doesn't look like a duration becomes "0:00".
fn parse_duration(duration: &str) -> String {
    let Some(captures) = duration_re().captures(duration) else {
        return "0:00".to_string();
    };

    let part = |i: usize| -> u64 {
        captures
            .get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    let (hours, minutes, seconds) = (part(1), part(2), part(3));

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_and_partial_durations() {
        assert_eq!(parse_duration("PT1H2M3S"), "1:02:03");
        assert_eq!(parse_duration("PT45S"), "0:45");
        assert_eq!(parse_duration("PT5M"), "5:00");
        assert_eq!(parse_duration("PT2H"), "2:00:00");
    }

    #[test]
    fn unparseable_duration_is_zero() {
        assert_eq!(parse_duration("garbage"), "0:00");
        assert_eq!(parse_duration(""), "0:00");
        assert_eq!(parse_duration("PT"), "0:00");
    }

    #[test]
    fn transforms_raw_video_to_stored_shape() {
        let record = video_record(
            RawVideo {
                video_id: "abc123".to_string(),
                title: "My video".to_string(),
                description: "d".repeat(600),
                published_date: "2024-05-01T10:00:00Z".to_string(),
                thumbnail_url: "https://i.ytimg.com/vi/abc123/hqdefault.jpg".to_string(),
                duration: "PT1H1M1S".to_string(),
                views: "1234567".to_string(),
            },
            1_700_000_000,
        )
        .unwrap();

        assert_eq!(record.views, "1,234,567");
        assert_eq!(record.duration, "1:01:01");
        assert_eq!(record.published_date, "2024-05-01");
        assert_eq!(record.description.len(), 500);
        assert_eq!(record.url, "https://youtube.com/watch?v=abc123");
        assert_eq!(record.last_synced, 1_700_000_000);
    }

    #[test]
    fn garbage_view_count_fails_the_run() {
        let result = video_record(
            RawVideo {
                video_id: "abc".to_string(),
                title: "t".to_string(),
                description: String::new(),
                published_date: "2024-05-01T10:00:00Z".to_string(),
                thumbnail_url: String::new(),
                duration: "PT5M".to_string(),
                views: "not-a-number".to_string(),
            },
            0,
        );
        assert!(result.is_err());
    }
}
