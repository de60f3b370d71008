use chrono::Utc;

use crate::config::Config;
use crate::db::RecordStore;
use crate::error::Result;
use crate::models::Post;
use crate::services::{MediumClient, RawPost};
use crate::text::{strip_html, truncate_chars};

use super::content_hash;

const EXCERPT_MAX_CHARS: usize = 300;

/// Sync all posts from the configured user's feed. Returns the number of
/// records written.
pub async fn run(config: &Config, store: &RecordStore) -> Result<usize> {
    let username = config.medium_username()?;
    let client = MediumClient::new();

    let posts = client.list_posts(username).await?;
    tracing::info!("Found {} posts", posts.len());

    let mut synced_count = 0;

    for post in posts {
        let record = post_record(post, Utc::now().timestamp());
        store.put_post(&record).await?;
        synced_count += 1;
        tracing::info!("Synced: {}", record.title);
    }

    Ok(synced_count)
}

fn post_record(post: RawPost, now: i64) -> Post {
    // Keying on a hash of the permalink keeps re-syncs idempotent: the same
    // post always lands on the same row.
    let post_id = content_hash(&post.link);

    // Rough estimate: one minute per 1000 characters of raw summary.
    let read_time = (post.summary.chars().count() / 1000).max(1);

    let clean_summary = strip_html(&post.summary);
    let excerpt = if clean_summary.chars().count() > EXCERPT_MAX_CHARS {
        format!("{}...", truncate_chars(&clean_summary, EXCERPT_MAX_CHARS))
    } else {
        clean_summary
    };

    Post {
        post_id,
        title: post.title,
        excerpt,
        published_date: post.published,
        read_time: format!("{} min read", read_time),
        url: post.link,
        claps: 0,
        last_synced: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_post(summary: &str) -> RawPost {
        RawPost {
            title: "A post".to_string(),
            link: "https://medium.com/@user/a-post-1a2b3c".to_string(),
            published: "2024-05-01T10:00:00+00:00".to_string(),
            summary: summary.to_string(),
        }
    }

    #[test]
    fn post_id_is_idempotent_across_syncs() {
        let first = post_record(raw_post("text"), 1_700_000_000);
        let second = post_record(raw_post("updated text"), 1_700_043_200);
        assert_eq!(first.post_id, second.post_id);
    }

    #[test]
    fn long_summary_truncates_to_300_chars_plus_ellipsis() {
        let record = post_record(raw_post(&"a".repeat(350)), 0);
        assert_eq!(record.excerpt.len(), 303);
        assert!(record.excerpt.ends_with("..."));
        assert_eq!(&record.excerpt[..300], "a".repeat(300));
    }

    #[test]
    fn short_summary_is_stored_unmodified() {
        let record = post_record(raw_post(&"b".repeat(200)), 0);
        assert_eq!(record.excerpt, "b".repeat(200));
        assert!(!record.excerpt.ends_with("..."));
    }

    #[test]
    fn markup_is_stripped_before_truncation() {
        let record = post_record(raw_post("<p>Hello <b>world</b></p>"), 0);
        assert_eq!(record.excerpt, "Hello world");
    }

    #[test]
    fn read_time_is_one_minute_per_thousand_chars_of_raw_summary() {
        assert_eq!(post_record(raw_post(&"x".repeat(2500)), 0).read_time, "2 min read");
        assert_eq!(post_record(raw_post(&"x".repeat(50)), 0).read_time, "1 min read");
    }

    #[test]
    fn claps_are_always_zero() {
        assert_eq!(post_record(raw_post("text"), 0).claps, 0);
    }
}
