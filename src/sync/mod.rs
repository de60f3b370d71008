pub mod github;
pub mod medium;
pub mod youtube;

use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::db::{RecordStore, Tables};
use crate::error::{AppError, Result};
use crate::secrets::SecretResolver;

/// Fingerprint text for change detection and stable keys. Not a security
/// boundary.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Run one sync job end to end and record the outcome.
pub async fn run_service(service: &str, config: &Config) -> Result<()> {
    let store = RecordStore::open(&config.db_path, Tables::from_config(config)).await?;
    let resolver = SecretResolver::new();

    tracing::info!("Starting {} sync...", service);

    let result = match service {
        "github" => github::run(config, &resolver, &store).await,
        "medium" => medium::run(config, &store).await,
        "youtube" => youtube::run(config, &resolver, &store).await,
        other => Err(AppError::Config(format!("unknown service: {}", other))),
    };

    let count = finalize(&store, service, result).await?;
    tracing::info!("Successfully synced {} items for {}", count, service);
    Ok(())
}

/// Record the run's SyncRun row. A failed run records zero items regardless
/// of how far it got; a secondary failure to write the metadata is logged
/// but never masks the original error.
pub async fn finalize(store: &RecordStore, service: &str, result: Result<usize>) -> Result<usize> {
    match result {
        Ok(count) => {
            store
                .record_sync_run(service, "success", count as i64, None)
                .await?;
            Ok(count)
        }
        Err(e) => {
            tracing::error!("Error during {} sync: {}", service, e);
            if let Err(meta_error) = store
                .record_sync_run(service, "failed", 0, Some(e.to_string()))
                .await
            {
                tracing::warn!("Failed to update sync metadata: {}", meta_error);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::tests::open_test_store;

    #[test]
    fn content_hash_is_deterministic() {
        let a = content_hash("https://medium.com/@user/some-post-1a2b3c");
        let b = content_hash("https://medium.com/@user/some-post-1a2b3c");
        assert_eq!(a, b);
        assert_ne!(a, content_hash("https://medium.com/@user/other"));
        // hex-encoded sha256
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn successful_run_records_count() {
        let (_dir, store) = open_test_store().await;
        let count = finalize(&store, "medium", Ok(7)).await.unwrap();
        assert_eq!(count, 7);

        let run = store.get_sync_run("medium").await.unwrap().unwrap();
        assert_eq!(run["last_sync_status"], "success");
        assert_eq!(run["items_synced"], 7);
        assert!(run.get("error_message").is_none());
    }

    #[tokio::test]
    async fn failed_run_records_zero_items_and_message() {
        let (_dir, store) = open_test_store().await;

        // A run that processed some items before failing still records 0.
        let result: Result<usize> = Err(AppError::Upstream("HTTP 502".to_string()));
        let err = finalize(&store, "youtube", result).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));

        let run = store.get_sync_run("youtube").await.unwrap().unwrap();
        assert_eq!(run["last_sync_status"], "failed");
        assert_eq!(run["items_synced"], 0);
        let message = run["error_message"].as_str().unwrap();
        assert!(!message.is_empty());
    }
}
