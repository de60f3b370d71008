use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tokio_rusqlite::Connection;

use crate::config::Config;
use crate::error::Result;
use crate::models::{Post, Repository, SyncRun, Video};

use super::schema;

/// Names of the four backing tables, taken from configuration.
#[derive(Debug, Clone)]
pub struct Tables {
    pub repos: String,
    pub posts: String,
    pub videos: String,
    pub sync_runs: String,
}

impl Tables {
    pub fn from_config(config: &Config) -> Self {
        Self {
            repos: config.github_repos_table.clone(),
            posts: config.medium_posts_table.clone(),
            videos: config.youtube_videos_table.clone(),
            sync_runs: config.sync_metadata_table.clone(),
        }
    }
}

/// Key-value persistence facade: one table per content type plus the sync
/// run metadata table. Records go in as whole JSON documents and come back
/// out as untyped JSON values; ordering of scans is up to the caller.
pub struct RecordStore {
    conn: Connection,
    tables: Tables,
}

impl RecordStore {
    pub async fn open(db_path: &str, tables: Tables) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        let ddl = [
            schema::kv_table_ddl(&tables.repos, "repo_id"),
            schema::kv_table_ddl(&tables.posts, "post_id"),
            schema::kv_table_ddl(&tables.videos, "video_id"),
            schema::kv_table_ddl(&tables.sync_runs, "service_name"),
        ]
        .concat();

        conn.call(move |conn| {
            conn.execute_batch(&ddl)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn, tables })
    }

    async fn put(&self, table: &str, key_column: &str, key: String, doc: String) -> Result<()> {
        let sql = schema::upsert_sql(table, key_column);
        self.conn
            .call(move |conn| {
                conn.execute(&sql, params![key, doc])?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    async fn get(&self, table: &str, key_column: &str, key: String) -> Result<Option<Value>> {
        let sql = schema::get_sql(table, key_column);
        let doc = self
            .conn
            .call(move |conn| {
                let doc: Option<String> = conn
                    .query_row(&sql, params![key], |row| row.get(0))
                    .optional()?;
                Ok(doc)
            })
            .await?;

        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    async fn scan(&self, table: &str) -> Result<Vec<Value>> {
        let sql = schema::scan_sql(table);
        let docs = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let docs = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(docs)
            })
            .await?;

        docs.iter()
            .map(|doc| serde_json::from_str(doc).map_err(Into::into))
            .collect()
    }

    // Repository operations

    pub async fn put_repo(&self, repo: &Repository) -> Result<()> {
        let doc = serde_json::to_string(repo)?;
        self.put(
            &self.tables.repos,
            "repo_id",
            repo.repo_id.clone(),
            doc,
        )
        .await
    }

    pub async fn get_repo(&self, repo_id: &str) -> Result<Option<Value>> {
        self.get(&self.tables.repos, "repo_id", repo_id.to_string())
            .await
    }

    pub async fn list_repos(&self) -> Result<Vec<Value>> {
        self.scan(&self.tables.repos).await
    }

    // Post operations

    pub async fn put_post(&self, post: &Post) -> Result<()> {
        let doc = serde_json::to_string(post)?;
        self.put(
            &self.tables.posts,
            "post_id",
            post.post_id.clone(),
            doc,
        )
        .await
    }

    pub async fn list_posts(&self) -> Result<Vec<Value>> {
        self.scan(&self.tables.posts).await
    }

    // Video operations

    pub async fn put_video(&self, video: &Video) -> Result<()> {
        let doc = serde_json::to_string(video)?;
        self.put(
            &self.tables.videos,
            "video_id",
            video.video_id.clone(),
            doc,
        )
        .await
    }

    pub async fn list_videos(&self) -> Result<Vec<Value>> {
        self.scan(&self.tables.videos).await
    }

    // Sync run metadata

    pub async fn record_sync_run(
        &self,
        service_name: &str,
        status: &str,
        items_synced: i64,
        error_message: Option<String>,
    ) -> Result<()> {
        let run = SyncRun {
            service_name: service_name.to_string(),
            last_sync_time: Utc::now().timestamp(),
            last_sync_status: status.to_string(),
            items_synced,
            error_message,
        };
        let doc = serde_json::to_string(&run)?;
        self.put(
            &self.tables.sync_runs,
            "service_name",
            run.service_name.clone(),
            doc,
        )
        .await
    }

    pub async fn get_sync_run(&self, service_name: &str) -> Result<Option<Value>> {
        self.get(
            &self.tables.sync_runs,
            "service_name",
            service_name.to_string(),
        )
        .await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_tables() -> Tables {
        Tables {
            repos: "github_repos".to_string(),
            posts: "medium_posts".to_string(),
            videos: "youtube_videos".to_string(),
            sync_runs: "sync_metadata".to_string(),
        }
    }

    pub(crate) async fn open_test_store() -> (tempfile::TempDir, RecordStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("test.db");
        let store = RecordStore::open(db_path.to_str().unwrap(), test_tables())
            .await
            .expect("open store");
        (dir, store)
    }

    fn sample_repo(id: &str, stars: i64) -> Repository {
        Repository {
            repo_id: id.to_string(),
            name: format!("repo-{id}"),
            description: "a test repo".to_string(),
            language: "Rust".to_string(),
            stars,
            forks: 1,
            updated_at: "2024-05-01T10:00:00Z".to_string(),
            url: format!("https://github.com/user/repo-{id}"),
            high_level_summary: "hl".to_string(),
            detailed_summary: "det".to_string(),
            last_synced: 1_700_000_000,
            readme_hash: Some("abc".to_string()),
        }
    }

    #[tokio::test]
    async fn put_then_get_roundtrips_repo() {
        let (_dir, store) = open_test_store().await;
        store.put_repo(&sample_repo("1", 5)).await.unwrap();

        let repo = store.get_repo("1").await.unwrap().expect("repo stored");
        assert_eq!(repo["name"], "repo-1");
        assert_eq!(repo["stars"], 5);

        assert!(store.get_repo("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_replaces_whole_record() {
        let (_dir, store) = open_test_store().await;
        store.put_repo(&sample_repo("1", 5)).await.unwrap();

        let mut updated = sample_repo("1", 9);
        updated.readme_hash = None;
        store.put_repo(&updated).await.unwrap();

        let repos = store.list_repos().await.unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0]["stars"], 9);
        assert!(repos[0]["readme_hash"].is_null());
    }

    #[tokio::test]
    async fn sync_run_is_single_row_per_service() {
        let (_dir, store) = open_test_store().await;

        store
            .record_sync_run("github", "success", 12, None)
            .await
            .unwrap();
        let run = store.get_sync_run("github").await.unwrap().unwrap();
        assert_eq!(run["last_sync_status"], "success");
        assert_eq!(run["items_synced"], 12);
        // error_message key must be omitted entirely, not stored as null
        assert!(run.get("error_message").is_none());

        store
            .record_sync_run("github", "failed", 0, Some("boom".to_string()))
            .await
            .unwrap();
        let run = store.get_sync_run("github").await.unwrap().unwrap();
        assert_eq!(run["last_sync_status"], "failed");
        assert_eq!(run["items_synced"], 0);
        assert_eq!(run["error_message"], "boom");
    }
}
