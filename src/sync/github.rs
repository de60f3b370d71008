use chrono::Utc;
use serde_json::Value;

use crate::ai::Summarizer;
use crate::config::Config;
use crate::db::RecordStore;
use crate::error::Result;
use crate::models::Repository;
use crate::secrets::SecretResolver;
use crate::services::GitHubClient;

use super::content_hash;

const NO_README_HIGH_LEVEL: &str = "No README available";
const NO_README_DETAILED: &str = "This repository does not contain a README file.";

/// Sync all repositories for the configured user, generating AI summaries
/// for each README. Returns the number of records written.
pub async fn run(
    config: &Config,
    resolver: &SecretResolver,
    store: &RecordStore,
) -> Result<usize> {
    let token = resolver.resolve_field(&config.github_token_secret, "token")?;
    let ai_api_key = resolver.resolve_field(&config.ai_api_key_secret, "api_key")?;
    let username = config.github_username()?;

    let client = GitHubClient::new(token);
    let summarizer = Summarizer::new(ai_api_key);

    let repos = client.list_repos(username).await?;
    tracing::info!("Found {} repositories", repos.len());

    let mut synced_count = 0;

    for repo in repos {
        let repo_id = repo.id.to_string();
        tracing::info!("Processing repo: {}", repo.name);

        let existing = store.get_repo(&repo_id).await?;
        let readme = client.get_readme(&repo.owner.login, &repo.name).await;

        let (readme_hash, high_level, detailed) = match readme {
            Some(content) => {
                let hash = content_hash(&content);

                // Regenerating summaries is the expensive part; an unchanged
                // README means the whole record is left alone.
                if readme_unchanged(existing.as_ref(), &hash) {
                    tracing::info!("Skipping {} - no changes detected", repo.name);
                    continue;
                }

                tracing::info!("Generating AI summaries for {}", repo.name);
                let (high_level, detailed) = summarizer.summarize(&content).await;
                (Some(hash), high_level, detailed)
            }
            None => (
                None,
                NO_README_HIGH_LEVEL.to_string(),
                NO_README_DETAILED.to_string(),
            ),
        };

        let record = Repository {
            repo_id,
            name: repo.name,
            description: repo.description.unwrap_or_default(),
            language: repo.language.unwrap_or_else(|| "Unknown".to_string()),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            updated_at: repo.updated_at,
            url: repo.html_url,
            high_level_summary: high_level,
            detailed_summary: detailed,
            last_synced: Utc::now().timestamp(),
            readme_hash,
        };

        store.put_repo(&record).await?;
        synced_count += 1;
        tracing::info!("Successfully synced {}", record.name);
    }

    Ok(synced_count)
}

fn readme_unchanged(existing: Option<&Value>, hash: &str) -> bool {
    existing
        .and_then(|record| record.get("readme_hash"))
        .and_then(Value::as_str)
        == Some(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unchanged_readme_is_skipped() {
        let hash = content_hash("# My project");
        let existing = json!({"repo_id": "1", "readme_hash": hash});
        assert!(readme_unchanged(Some(&existing), &hash));
    }

    #[test]
    fn changed_or_new_readme_is_not_skipped() {
        let hash = content_hash("# My project v2");

        let existing = json!({"repo_id": "1", "readme_hash": content_hash("# My project")});
        assert!(!readme_unchanged(Some(&existing), &hash));

        // first sync of this repo
        assert!(!readme_unchanged(None, &hash));

        // stored record had no README last time
        let no_readme = json!({"repo_id": "1", "readme_hash": null});
        assert!(!readme_unchanged(Some(&no_readme), &hash));
    }
}
