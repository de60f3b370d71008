use serde::{Deserialize, Serialize};

/// Status of the most recent sync run for one service. A single row per
/// service, overwritten on every run; history is not retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRun {
    pub service_name: String,
    pub last_sync_time: i64,
    pub last_sync_status: String,
    pub items_synced: i64,
    /// Present only when the run failed; omitted entirely on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
