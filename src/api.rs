use std::collections::HashMap;

use serde_json::{json, Value};

use crate::db::RecordStore;
use crate::error::Result;

const JSON_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
];

/// An HTTP-shaped response handed back to whatever trigger layer invoked us.
#[derive(Debug)]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: [(&'static str, &'static str); 2],
    pub body: String,
}

impl ApiResponse {
    fn json(status_code: u16, body: &Value) -> Self {
        Self {
            status_code,
            headers: JSON_HEADERS,
            body: body.to_string(),
        }
    }
}

/// Map a raw (method, path) pair onto a route key and its path parameters.
pub fn route_request(method: &str, path: &str) -> (String, HashMap<String, String>) {
    let mut params = HashMap::new();

    if method == "GET" {
        if let Some(id) = path.strip_prefix("/api/repos/") {
            if !id.is_empty() && !id.contains('/') {
                params.insert("id".to_string(), id.to_string());
                return ("GET /api/repos/{id}".to_string(), params);
            }
        }
    }

    (format!("{} {}", method, path), params)
}

/// Single dispatch point for the read-only query API. Unknown routes are a
/// 404; any error below this boundary becomes a 500 with the error message
/// in the body.
pub async fn handle_request(
    store: &RecordStore,
    route_key: &str,
    path_params: &HashMap<String, String>,
) -> ApiResponse {
    let result = match route_key {
        "GET /api/repos" => get_all_repos(store).await,
        "GET /api/repos/{id}" => {
            let id = path_params.get("id").map(String::as_str).unwrap_or_default();
            get_repo(store, id).await
        }
        "GET /api/posts" => get_all_posts(store).await,
        "GET /api/videos" => get_all_videos(store).await,
        _ => return ApiResponse::json(404, &json!({"error": "Not found"})),
    };

    result.unwrap_or_else(|e| {
        tracing::error!("Error handling {}: {}", route_key, e);
        ApiResponse::json(500, &json!({"error": e.to_string()}))
    })
}

async fn get_all_repos(store: &RecordStore) -> Result<ApiResponse> {
    let mut repos = store.list_repos().await?;
    // stable sort: equal star counts keep their scan order
    repos.sort_by(|a, b| number_field(b, "stars").total_cmp(&number_field(a, "stars")));
    Ok(ApiResponse::json(200, &normalize_numbers(Value::Array(repos))))
}

async fn get_repo(store: &RecordStore, repo_id: &str) -> Result<ApiResponse> {
    match store.get_repo(repo_id).await? {
        Some(repo) => Ok(ApiResponse::json(200, &normalize_numbers(repo))),
        None => Ok(ApiResponse::json(
            404,
            &json!({"error": "Repository not found"}),
        )),
    }
}

async fn get_all_posts(store: &RecordStore) -> Result<ApiResponse> {
    let mut posts = store.list_posts().await?;
    posts.sort_by(|a, b| text_field(b, "published_date").cmp(text_field(a, "published_date")));
    Ok(ApiResponse::json(200, &normalize_numbers(Value::Array(posts))))
}

async fn get_all_videos(store: &RecordStore) -> Result<ApiResponse> {
    let mut videos = store.list_videos().await?;
    videos.sort_by(|a, b| text_field(b, "published_date").cmp(text_field(a, "published_date")));
    Ok(ApiResponse::json(200, &normalize_numbers(Value::Array(videos))))
}

fn number_field(record: &Value, field: &str) -> f64 {
    record.get(field).and_then(Value::as_f64).unwrap_or(0.0)
}

fn text_field<'a>(record: &'a Value, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or("")
}

/// Render whole-valued floats as integers, recursively. Documents written by
/// other tooling may carry `5.0` where we expect `5`; responses keep the
/// historical integer rendering.
fn normalize_numbers(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_numbers(v)))
                .collect(),
        ),
        Value::Number(n) => {
            if n.as_i64().is_none() && n.as_u64().is_none() {
                if let Some(f) = n.as_f64() {
                    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                        return Value::Number((f as i64).into());
                    }
                }
            }
            Value::Number(n)
        }
        other => other,
    }
}
