use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::text::truncate_chars;

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const CLAUDE_MODEL: &str = "claude-3-5-sonnet-20241022";
const FALLBACK_SUMMARY: &str = "Summary generation failed";
const MAX_INPUT_CHARS: usize = 4000;

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryFields {
    #[serde(default)]
    high_level: String,
    #[serde(default)]
    detailed: String,
}

pub struct Summarizer {
    client: Client,
    api_key: String,
}

impl Summarizer {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self { client, api_key }
    }

    /// Generate a one-sentence and a 2-3 sentence summary of the given text.
    ///
    /// Summarization must never abort a sync run: any failure (network,
    /// non-2xx, malformed JSON, timeout) degrades to a fixed fallback pair.
    pub async fn summarize(&self, text: &str) -> (String, String) {
        match self.request_summaries(text).await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("Error generating summaries: {}", e);
                (FALLBACK_SUMMARY.to_string(), FALLBACK_SUMMARY.to_string())
            }
        }
    }

    async fn request_summaries(&self, text: &str) -> Result<(String, String)> {
        let prompt = format!(
            "Analyze this README and provide two summaries:\n\
             1. A one-sentence high-level summary\n\
             2. A detailed 2-3 sentence technical summary\n\n\
             README:\n{}\n\n\
             Respond in JSON format:\n\
             {{\"high_level\": \"...\", \"detailed\": \"...\"}}\n",
            truncate_chars(text, MAX_INPUT_CHARS)
        );

        let request = MessageRequest {
            model: CLAUDE_MODEL.to_string(),
            max_tokens: 1024,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(CLAUDE_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::Summarization(format!("API error: {}", error_text)));
        }

        let message: MessageResponse = response.json().await?;

        let reply = message
            .content
            .first()
            .and_then(|block| block.text.as_deref())
            .ok_or_else(|| AppError::Summarization("No text in response".to_string()))?;

        let fields: SummaryFields = serde_json::from_str(reply)?;
        Ok((fields.high_level, fields.detailed))
    }
}
