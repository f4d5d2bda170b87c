use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{http_client, success_body};
use crate::error::AdjudicationError;
use crate::Adjudicator;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Gemini `generateContent`
pub struct GeminiAdjudicator {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    name: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GeminiAdjudicator {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let model = model.into();
        Self {
            http: http_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            name: format!("gemini/{}", model),
            model,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": 0,
                "responseMimeType": "application/json",
            },
        })
    }

    /// Concatenated text parts of the first candidate
    pub fn extract_text(body: &str) -> Result<String, AdjudicationError> {
        let parsed: GenerateResponse =
            serde_json::from_str(body).map_err(|e| AdjudicationError::Malformed(e.to_string()))?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AdjudicationError::Malformed("no candidates".to_string()))?;

        let text: String = candidate.content.parts.into_iter().map(|p| p.text).collect();
        if text.trim().is_empty() {
            return Err(AdjudicationError::Malformed("empty candidate".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl Adjudicator for GeminiAdjudicator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str) -> Result<String, AdjudicationError> {
        debug!(model = %self.model, "Requesting generateContent");
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        Self::extract_text(&success_body(resp).await?)
    }
}
