use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{http_client, success_body};
use crate::error::AdjudicationError;
use crate::Adjudicator;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI chat completions
pub struct OpenAiAdjudicator {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    name: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

impl OpenAiAdjudicator {
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
            name: format!("openai/{}", model),
            model,
        }
    }

    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0,
            "response_format": {"type": "json_object"},
        })
    }

    pub fn extract_text(body: &str) -> Result<String, AdjudicationError> {
        let parsed: ChatResponse =
            serde_json::from_str(body).map_err(|e| AdjudicationError::Malformed(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AdjudicationError::Malformed("no completion content".to_string()))
    }
}

#[async_trait]
impl Adjudicator for OpenAiAdjudicator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str) -> Result<String, AdjudicationError> {
        debug!(model = %self.model, "Requesting chat completion");
        let resp = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        Self::extract_text(&success_body(resp).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjudicator() -> OpenAiAdjudicator {
        OpenAiAdjudicator::new(
            "https://api.openai.com/",
            "sk-test",
            DEFAULT_MODEL,
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_request_body() {
        let body = adjudicator().request_body("Grade this");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["content"], "Grade this");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(adjudicator().name(), "openai/gpt-4o-mini");
    }

    #[test]
    fn test_extract_text() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{\"severity\":\"Low\",\"suggestion\":\"ok\"}"}}]}"#;
        let text = OpenAiAdjudicator::extract_text(body).unwrap();
        assert!(text.contains("\"severity\""));

        assert!(OpenAiAdjudicator::extract_text(r#"{"choices":[]}"#).is_err());
        assert!(OpenAiAdjudicator::extract_text("<html>").is_err());
    }
}
