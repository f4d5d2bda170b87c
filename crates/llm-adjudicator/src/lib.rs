//! Generative-model adjudication of rule findings
//!
//! A provider is chosen once from configuration and handed around as
//! `Arc<dyn Adjudicator>`. Every provider answers the same prompt with a
//! JSON object `{"severity": ..., "suggestion": ...}`.

pub mod config;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod providers;

pub use config::{build_adjudicator, LlmConfig, ProviderKind};
pub use error::AdjudicationError;
pub use parse::{parse_judgment, Judgment};
pub use prompt::{build_prompt, PromptInput};
pub use providers::{GeminiAdjudicator, OpenAiAdjudicator};

use async_trait::async_trait;

#[async_trait]
pub trait Adjudicator: Send + Sync {
    /// Provider and model, for logs
    fn name(&self) -> &str;

    /// Raw completion text for `prompt`
    async fn complete(&self, prompt: &str) -> Result<String, AdjudicationError>;

    async fn adjudicate(&self, prompt: &str) -> Result<Judgment, AdjudicationError> {
        let text = self.complete(prompt).await?;
        parse_judgment(&text)
    }
}
