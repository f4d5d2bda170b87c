use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AdjudicationError;
use crate::providers::{gemini, openai, GeminiAdjudicator, OpenAiAdjudicator};
use crate::Adjudicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Gemini,
    /// Adjudication disabled; findings keep rule-engine defaults
    None,
}

impl ProviderKind {
    /// Environment variable holding the provider's key
    pub fn key_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Gemini => Some("GEMINI_API_KEY"),
            ProviderKind::None => None,
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            "none" | "off" | "" => Ok(ProviderKind::None),
            other => Err(format!("unsupported LLM provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    /// Provider default when unset
    pub model: Option<String>,
    pub timeout_secs: u64,
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            model: None,
            timeout_secs: 30,
            base_url: None,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Select the adjudicator once from configuration; `Ok(None)` when disabled
pub fn build_adjudicator(
    config: &LlmConfig,
    api_key: Option<&str>,
) -> Result<Option<Arc<dyn Adjudicator>>, AdjudicationError> {
    let Some(key_var) = config.provider.key_var() else {
        return Ok(None);
    };
    let key = api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or(AdjudicationError::MissingCredentials(key_var))?;

    let adjudicator: Arc<dyn Adjudicator> = match config.provider {
        ProviderKind::OpenAi => Arc::new(OpenAiAdjudicator::new(
            config.base_url.as_deref().unwrap_or(openai::DEFAULT_BASE_URL),
            key,
            config
                .model
                .clone()
                .unwrap_or_else(|| openai::DEFAULT_MODEL.to_string()),
            config.timeout(),
        )),
        ProviderKind::Gemini => Arc::new(GeminiAdjudicator::new(
            config.base_url.as_deref().unwrap_or(gemini::DEFAULT_BASE_URL),
            key,
            config
                .model
                .clone()
                .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string()),
            config.timeout(),
        )),
        ProviderKind::None => return Ok(None),
    };
    Ok(Some(adjudicator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_provider() {
        let config = LlmConfig {
            provider: ProviderKind::None,
            ..Default::default()
        };
        assert!(build_adjudicator(&config, None).unwrap().is_none());
    }

    #[test]
    fn test_missing_key() {
        let result = build_adjudicator(&LlmConfig::default(), Some(" "));
        assert!(matches!(
            result,
            Err(AdjudicationError::MissingCredentials("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn test_provider_defaults() {
        let openai = build_adjudicator(&LlmConfig::default(), Some("sk")).unwrap().unwrap();
        assert_eq!(openai.name(), "openai/gpt-4o-mini");

        let config = LlmConfig {
            provider: ProviderKind::Gemini,
            model: Some("gemini-2.0-flash".to_string()),
            ..Default::default()
        };
        let gemini = build_adjudicator(&config, Some("key")).unwrap().unwrap();
        assert_eq!(gemini.name(), "gemini/gemini-2.0-flash");
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("Gemini".parse::<ProviderKind>(), Ok(ProviderKind::Gemini));
        assert_eq!("none".parse::<ProviderKind>(), Ok(ProviderKind::None));
        assert!("claude".parse::<ProviderKind>().is_err());
    }
}
