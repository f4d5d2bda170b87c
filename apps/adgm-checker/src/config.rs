//! Checker configuration
//!
//! Loaded from an optional TOML file, then overridden from the environment.
//! Every field has a default, so an empty file is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use corpus_core::{EmbedderKind, EmbeddingConfig, RetrievalConfig};
use llm_adjudicator::{LlmConfig, ProviderKind};
use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "adgm-checker.toml";
pub const DEFAULT_INDEX_PATH: &str = "reference_index.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckerConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Reference index file; unset means `reference_index.json` if it exists
    #[serde(default)]
    pub index_path: Option<PathBuf>,
    /// Sources read by `ingest` when no directory is given
    #[serde(default = "default_reference_dir")]
    pub reference_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            index_path: None,
            reference_dir: default_reference_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_reference_dir() -> PathBuf {
    PathBuf::from("data_sources")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_max_parallel_documents")]
    pub max_parallel_documents: usize,
    /// Upper bound for one document's analysis
    #[serde(default = "default_document_timeout_secs")]
    pub document_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_parallel_documents: default_max_parallel_documents(),
            document_timeout_secs: default_document_timeout_secs(),
        }
    }
}

fn default_max_parallel_documents() -> usize {
    4
}

fn default_document_timeout_secs() -> u64 {
    300
}

impl RuntimeConfig {
    pub fn document_timeout(&self) -> Duration {
        Duration::from_secs(self.document_timeout_secs)
    }
}

impl CheckerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// File (explicit, or the default file when present) plus process environment
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(value) = lookup("LLM_PROVIDER") {
            self.llm.provider = value.parse::<ProviderKind>().map_err(|e| anyhow!(e))?;
        }
        if let Some(value) = lookup("ADGM_EMBEDDER") {
            self.embeddings.provider = value.parse::<EmbedderKind>().map_err(|e| anyhow!(e))?;
        }
        if let Some(value) = lookup("ADGM_INDEX_PATH").filter(|v| !v.is_empty()) {
            self.paths.index_path = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("ADGM_OUTPUT_DIR").filter(|v| !v.is_empty()) {
            self.paths.output_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("ADGM_REFERENCE_DIR").filter(|v| !v.is_empty()) {
            self.paths.reference_dir = PathBuf::from(value);
        }
        Ok(())
    }

    /// Where `ingest` writes the index
    pub fn index_write_path(&self) -> PathBuf {
        self.paths
            .index_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_PATH))
    }

    /// Directory `ingest` reads from: the argument, else `paths.reference_dir`
    pub fn reference_dir(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.paths.reference_dir.clone())
    }

    /// Index used by `analyze`; `None` runs without retrieval
    pub fn index_read_path(&self) -> Option<PathBuf> {
        match &self.paths.index_path {
            Some(path) => Some(path.clone()),
            None => Some(PathBuf::from(DEFAULT_INDEX_PATH)).filter(|p| p.is_file()),
        }
    }
}

/// Provider API keys, kept out of the serialisable config
#[derive(Clone, Default)]
pub struct Secrets {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            openai_api_key: lookup("OPENAI_API_KEY"),
            gemini_api_key: lookup("GEMINI_API_KEY"),
        }
    }

    pub fn for_provider(&self, provider: ProviderKind) -> Option<&str> {
        match provider {
            ProviderKind::OpenAi => self.openai_api_key.as_deref(),
            ProviderKind::Gemini => self.gemini_api_key.as_deref(),
            ProviderKind::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CheckerConfig::from_toml("").unwrap();
        assert_eq!(config, CheckerConfig::default());
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.runtime.max_parallel_documents, 4);
        assert_eq!(config.llm.provider, ProviderKind::OpenAi);
        assert_eq!(config.embeddings.provider, EmbedderKind::Hashing);
    }

    #[test]
    fn test_parse_sections() {
        let config = CheckerConfig::from_toml(
            r#"
            [paths]
            output_dir = "out"
            index_path = "idx/reference.json"

            [retrieval]
            top_k = 5
            chunk_size = 800

            [llm]
            provider = "gemini"
            timeout_secs = 10

            [embeddings]
            provider = "openai"
            model = "text-embedding-3-large"
            dimension = 3072

            [runtime]
            max_parallel_documents = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.output_dir, PathBuf::from("out"));
        assert_eq!(config.index_read_path(), Some(PathBuf::from("idx/reference.json")));
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.chunk_overlap, 200);
        assert_eq!(config.llm.provider, ProviderKind::Gemini);
        assert_eq!(config.llm.timeout_secs, 10);
        assert_eq!(config.embeddings.dimension, 3072);
        assert_eq!(config.runtime.max_parallel_documents, 2);
        assert_eq!(config.runtime.document_timeout_secs, 300);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(CheckerConfig::from_toml("[runtime]\nmax_parallel_documents = \"many\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("LLM_PROVIDER", "none"),
            ("ADGM_EMBEDDER", "openai"),
            ("ADGM_INDEX_PATH", "/tmp/index.json"),
            ("ADGM_OUTPUT_DIR", "/tmp/out"),
            ("ADGM_REFERENCE_DIR", "/srv/adgm/refs"),
        ]
        .into_iter()
        .collect();

        let mut config = CheckerConfig::default();
        config
            .apply_env(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.llm.provider, ProviderKind::None);
        assert_eq!(config.embeddings.provider, EmbedderKind::OpenAi);
        assert_eq!(config.index_write_path(), PathBuf::from("/tmp/index.json"));
        assert_eq!(config.paths.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.reference_dir(None), PathBuf::from("/srv/adgm/refs"));
    }

    #[test]
    fn test_ingest_dir_falls_back_to_reference_dir() {
        let config = CheckerConfig::default();
        assert_eq!(config.reference_dir(None), PathBuf::from("data_sources"));
        assert_eq!(config.reference_dir(Some(Path::new("refs"))), PathBuf::from("refs"));

        let config =
            CheckerConfig::from_toml("[paths]\nreference_dir = \"adgm/guidance\"").unwrap();
        assert_eq!(config.reference_dir(None), PathBuf::from("adgm/guidance"));
    }

    #[test]
    fn test_bad_provider_in_env() {
        let mut config = CheckerConfig::default();
        let result =
            config.apply_env(|name| (name == "LLM_PROVIDER").then(|| "claude".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_secrets_by_provider() {
        let secrets = Secrets::from_lookup(|name| match name {
            "OPENAI_API_KEY" => Some("sk".to_string()),
            _ => None,
        });
        assert_eq!(secrets.for_provider(ProviderKind::OpenAi), Some("sk"));
        assert_eq!(secrets.for_provider(ProviderKind::Gemini), None);
        assert_eq!(secrets.for_provider(ProviderKind::None), None);
    }
}
