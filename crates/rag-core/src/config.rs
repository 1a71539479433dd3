//! Configuration types for the RAG pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{RagError, Result};
use crate::types::SourceFields;

/// Placeholder a prompt template must contain.
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// Value shown in place of secrets when printing config.
const REDACTED: &str = "********";

/// Main configuration for the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Elasticsearch connection and query configuration.
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,

    /// Completion endpoint configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Prompt assembly configuration.
    #[serde(default)]
    pub prompt: PromptConfig,
}

/// Elasticsearch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Cluster URL.
    #[serde(default = "default_es_url")]
    pub url: String,

    /// Basic auth user.
    #[serde(default = "default_es_user")]
    pub user: String,

    /// Basic auth password.
    #[serde(default)]
    pub password: String,

    /// Index to search.
    #[serde(default = "default_index")]
    pub index: String,

    /// Deployed text embedding model used to vectorize the question.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Number of parent documents to return.
    #[serde(default = "default_size")]
    pub size: u32,

    /// Number of chunks returned per parent document.
    #[serde(default = "default_inner_hits_size")]
    pub inner_hits_size: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Index name -> source fields holding passage text.
    #[serde(default = "default_source_fields")]
    pub fields: SourceFields,
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: default_es_url(),
            user: default_es_user(),
            password: String::new(),
            index: default_index(),
            model_id: default_model_id(),
            size: 5,
            inner_hits_size: 2,
            timeout_secs: 60,
            fields: default_source_fields(),
        }
    }
}

/// Completion endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API (including `/v1`).
    #[serde(default = "default_llm_url")]
    pub base_url: String,

    /// Bearer token. Local servers accept any value.
    #[serde(default)]
    pub api_key: String,

    /// Model name.
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Sampling temperature (server default when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate (server default when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_url(),
            api_key: String::new(),
            model: default_llm_model(),
            temperature: None,
            max_tokens: None,
            timeout_secs: 60,
        }
    }
}

/// Prompt assembly configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Replacement system prompt; must contain `{context}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Cut the context block down to this many words.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_context_words: Option<usize>,
}

// Default value functions

fn default_es_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_es_user() -> String {
    "elastic".to_string()
}

fn default_index() -> String {
    "search-elastic-labs".to_string()
}

fn default_model_id() -> String {
    "my-e5-model".to_string()
}

fn default_size() -> u32 {
    5
}

fn default_inner_hits_size() -> u32 {
    2
}

fn default_timeout() -> u64 {
    60
}

fn default_source_fields() -> SourceFields {
    SourceFields::new().with("search-elastic-labs", &["semantic_body"])
}

fn default_llm_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_llm_model() -> String {
    "mistral".to_string()
}

impl RagConfig {
    /// Load configuration from file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| RagError::config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from default paths.
    pub fn load_default() -> Result<Self> {
        // Try user config first
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("elasticdocs-rag").join("config.toml");
            if user_config.exists() {
                return Self::load(&user_config);
            }
        }

        // Try local config
        let local_config = PathBuf::from("elasticdocs-rag.toml");
        if local_config.exists() {
            return Self::load(&local_config);
        }

        Ok(Self::default())
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay values from `lookup`, keyed by the deployment's variable names.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let es = &mut self.elasticsearch;
        let llm = &mut self.llm;

        let targets: [(&str, &mut String); 7] = [
            ("local_es_url", &mut es.url),
            ("local_es_user", &mut es.user),
            ("local_es_pwd", &mut es.password),
            ("local_es_index", &mut es.index),
            ("openai_url", &mut llm.base_url),
            ("openai_api_key", &mut llm.api_key),
            ("openai_model", &mut llm.model),
        ];

        for (key, target) in targets {
            if let Some(value) = lookup(key) {
                *target = value;
            }
        }
    }

    /// Check that the configuration can drive a query.
    pub fn validate(&self) -> Result<()> {
        let es = &self.elasticsearch;

        if es.url.trim().is_empty() {
            return Err(RagError::config("elasticsearch.url is empty"));
        }
        if es.index.trim().is_empty() {
            return Err(RagError::config("elasticsearch.index is empty"));
        }
        if es.size == 0 {
            return Err(RagError::config("elasticsearch.size must be at least 1"));
        }
        if !es.fields.contains(&es.index) {
            return Err(RagError::config(format!(
                "elasticsearch.fields has no source field for index '{}'",
                es.index
            )));
        }
        if self.llm.base_url.trim().is_empty() {
            return Err(RagError::config("llm.base_url is empty"));
        }
        if self.llm.model.trim().is_empty() {
            return Err(RagError::config("llm.model is empty"));
        }
        if let Some(template) = &self.prompt.template {
            if !template.contains(CONTEXT_PLACEHOLDER) {
                return Err(RagError::config(format!(
                    "prompt.template must contain {}",
                    CONTEXT_PLACEHOLDER
                )));
            }
        }

        Ok(())
    }

    /// Copy with credentials masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.elasticsearch.password.is_empty() {
            config.elasticsearch.password = REDACTED.to_string();
        }
        if !config.llm.api_key.is_empty() {
            config.llm.api_key = REDACTED.to_string();
        }
        config
    }
}
