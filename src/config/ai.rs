// src/config/ai.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const DEFAULT_AI_CONFIG_PATH: &str = "config/ai.json";
pub const ENV_AI_CONFIG_PATH: &str = "AI_CONFIG_PATH";
pub const DEFAULT_SUMMARY_MODEL: &str = "gpt-4o-mini";

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    env::var("SMART_HEADLINES_MODEL").unwrap_or_else(|_| DEFAULT_SUMMARY_MODEL.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiConfig {
    pub enabled: bool,
    /// Only "openai" is wired; anything else disables summarization.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// "ENV" means: read from OPENAI_API_KEY
    #[serde(default)]
    pub api_key: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            model: default_model(),
            api_key: String::new(),
        }
    }
}

impl AiConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: AiConfig = serde_json::from_str(&data)?;

        cfg.provider = cfg.provider.trim().to_lowercase();

        // Resolve api key if "ENV"
        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = match cfg.provider.as_str() {
                "openai" => env::var("OPENAI_API_KEY")
                    .map_err(|_| anyhow::anyhow!("Missing OPENAI_API_KEY env var"))?,
                other => anyhow::bail!("Unsupported provider in config: {other}"),
            };
        }

        Ok(cfg)
    }

    /// No config file: enabled exactly when `OPENAI_API_KEY` is present.
    pub fn from_env() -> Self {
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        Self {
            enabled: !api_key.trim().is_empty(),
            api_key,
            ..Self::default()
        }
    }

    /// `$AI_CONFIG_PATH` or `config/ai.json` when present, env otherwise.
    /// A config file that fails to load disables summarization instead of aborting.
    pub fn load_default() -> Self {
        let path = env::var(ENV_AI_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_AI_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            return Self::from_env();
        }
        match Self::load_from_file(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(%path, error = %e, "ai config unusable; summaries fall back to heuristics");
                Self::default()
            }
        }
    }
}
