//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env
//! vars, then extracts one typed [`AppConfig`] that is passed by reference to
//! everything that needs it. Nothing reads configuration through global
//! state after startup.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        // APP_LLM__MODEL=... maps to llm.model; double underscore separates
        // sections from keys so key names may themselves contain underscores.
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }
}

/// Typed view over the merged configuration, with defaults for every key.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_model_dir")]
    pub model_dir: String,
    #[serde(default = "default_dim")]
    pub dim: usize,
    #[serde(default = "default_max_len")]
    pub max_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_docs_dir() -> String {
    "data".to_string()
}
fn default_model_dir() -> String {
    "models/bge-m3".to_string()
}
fn default_dim() -> usize {
    1024
}
fn default_max_len() -> usize {
    256
}
fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "llama3.1:8b".to_string()
}
fn default_timeout() -> u64 {
    120
}
fn default_top_k() -> usize {
    4
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { docs_dir: default_docs_dir() }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { model_dir: default_model_dir(), dim: default_dim(), max_len: default_max_len() }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            request_timeout_secs: default_timeout(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: default_top_k() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            embedding: EmbeddingConfig::default(),
            llm: LlmConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl AppConfig {
    /// Merge config files and `APP_*` env vars into one typed structure.
    pub fn load() -> anyhow::Result<Self> {
        let config = Config::load()?;
        config
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
    }

    pub fn docs_dir(&self) -> PathBuf {
        expand_path(&self.data.docs_dir)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.data.docs_dir, "data");
        assert_eq!(cfg.embedding.dim, 1024);
        assert_eq!(cfg.embedding.max_len, 256);
        assert_eq!(cfg.llm.base_url, "http://localhost:11434");
        assert_eq!(cfg.llm.request_timeout_secs, 120);
        assert_eq!(cfg.retrieval.top_k, 4);
    }

    #[test]
    fn expand_path_leaves_plain_paths_alone() {
        assert_eq!(expand_path("data/docs"), PathBuf::from("data/docs"));
    }

    #[test]
    fn resolve_with_base_joins_relative() {
        let base = Path::new("/srv/app");
        assert_eq!(resolve_with_base(base, "data"), PathBuf::from("/srv/app/data"));
        assert_eq!(resolve_with_base(base, "/abs"), PathBuf::from("/abs"));
    }
}
