//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (nested keys split on `__`, e.g.
//! `APP_CORPUS__INDEX_DIR`). The environment comes from `RUST_ENV` and
//! defaults to `dev`.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::links::default_links;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub corpus: CorpusSettings,
    pub llm: LlmSettings,
    pub embedding: EmbeddingSettings,
    pub retrieval: RetrievalSettings,
    pub extract: ExtractSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.corpus.collection.trim().is_empty() {
            return Err(Error::InvalidConfig("corpus.collection must not be empty".to_string()));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be at least 1".to_string()));
        }
        if self.embedding.max_len == 0 {
            return Err(Error::InvalidConfig("embedding.max_len must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSettings {
    pub index_dir: String,
    pub collection: String,
    pub cache_path: String,
    pub links: Vec<String>,
}

impl CorpusSettings {
    pub fn index_dir(&self) -> PathBuf { expand_path(&self.index_dir) }
    pub fn cache_path(&self) -> PathBuf { expand_path(&self.cache_path) }
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            index_dir: "./data/index".to_string(),
            collection: "eora_data".to_string(),
            cache_path: "data.json".to_string(),
            links: default_links(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    pub auth_url: String,
    pub chat_url: String,
    pub scope: String,
    /// Fixed `RqUID` header sent with every token request.
    pub rq_uid: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub repetition_penalty: f32,
    pub accept_invalid_certs: bool,
    pub timeout_secs: Option<u64>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            auth_url: "https://ngw.devices.sberbank.ru:9443/api/v2/oauth".to_string(),
            chat_url: "https://gigachat.devices.sberbank.ru/api/v1/chat/completions".to_string(),
            scope: "GIGACHAT_API_PERS".to_string(),
            rq_uid: "b83117f0-5720-46ae-8ce1-3b61bef06b1d".to_string(),
            model: "GigaChat-2-Pro".to_string(),
            temperature: 1.0,
            top_p: 0.1,
            max_tokens: 512,
            repetition_penalty: 1.0,
            accept_invalid_certs: false,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Directory holding `tokenizer.json`, `config.json` and the weights.
    pub model_dir: Option<String>,
    pub max_len: usize,
    /// Use the deterministic hashing embedder instead of loading a model.
    pub fake: bool,
    pub fake_dim: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { model_dir: None, max_len: 256, fake: false, fake_dim: 1024 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self { Self { top_k: 5 } }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractSettings {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_files() {
        figment::Jail::expect_with(|_jail| {
            let settings = Config::load_for_env("dev").expect("config").settings().expect("settings");
            assert_eq!(settings.corpus.collection, "eora_data");
            assert_eq!(settings.retrieval.top_k, 5);
            assert_eq!(settings.llm.max_tokens, 512);
            assert!(!settings.corpus.links.is_empty());
            Ok(())
        });
    }

    #[test]
    fn env_overlay_and_env_vars_override_base_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[corpus]\ncollection = \"base\"\nlinks = [\"https://a\"]\n")?;
            jail.create_file("config.prod.toml", "[corpus]\ncollection = \"prod\"\n")?;
            jail.set_env("APP_RETRIEVAL__TOP_K", "3");
            let config = Config::load_for_env("prod").expect("config");
            let settings = config.settings().expect("settings");
            assert_eq!(settings.corpus.collection, "prod");
            assert_eq!(settings.corpus.links, vec!["https://a".to_string()]);
            assert_eq!(settings.retrieval.top_k, 3);
            assert_eq!(settings.llm.model, "GigaChat-2-Pro");
            Ok(())
        });
    }

    #[test]
    fn zero_top_k_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[retrieval]\ntop_k = 0\n")?;
            assert!(matches!(Config::load_for_env("dev"), Err(Error::InvalidConfig(_))));
            Ok(())
        });
    }
}
