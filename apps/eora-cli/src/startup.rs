use std::env;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use eora_core::config::{Config, Settings};
use eora_core::traits::{Embedder, LlmClient};
use eora_embed::load_embedder;
use eora_extract::LlmPageExtractor;
use eora_llm::GigaChatClient;
use eora_rag::{Assistant, CitationStyle, CorpusBuilder};

use crate::args::Args;

pub const SECRET_ENV: &str = "GIGACHAT_CLIENT_SECRET";
pub const BOT_TOKEN_ENV: &str = "BOT_TOKEN";

/// Logs go to stderr so they never interleave with answers on stdout.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lance=warn,lancedb=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

pub fn load_settings(args: &Args) -> anyhow::Result<Settings> {
    let config = match &args.env {
        Some(env_name) => Config::load_for_env(env_name),
        None => Config::load(),
    }
    .context("loading configuration")?;
    let mut settings = config.settings()?;
    if let Some(dir) = &args.index_dir {
        settings.corpus.index_dir = dir.clone();
    }
    if let Some(path) = &args.cache_path {
        settings.corpus.cache_path = path.clone();
    }
    Ok(settings)
}

/// Client secret for the LLM service. A missing value is not fatal here;
/// the token request fails later with an authentication error.
pub fn client_secret() -> String {
    env::var(SECRET_ENV).unwrap_or_else(|_| {
        warn!("{SECRET_ENV} is not set; LLM requests will be rejected");
        String::new()
    })
}

/// Wires the LLM client, embedder and extractor, builds or opens the index,
/// and returns the assistant that serves questions.
pub async fn build_assistant(settings: &Settings, style: CitationStyle) -> anyhow::Result<Assistant> {
    let secret = client_secret();
    let llm: Arc<dyn LlmClient> = Arc::new(GigaChatClient::new(&settings.llm)?);
    let embedder: Arc<dyn Embedder> = Arc::from(load_embedder(&settings.embedding)?);
    let extractor = Arc::new(LlmPageExtractor::new(&settings.extract, llm.clone(), secret.clone())?);

    let index = CorpusBuilder::new(extractor, embedder)
        .initialize(&settings.corpus, &settings.corpus.links)
        .await
        .context("initializing the case-study index")?;
    info!(collection = %settings.corpus.collection, "index ready");

    Ok(Assistant::new(Arc::new(index), llm, secret)
        .with_style(style)
        .with_top_k(settings.retrieval.top_k))
}
