use std::env;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use eora_cli::args::Args;
use eora_cli::bot::run_bot;
use eora_cli::startup::{build_assistant, init_tracing, load_settings, BOT_TOKEN_ENV};
use eora_rag::CitationStyle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let token = env::var(BOT_TOKEN_ENV).with_context(|| format!("{BOT_TOKEN_ENV} must be set to run the bot"))?;
    let settings = load_settings(&args)?;
    let assistant = build_assistant(&settings, CitationStyle::Linked).await?;

    run_bot(token, Arc::new(assistant)).await;
    Ok(())
}
