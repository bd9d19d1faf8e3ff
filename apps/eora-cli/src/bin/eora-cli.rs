use clap::Parser;

use eora_cli::args::Args;
use eora_cli::repl::run_repl;
use eora_cli::startup::{build_assistant, init_tracing, load_settings};
use eora_rag::CitationStyle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let settings = load_settings(&args)?;
    let assistant = build_assistant(&settings, CitationStyle::Numbered).await?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_repl(stdin.lock(), stdout.lock(), &assistant).await
}
