use clap::Parser;

/// Overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default, Parser)]
#[command(version, about = "Answers questions about EORA case studies")]
pub struct Args {
    /// Configuration environment (`config.<env>.toml`); defaults to `RUST_ENV` or `dev`.
    #[arg(long, env = "RUST_ENV")]
    pub env: Option<String>,

    /// Directory of the persistent vector index.
    #[arg(long)]
    pub index_dir: Option<String>,

    /// JSON cache of extracted pages.
    #[arg(long)]
    pub cache_path: Option<String>,
}
