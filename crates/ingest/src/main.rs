use clap::Parser;
use ingest::conf::{load::verbose_from_env, Cli};
use ingest::runtime::boot;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    boot::init_logging(cli.verbose || verbose_from_env());
    let (state, config) = boot::boot(&cli).await?;
    ingest::runtime::ingest::ingest(state, config).await
}
