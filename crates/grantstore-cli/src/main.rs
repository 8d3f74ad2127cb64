mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use grantstore::config::loader::load_settings;
use grantstore::observability::init_tracing_with_level;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env so GRANTSTORE__* overrides can live next to the binary
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();

    let settings = load_settings(cli.config.as_deref())?;
    let level = cli.log_level.as_deref().unwrap_or(&settings.logging.level);
    init_tracing_with_level(level);

    let store = grantstore_postgres::connect(&settings.oauth.token_store).await?;

    match &cli.command {
        Commands::Get(args) => commands::get(&store, &args.key, format).await?,
        Commands::List(args) => commands::list(&store, &args.subject, format).await?,
        Commands::Remove(args) => commands::remove(&store, &args.key).await?,
        Commands::RemoveAll(args) => commands::remove_all(&store, args).await?,
        Commands::PurgeExpired(args) => commands::purge_expired(&store, args.every).await?,
        Commands::InitSchema => commands::init_schema(&store).await?,
    }

    Ok(())
}
