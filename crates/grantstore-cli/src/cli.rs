use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "grantstore")]
#[command(about = "Inspect and maintain persisted OAuth grants")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file (default: grantstore.toml)
    #[arg(short, long, global = true, env = "GRANTSTORE_CONFIG")]
    pub config: Option<String>,

    /// Log level (overrides logging.level from config)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the grant stored under a key
    Get(KeyArgs),
    /// List every grant of a subject
    List(ListArgs),
    /// Remove the grant stored under a key
    Remove(KeyArgs),
    /// Remove all grants of a subject for a client
    RemoveAll(RemoveAllArgs),
    /// Remove grants whose expiration has passed
    PurgeExpired(PurgeArgs),
    /// Create the grants table if it does not exist
    InitSchema,
}

#[derive(Args)]
pub struct KeyArgs {
    /// Grant key
    pub key: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Subject identifier
    pub subject: String,
}

#[derive(Args)]
pub struct RemoveAllArgs {
    /// Subject identifier
    pub subject: String,

    /// Client identifier
    pub client: String,

    /// Only remove grants of this type (e.g. refresh_token)
    #[arg(long = "type")]
    pub grant_type: Option<String>,
}

#[derive(Args)]
pub struct PurgeArgs {
    /// Keep running and purge every N seconds until interrupted
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub every: Option<u64>,
}
