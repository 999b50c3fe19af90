use anyhow::Result;
use clap::parser::ValueSource;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use pubfetch_parser::SchemaVariant;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod key_file;

#[derive(Parser)]
#[command(
    name = "pubfetch",
    version,
    about = "Search, enrich and export PubMed and PMC records",
    long_about = "Fetches article metadata from NCBI E-utilities, flattens it into records, \
                  attaches impact factors, citation counts and translated abstracts, and \
                  writes XLSX, CSV, TSV, JSON or JSON Lines files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database to query
    #[arg(short, long, default_value = "pubmed", global = true)]
    db: SchemaVariant,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    /// Enable verbose output (same as --log-level debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// API key for NCBI E-utilities (increases rate limit)
    #[arg(short = 'k', long, env = "NCBI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Email for NCBI requests (recommended)
    #[arg(long, env = "NCBI_EMAIL", global = true)]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, env = "NCBI_TOOL", default_value = "pubfetch", global = true)]
    tool: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a database and export enriched records
    Search(Box<commands::search::Search>),
    /// Print AMA, MLA, APA or NLM citations for the given ids
    Cite(commands::cite::Cite),
    /// List the searchable fields of the selected database
    Fields(commands::fields::Fields),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let arg_matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&arg_matches)?;

    // Initialize tracing with indicatif layer for progress bars
    let filter = if cli.verbose {
        "debug"
    } else {
        cli.log_level.filter()
    };

    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    // Keys typed on the command line are checked and remembered; env keys are not written out
    let from_command_line = matches!(
        arg_matches.value_source("api_key"),
        Some(ValueSource::CommandLine)
    );
    let api_key = key_file::resolve_api_key(
        cli.api_key.as_deref(),
        from_command_line,
        key_file::default_path().as_deref(),
        &commands::client_config(cli.email.as_deref(), &cli.tool),
    )
    .await;

    let api_key = api_key.as_deref();
    let email = cli.email.as_deref();
    let tool = &cli.tool;

    match &cli.command {
        Commands::Search(cmd) => cmd.execute_with_config(cli.db, api_key, email, tool).await,
        Commands::Cite(cmd) => cmd.execute_with_config(cli.db, api_key, email, tool).await,
        Commands::Fields(cmd) => cmd.execute_with_config(cli.db, api_key, email, tool).await,
    }
}
