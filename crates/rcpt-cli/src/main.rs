//! CLI application for scanning receipts into expense transactions.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, budget, config, edit, extract, list, scan};

/// Receipt scanner - turn receipt photos into expense transactions
#[derive(Parser)]
#[command(name = "rcpt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory for transactions and budgets (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a single receipt and store the expense
    Scan(scan::ScanArgs),

    /// Scan multiple receipts
    Batch(batch::BatchArgs),

    /// Extract a transaction from already-recognized text
    Extract(extract::ExtractArgs),

    /// List stored transactions
    List(list::ListArgs),

    /// Edit a stored transaction
    Edit(edit::EditArgs),

    /// Manage budget plans
    Budget(budget::BudgetArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    let settings = || commands::load_config(config_path, cli.data_dir.clone());

    match cli.command {
        Commands::Scan(args) => scan::run(args, &settings()?).await,
        Commands::Batch(args) => batch::run(args, &settings()?).await,
        Commands::Extract(args) => extract::run(args, &settings()?),
        Commands::List(args) => list::run(args, &settings()?),
        Commands::Edit(args) => edit::run(args, &settings()?),
        Commands::Budget(args) => budget::run(args, &settings()?),
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
