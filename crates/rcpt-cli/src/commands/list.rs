//! List command - show stored transactions of one owner.

use clap::Args;
use console::style;

use rcpt_core::models::config::RcptConfig;
use rcpt_core::{JsonFileStore, OwnerId, TransactionStore};

use super::output::{format_stored, OutputFormat};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// User whose transactions are listed
    #[arg(long, required = true)]
    owner: String,

    /// Only show this category
    #[arg(long)]
    category: Option<String>,

    /// Show at most this many transactions
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: ListArgs, config: &RcptConfig) -> anyhow::Result<()> {
    let store = JsonFileStore::open(config.storage.transactions_path());
    let mut transactions = store.list(&OwnerId::new(args.owner.as_str()))?;

    if let Some(category) = &args.category {
        transactions.retain(|t| t.record.category.eq_ignore_ascii_case(category));
    }
    if let Some(limit) = args.limit {
        transactions.truncate(limit);
    }

    if transactions.is_empty() {
        println!(
            "{} No transactions found for {}",
            style("ℹ").blue(),
            args.owner
        );
        return Ok(());
    }

    println!("{}", format_stored(&transactions, args.format)?);
    Ok(())
}
