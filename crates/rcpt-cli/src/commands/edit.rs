//! Edit command - correct a stored transaction.

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use console::style;
use rust_decimal::Decimal;
use uuid::Uuid;

use rcpt_core::models::config::RcptConfig;
use rcpt_core::models::transaction::{RecurringInterval, TransactionPatch};
use rcpt_core::{JsonFileStore, OwnerId, TransactionStore};

use super::output::{format_stored, OutputFormat};

/// Arguments for the edit command.
#[derive(Args)]
pub struct EditArgs {
    /// Transaction id
    #[arg(required = true)]
    id: Uuid,

    /// User the transaction belongs to
    #[arg(long, required = true)]
    owner: String,

    /// New amount
    #[arg(long)]
    amount: Option<Decimal>,

    /// New category
    #[arg(long)]
    category: Option<String>,

    /// New description
    #[arg(long)]
    description: Option<String>,

    /// New date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Mark as recurring or not
    #[arg(long)]
    recurring: Option<bool>,

    /// Repeat interval of a recurring transaction
    #[arg(long, value_enum)]
    interval: Option<Interval>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Interval {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<Interval> for RecurringInterval {
    fn from(interval: Interval) -> Self {
        match interval {
            Interval::Daily => RecurringInterval::Daily,
            Interval::Weekly => RecurringInterval::Weekly,
            Interval::Monthly => RecurringInterval::Monthly,
            Interval::Yearly => RecurringInterval::Yearly,
        }
    }
}

pub fn run(args: EditArgs, config: &RcptConfig) -> anyhow::Result<()> {
    let patch = TransactionPatch {
        amount: args.amount,
        description: args.description,
        category: args.category,
        date: args.date,
        is_recurring: args.recurring,
        recurring_interval: args.interval.map(RecurringInterval::from),
    };

    let store = JsonFileStore::open(config.storage.transactions_path());
    let updated = store.update(&OwnerId::new(args.owner), args.id, &patch)?;

    eprintln!("{} Updated transaction {}", style("✓").green(), updated.id);
    println!("{}", format_stored(std::slice::from_ref(&updated), args.format)?);
    Ok(())
}
