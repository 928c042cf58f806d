//! Extract command - run field extraction on already-recognized text.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;
use tracing::debug;

use rcpt_core::models::config::RcptConfig;
use rcpt_core::{normalize_lines, DatePolicy, OwnerId, RcptError, ReceiptExtractor};

use super::output::{format_candidate, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Text file, or "-" to read from stdin
    #[arg(required = true)]
    input: PathBuf,

    /// User the transaction would belong to
    #[arg(long, default_value = "local")]
    owner: String,

    /// Reject receipts without a date instead of using today
    #[arg(long)]
    strict: bool,

    /// Processing date used when the receipt has none (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the normalized lines instead of a transaction
    #[arg(long)]
    lines: bool,
}

pub fn run(args: ExtractArgs, config: &RcptConfig) -> anyhow::Result<()> {
    let text = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.input)?
    };

    if args.lines {
        for line in normalize_lines(&text) {
            println!("{}", line);
        }
        return Ok(());
    }

    let mut extractor = ReceiptExtractor::from_config(&config.extraction)?;
    if args.strict {
        extractor = extractor.with_date_policy(DatePolicy::Strict);
    }

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    debug!("Extracting with processing date {}", today);

    let owned = extractor
        .extract_for(OwnerId::new(args.owner), &text, today)
        .map_err(RcptError::from)?;

    println!("{}", format_candidate(&owned, args.format)?);
    Ok(())
}
