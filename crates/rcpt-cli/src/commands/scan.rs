//! Scan command - turn a single receipt into a stored expense.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use rcpt_core::models::config::RcptConfig;
use rcpt_core::{DatePolicy, JsonFileStore, OwnerId, ReceiptExtractor, ScanService};

use super::output::{format_candidate, format_stored, OutputFormat};
use super::{apply_to_budget, FileRecognizer};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Receipt image, or a .txt file with recognized text
    #[arg(required = true)]
    input: PathBuf,

    /// User the expense belongs to
    #[arg(long, required = true)]
    owner: String,

    /// Reject receipts without a date instead of using today
    #[arg(long)]
    strict: bool,

    /// Print the extracted transaction without storing it
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

pub async fn run(args: ScanArgs, config: &RcptConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Scanning receipt: {}", args.input.display());

    let recognizer = FileRecognizer::for_path(&args.input, config, args.model_dir.as_deref())?;
    let mut extractor = ReceiptExtractor::from_config(&config.extraction)?;
    if args.strict {
        extractor = extractor.with_date_policy(DatePolicy::Strict);
    }
    let store = JsonFileStore::open(config.storage.transactions_path());
    let service = ScanService::new(recognizer, store, extractor, &config.ocr);

    let image = fs::read(&args.input)?;
    let owner = OwnerId::new(args.owner);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Scanning receipt...");

    let output = if args.dry_run {
        let result = service.preview(owner, image).await;
        pb.finish_and_clear();
        format_candidate(&result?, args.format)?
    } else {
        let result = service.scan(owner.clone(), image).await;
        pb.finish_and_clear();
        let stored = result?;

        if let Some(total) = apply_to_budget(config, &owner, std::slice::from_ref(&stored))? {
            eprintln!(
                "{} Budget for {} is now {}",
                style("ℹ").blue(),
                owner,
                total
            );
        }
        format_stored(std::slice::from_ref(&stored), args.format)?
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    info!("Scan finished in {:?}", start.elapsed());

    Ok(())
}
