//! Batch scanning command for multiple receipt files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use rcpt_core::models::config::RcptConfig;
use rcpt_core::{
    DatePolicy, JsonFileStore, OwnerId, PlainTextRecognizer, ReceiptExtractor, ScanService,
    StoredTransaction,
};

use super::{apply_to_budget, extension_of, load_ocr, FileRecognizer, IMAGE_EXTENSIONS, TEXT_EXTENSIONS};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// User the expenses belong to
    #[arg(long, required = true)]
    owner: String,

    /// Reject receipts without a date instead of using today
    #[arg(long)]
    strict: bool,

    /// Write a summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of scanning a single file.
struct ScanResult {
    path: PathBuf,
    stored: Option<StoredTransaction>,
    error: Option<String>,
    processing_time_ms: u64,
}

type Service = ScanService<FileRecognizer, JsonFileStore>;

pub async fn run(args: BatchArgs, config: &RcptConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = extension_of(p);
            IMAGE_EXTENSIONS.contains(&ext.as_str()) || TEXT_EXTENSIONS.contains(&ext.as_str())
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to scan",
        style("ℹ").blue(),
        files.len()
    );

    let text_service = service(FileRecognizer::Text(PlainTextRecognizer::new()), &args, config)?;
    let needs_ocr = files
        .iter()
        .any(|p| IMAGE_EXTENSIONS.contains(&extension_of(p).as_str()));
    let ocr_service = if needs_ocr {
        let ocr = load_ocr(config, args.model_dir.as_deref())?;
        Some(service(FileRecognizer::Ocr(ocr), &args, config)?)
    } else {
        None
    };

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let owner = OwnerId::new(args.owner.clone());
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let service = if TEXT_EXTENSIONS.contains(&extension_of(&path).as_str()) {
            Some(&text_service)
        } else {
            ocr_service.as_ref()
        };

        let result = match service {
            Some(service) => scan_file(service, &owner, &path).await,
            None => Err(anyhow::anyhow!("OCR engine not loaded")),
        };
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(stored) => results.push(ScanResult {
                path,
                stored: Some(stored),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to scan {}: {}", path.display(), error_msg);
                    results.push(ScanResult {
                        path,
                        stored: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to scan {}: {}", path.display(), error_msg);
                    pb.abandon();
                    let stored: Vec<StoredTransaction> =
                        results.into_iter().filter_map(|r| r.stored).collect();
                    apply_to_budget(config, &owner, &stored)?;
                    anyhow::bail!("Scanning {} failed: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let stored: Vec<StoredTransaction> = results
        .iter()
        .filter_map(|r| r.stored.clone())
        .collect();
    let budget_total = apply_to_budget(config, &owner, &stored)?;

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Scanned {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} stored, {} failed",
        style(stored.len()).green(),
        style(failed.len()).red()
    );
    if let Some(total) = budget_total {
        println!("   budget for {} is now {}", owner, total);
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn service(recognizer: FileRecognizer, args: &BatchArgs, config: &RcptConfig) -> anyhow::Result<Service> {
    let mut extractor = ReceiptExtractor::from_config(&config.extraction)?;
    if args.strict {
        extractor = extractor.with_date_policy(DatePolicy::Strict);
    }
    let store = JsonFileStore::open(config.storage.transactions_path());
    Ok(ScanService::new(recognizer, store, extractor, &config.ocr))
}

async fn scan_file(service: &Service, owner: &OwnerId, path: &Path) -> anyhow::Result<StoredTransaction> {
    let image = fs::read(path)?;
    Ok(service.scan(owner.clone(), image).await?)
}

fn write_summary(path: &Path, results: &[ScanResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "id",
        "date",
        "amount",
        "description",
        "category",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(stored) = &result.stored {
            wtr.write_record([
                filename,
                "success",
                &stored.id.to_string(),
                &stored.record.date.to_string(),
                &stored.record.amount.to_string(),
                &stored.record.description,
                &stored.record.category,
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
