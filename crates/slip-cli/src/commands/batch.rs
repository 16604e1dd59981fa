//! Batch processing command for multiple OCR results.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use slip_core::{Catalog, ParsedSlip, SlipParser};

use super::parse::{format_slip, OutputFormat};
use super::{load_catalog, load_config, read_ocr_input};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Treat inputs as raw Google Vision responses
    #[arg(long)]
    vision: bool,

    /// Custom products JSON merged into the catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Date treated as today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    today: Option<NaiveDate>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    slip: Option<ParsedSlip>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "json" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let catalog = load_catalog(&config, args.catalog.as_deref())?;
    let mut parser = SlipParser::from_config(&config);
    if let Some(today) = args.today {
        parser = parser.with_reference_date(today);
    }

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &parser, &catalog, args.vision);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(slip) => {
                results.push(ProcessResult {
                    path,
                    slip: Some(slip),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        slip: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    progress.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        progress.inc(1);
    }

    progress.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.slip.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let threshold = config.review.review_threshold;

    for result in &successful {
        if let (Some(slip), Some(output_dir)) = (&result.slip, &args.output_dir) {
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("slip");

            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));
            fs::write(&output_path, format_slip(slip, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results, threshold)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    let to_review: Vec<_> = successful
        .iter()
        .filter(|r| r.slip.as_ref().is_some_and(|s| s.needs_review(threshold)))
        .collect();
    if !to_review.is_empty() {
        println!();
        println!("{}", style("Needs review:").yellow());
        for result in &to_review {
            if let Some(slip) = &result.slip {
                println!("  - {} ({:.2})", result.path.display(), slip.confidence);
            }
        }
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

fn process_single_file(
    path: &Path,
    parser: &SlipParser,
    catalog: &Catalog,
    vision: bool,
) -> anyhow::Result<ParsedSlip> {
    let ocr_result = read_ocr_input(path, vision)?;
    Ok(parser.parse(&ocr_result, catalog)?)
}

fn write_summary(path: &Path, results: &[ProcessResult], threshold: f32) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "customer_name",
        "date",
        "date_extracted",
        "items",
        "total_quantity",
        "total_amount",
        "confidence",
        "needs_review",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(slip) = &result.slip {
            wtr.write_record([
                filename,
                "success",
                &slip.customer_name,
                &slip.date.to_string(),
                &slip.date_extracted.to_string(),
                &slip.items.len().to_string(),
                &slip.total_quantity().to_string(),
                &slip.total_amount().to_string(),
                &format!("{:.2}", slip.confidence),
                &slip.needs_review(threshold).to_string(),
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
