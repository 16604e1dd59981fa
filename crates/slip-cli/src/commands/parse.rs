//! Parse command - extract slip data from a single OCR result.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::{debug, info};

use slip_core::{ParsedSlip, SlipParser};

use super::{load_catalog, load_config, read_ocr_input};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (OCR result JSON, vision response JSON or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Treat the input as a raw Google Vision `images:annotate` response
    #[arg(long)]
    vision: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Custom products JSON merged into the catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Date treated as today (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    today: Option<NaiveDate>,

    /// Show confidence and unresolved fields
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Parsing file: {}", args.input.display());

    let ocr_result = read_ocr_input(&args.input, args.vision)?;
    let catalog = load_catalog(&config, args.catalog.as_deref())?;

    let mut parser = SlipParser::from_config(&config);
    if let Some(today) = args.today {
        parser = parser.with_reference_date(today);
    }

    let parsed = parser.parse(&ocr_result, &catalog)?;

    let output = format_slip(&parsed, args.format)?;

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

    let threshold = config.review.review_threshold;
    if parsed.needs_review(threshold) {
        eprintln!(
            "{} Confidence {:.2} is below {:.2}, needs review",
            style("⚠").yellow(),
            parsed.confidence,
            threshold
        );
    }

    if args.show_confidence {
        eprintln!();
        eprintln!(
            "{} Parse confidence: {:.1}%",
            style("ℹ").blue(),
            parsed.confidence * 100.0
        );
        for issue in parsed.issues() {
            eprintln!("  - {}", issue);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a parse result in the requested format.
pub fn format_slip(parsed: &ParsedSlip, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(parsed)?),
        OutputFormat::Csv => format_slip_csv(parsed),
        OutputFormat::Text => Ok(format_slip_text(parsed)),
    }
}

fn format_slip_csv(parsed: &ParsedSlip) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "customer_name",
        "date",
        "code",
        "name",
        "category",
        "price",
        "quantity",
        "amount",
        "match_score",
    ])?;

    let date = parsed.date.to_string();
    for item in &parsed.items {
        wtr.write_record([
            parsed.customer_name.as_str(),
            &date,
            &item.code,
            &item.name,
            &item.category,
            &item.price.to_string(),
            &item.quantity.to_string(),
            &item.amount().to_string(),
            &format!("{:.2}", item.match_score),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_slip_text(parsed: &ParsedSlip) -> String {
    let mut output = String::new();

    let customer = if parsed.customer_name.is_empty() {
        "(unknown)"
    } else {
        parsed.customer_name.as_str()
    };
    output.push_str(&format!("Customer: {}\n", customer));

    let date_note = if parsed.date_extracted { "" } else { " (not found on slip)" };
    output.push_str(&format!("Date: {}{}\n", parsed.date, date_note));
    output.push('\n');

    output.push_str("Items:\n");
    if parsed.items.is_empty() {
        output.push_str("  (none)\n");
    }
    for item in &parsed.items {
        output.push_str(&format!(
            "  {} {}  ¥{} x {} = ¥{}  [{:.2}]\n",
            item.code,
            item.name,
            item.price,
            item.quantity,
            item.amount(),
            item.match_score
        ));
    }
    output.push('\n');

    output.push_str(&format!(
        "Total: ¥{} ({} units)\n",
        parsed.total_amount(),
        parsed.total_quantity()
    ));
    output.push_str(&format!("Confidence: {:.2}\n", parsed.confidence));

    output
}
