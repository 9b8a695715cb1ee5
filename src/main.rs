use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use footscan_lib::config::{self, ReportConfig};
use footscan_lib::pipeline::extraction::DocumentExtractor;
use footscan_lib::pipeline::processor::{
    clean_debug_dirs, discover_inputs, process_batch, process_document, write_summary,
    BatchSummary,
};

#[derive(Parser)]
#[command(
    name = "footscan",
    about = "Turn foot-scanner PDF exports into biomechanical risk reports",
    version
)]
struct Cli {
    /// Process a single scanner export instead of scanning directories
    #[arg(long, value_name = "FILE")]
    pdf: Option<PathBuf>,

    /// Directory searched for `*.pdf` exports (repeatable)
    #[arg(long = "input-dir", value_name = "DIR")]
    input_dirs: Vec<PathBuf>,

    /// Where reports and the processing summary are written
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// JSON config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// TrueType font to embed in reports
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Do not write extraction and report debug dumps
    #[arg(long)]
    no_debug: bool,

    /// Remove debug dump directories before processing
    #[arg(long)]
    clean: bool,

    /// Print the batch summary as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Config file, then env overrides, then flags.
    fn resolve_config(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::load(path)?,
            None => ReportConfig::default(),
        }
        .with_env_overrides();

        if !self.input_dirs.is_empty() {
            config.input_dirs = self.input_dirs.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(font) = &self.font {
            config.font_path = Some(font.clone());
        }
        if self.no_debug {
            config.write_debug_dumps = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    footscan_lib::init_tracing();
    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let config = cli.resolve_config()?;

    if cli.clean {
        for dir in clean_debug_dirs(&config) {
            println!("Removed: {}", dir.display());
        }
    }

    match &cli.pdf {
        Some(path) => run_single(path, &config),
        None => run_batch(&config, cli.json),
    }
}

fn run_single(path: &Path, config: &ReportConfig) -> Result<()> {
    let extractor = DocumentExtractor::default();
    let now = Local::now().naive_local();
    let report = process_document(&extractor, path, None, config, now)
        .with_context(|| format!("Could not produce a report for {}", path.display()))?;

    println!("Report created: {}", report.output_path.display());
    println!("Results folder: {}", config.output_dir.display());
    Ok(())
}

fn run_batch(config: &ReportConfig, json: bool) -> Result<()> {
    let inputs = discover_inputs(&config.input_dirs, config.min_input_bytes);

    if inputs.is_empty() {
        tracing::warn!(dirs = ?config.input_dirs, "No scanner exports found");
        if json {
            println!("{}", serde_json::to_string_pretty(&BatchSummary::default())?);
        } else {
            println!("No scanner exports found. Put PDF files into:");
            for dir in &config.input_dirs {
                println!("  - {}", dir.display());
            }
        }
        return Ok(());
    }

    let summary = process_batch(&inputs, config, || Local::now().naive_local());
    let summary_path = write_summary(&summary, &config.output_dir, Local::now().naive_local())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Processed successfully: {}", summary.processed);
    println!("Failed: {}", summary.failed);
    println!("Total found: {}", summary.total);
    for report in &summary.reports {
        println!(
            "  {} -> {} ({:.1} KB)",
            report.input_pdf,
            report.output_pdf,
            report.file_size as f64 / 1024.0
        );
    }
    for failure in &summary.failures {
        println!("  {} FAILED: {}", failure.input_pdf, failure.error);
    }
    if let Some(path) = summary_path {
        println!("Summary: {}", path.display());
    }
    println!("Reports: {}", config.output_dir.display());
    if config.write_debug_dumps {
        println!("Extracted data: {}", config.extraction_debug_dir.display());
        println!("Report data: {}", config.report_debug_dir.display());
    }
    Ok(())
}
