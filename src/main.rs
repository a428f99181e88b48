// src/main.rs
mod analysis;
mod collector;
mod config;
mod extractors;
mod pipeline;
mod storage;
mod utils;

use std::path::PathBuf;

use clap::Parser;

use config::AnalysisConfig;
use pipeline::Pipeline;
use storage::{RecordSink, SqliteStore};
use utils::AppError;

/// Command Line Interface for the Responsible-AI disclosure scorer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory of downloaded raw filings (ticker/form/accession layout)
    #[arg(short, long, default_value = "./data/raw/sec-edgar-filings")]
    raw_dir: PathBuf,

    /// Analysis configuration: term taxonomy, section patterns, weights
    #[arg(short, long, default_value = "./config.yaml")]
    config: PathBuf,

    /// SQLite database path
    #[arg(short, long, default_value = "./rai_disclosure.db")]
    db_path: String,

    /// Output directory for the exported CSV tables
    #[arg(short, long, default_value = "./data/processed")]
    export_dir: PathBuf,

    /// Minimum word count; shorter documents are skipped as data-quality
    /// failures (default: 1000)
    #[arg(long, default_value_t = pipeline::DEFAULT_MIN_WORD_COUNT)]
    min_word_count: usize,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Load and validate configuration — a broken taxonomy is fatal
    //    before any document is touched.
    let config = AnalysisConfig::load(&args.config)?;

    // 4. Build the per-run pipeline and open the store
    let pipeline = Pipeline::new(&config, args.min_word_count)?;
    let mut store = SqliteStore::open(&args.db_path, &config)?;

    // 5. Discover filings
    let filings = collector::gather_filings(&args.raw_dir)?;
    tracing::info!("Found {} filings to process", filings.len());

    if filings.is_empty() {
        return Err(AppError::Processing(format!(
            "No filings found under {}",
            args.raw_dir.display()
        )));
    }

    // 6. Process each filing: any per-document failure is logged and the
    //    run continues with the next one.
    let mut success_count = 0;
    let mut skip_count = 0;
    let mut failure_count = 0;

    for filing in &filings {
        tracing::info!(
            "Processing {} {} filed {}",
            filing.ticker,
            filing.form_type,
            filing.filing_date
        );

        let raw = match filing.read_body() {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Failed to read {}: {}", filing.path.display(), e);
                failure_count += 1;
                continue;
            }
        };

        match pipeline.analyze(&raw) {
            Ok(analysis) => {
                tracing::info!(
                    "Scored {} {}: {} words, composite {:.3}",
                    filing.ticker,
                    filing.filing_date,
                    analysis.scores.word_count,
                    analysis.scores.composite_score
                );
                match store.persist(filing, &analysis) {
                    Ok(()) => success_count += 1,
                    Err(e) => {
                        tracing::error!("Failed to persist {}: {}", filing.path.display(), e);
                        failure_count += 1;
                    }
                }
            }
            Err(e) => {
                // Empty extraction or a short document; a diagnostic, not a
                // run failure.
                tracing::warn!("Skipping {}: {}", filing.path.display(), e);
                skip_count += 1;
            }
        }
    }

    tracing::info!(
        "Processing finished. Success: {}, Skipped: {}, Failures: {}",
        success_count,
        skip_count,
        failure_count
    );

    // 7. Export the flat tables for dashboards
    storage::export::export_all(store.connection(), &args.export_dir)?;

    if success_count == 0 {
        return Err(AppError::Processing(format!(
            "No filings were scored ({} skipped, {} failed)",
            skip_count, failure_count
        )));
    }

    Ok(())
}
