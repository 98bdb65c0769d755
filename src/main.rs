//! Job-Harvest main entry point
//!
//! This is the command-line interface for the Job-Harvest crawler.

use anyhow::Context;
use clap::Parser;
use job_harvest::config::{load_config_with_hash, validate, Config};
use job_harvest::crawler::{run_crawl, CrawlResult, SiteUrls};
use job_harvest::output::{write_outputs, CsvFileSink, GoogleTranslator};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Job-Harvest: a resilient job-listing harvester
///
/// Walks the listing index, fetches every job's detail page and writes the
/// results as CSV, together with a copy whose non-English names are
/// translated.
#[derive(Parser, Debug)]
#[command(name = "job-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A resilient job-listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Directory for the CSV files and the error log
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Skip producing the translated table
    #[arg(long)]
    no_translate: bool,

    /// Show the effective configuration without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }
    if cli.no_translate {
        config.translation.enabled = false;
    }
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    let output_dir = PathBuf::from(&config.output.directory);
    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!(
            "Error occurred while creating directory {}",
            output_dir.display()
        )
    })?;

    setup_logging(
        cli.verbose,
        cli.quiet,
        &output_dir.join(&config.output.log_file_name),
    )?;

    match &config_hash {
        Some(hash) => tracing::info!("Configuration loaded (hash: {})", hash),
        None => tracing::info!("No configuration file given, using defaults"),
    }

    handle_crawl(&config, &output_dir).await
}

/// Sets up console logging and the error-only log file
fn setup_logging(verbose: u8, quiet: bool, log_path: &Path) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("job_harvest=info,warn"),
            1 => EnvFilter::new("job_harvest=debug,info"),
            2 => EnvFilter::new("job_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_filter(filter);

    let error_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(log_file))
        .with_filter(LevelFilter::ERROR);

    tracing_subscriber::registry()
        .with(console)
        .with(error_log)
        .init();

    Ok(())
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let urls = SiteUrls::new(&config.site).context("Invalid site configuration")?;

    println!("=== Job-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  First listing page: {}", urls.listing_page(1));
    println!("  Detail URL pattern: {}/en/job/<id>/", config.site.site_url);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}ms", config.http.timeout_ms);

    println!("\nRetry:");
    println!("  Detail retries: {}", config.retry.detail_retries);
    println!(
        "  Jittered delay: {}-{}ms ({:?})",
        config.retry.delay_min_ms, config.retry.delay_max_ms, config.retry.delay_mode
    );
    println!(
        "  Default Retry-After: {}s",
        config.retry.default_retry_after_secs
    );

    println!("\nCrawler:");
    println!("  Detail workers: {}", config.crawler.detail_workers);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Table: {}", config.output.file_name);
    if config.translation.enabled {
        println!(
            "  Translated table: {} (target: {})",
            config.output.translated_file_name, config.translation.target_language
        );
    } else {
        println!("  Translation: disabled");
    }
    println!("  Error log: {}", config.output.log_file_name);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, output_dir: &Path) -> anyhow::Result<()> {
    let result = run_crawl(config).await.context("Crawl failed")?;

    if result.records.is_empty() {
        tracing::warn!("No valid data to save to the CSV file");
        print_summary(&result);
        return Ok(());
    }

    let sink = CsvFileSink::new(output_dir.join(&config.output.file_name));
    let translated_sink = CsvFileSink::new(output_dir.join(&config.output.translated_file_name));

    let translator = if config.translation.enabled {
        match GoogleTranslator::new(&config.translation, &config.http.user_agent) {
            Ok(translator) => Some(translator),
            Err(e) => {
                tracing::error!("Translation disabled: {}", e);
                None
            }
        }
    } else {
        None
    };
    let translated = translator.as_ref().map(|translator| {
        (
            translator,
            config.translation.target_language.as_str(),
            &translated_sink,
        )
    });

    write_outputs(&result.records, &sink, translated)
        .await
        .context("Error occurred while saving to CSV")?;

    print_summary(&result);
    Ok(())
}

fn print_summary(result: &CrawlResult) {
    println!("\n=== Harvest Summary ===");
    println!("  Job IDs discovered: {}", result.discovered);
    println!("  Records written: {}", result.records.len());
    println!("  Not found: {}", result.missing.len());
    println!("  Failed after requeue: {}", result.failed.len());
    println!("  Dropped on error: {}", result.degraded.len());
}
